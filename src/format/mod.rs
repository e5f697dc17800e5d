//! Canonical text restoration for AST nodes
//!
//! Every syntax node can be restored into canonical query text through a
//! [`RestoreContext`], a small write capability that distinguishes reserved
//! words from plain text and whose operations can fail. The context is an
//! injected trait object rather than a base type, so string buffers,
//! streaming writers and failing test doubles all satisfy it.

use std::fmt;
use std::io;

use thiserror::Error;

/// Failure while writing restored text to a sink.
///
/// A restore failure is terminal for the whole rendering attempt: callers
/// must discard whatever the sink already holds. Buffering and rollback are
/// the sink's business, not the node's.
#[derive(Error, Debug)]
pub enum RestoreError {
    #[error("restore sink rejected a write: {0}")]
    Sink(String),
    #[error("I/O error during restore: {0}")]
    Io(#[from] io::Error),
}

/// The write capability used by [`Restore`] implementations.
pub trait RestoreContext {
    /// Emit a reserved word.
    fn write_keyword(&mut self, keyword: &str) -> Result<(), RestoreError>;

    /// Emit plain text.
    fn write_plain(&mut self, text: &str) -> Result<(), RestoreError>;

    /// Emit formatted plain text.
    fn write_plain_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), RestoreError>;
}

/// Deterministic serialization of a syntax node back into canonical
/// query text.
pub trait Restore {
    /// Write the canonical rendering of `self` into `ctx`. On failure the
    /// node performs no further writes of its own; whatever was already
    /// written stays in the sink.
    fn restore(&self, ctx: &mut dyn RestoreContext) -> Result<(), RestoreError>;
}

/// A [`RestoreContext`] backed by an in-memory string.
#[derive(Debug, Default)]
pub struct StringRestoreContext {
    buf: String,
    lowercase_keywords: bool,
}

impl StringRestoreContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render reserved words in lowercase instead of the default uppercase.
    pub fn with_lowercase_keywords() -> Self {
        Self {
            buf: String::new(),
            lowercase_keywords: true,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl RestoreContext for StringRestoreContext {
    fn write_keyword(&mut self, keyword: &str) -> Result<(), RestoreError> {
        if self.lowercase_keywords {
            self.buf.push_str(&keyword.to_lowercase());
        } else {
            self.buf.push_str(keyword);
        }
        Ok(())
    }

    fn write_plain(&mut self, text: &str) -> Result<(), RestoreError> {
        self.buf.push_str(text);
        Ok(())
    }

    fn write_plain_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), RestoreError> {
        use fmt::Write;
        self.buf
            .write_fmt(args)
            .map_err(|e| RestoreError::Sink(e.to_string()))
    }
}

/// A [`RestoreContext`] that streams into any [`io::Write`].
pub struct WriterRestoreContext<W: io::Write> {
    writer: W,
}

impl<W: io::Write> WriterRestoreContext<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> RestoreContext for WriterRestoreContext<W> {
    fn write_keyword(&mut self, keyword: &str) -> Result<(), RestoreError> {
        self.writer.write_all(keyword.as_bytes())?;
        Ok(())
    }

    fn write_plain(&mut self, text: &str) -> Result<(), RestoreError> {
        self.writer.write_all(text.as_bytes())?;
        Ok(())
    }

    fn write_plain_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), RestoreError> {
        self.writer.write_fmt(args)?;
        Ok(())
    }
}

/// Restore `node` into a freshly allocated string.
pub fn restore_to_string(node: &dyn Restore) -> Result<String, RestoreError> {
    let mut ctx = StringRestoreContext::new();
    node.restore(&mut ctx)?;
    Ok(ctx.into_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Keyword(&'static str);

    impl Restore for Keyword {
        fn restore(&self, ctx: &mut dyn RestoreContext) -> Result<(), RestoreError> {
            ctx.write_keyword(self.0)?;
            ctx.write_plain(" ")?;
            ctx.write_plain_fmt(format_args!("{}!", 42))
        }
    }

    #[test]
    fn test_string_context() {
        let out = restore_to_string(&Keyword("TRAVERSE")).unwrap();
        assert_eq!(out, "TRAVERSE 42!");
    }

    #[test]
    fn test_lowercase_keywords() {
        let mut ctx = StringRestoreContext::with_lowercase_keywords();
        Keyword("TRAVERSE").restore(&mut ctx).unwrap();
        assert_eq!(ctx.as_str(), "traverse 42!");
    }

    #[test]
    fn test_writer_context() {
        let mut ctx = WriterRestoreContext::new(Vec::new());
        Keyword("OUT").restore(&mut ctx).unwrap();
        assert_eq!(ctx.into_inner(), b"OUT 42!");
    }

    #[test]
    fn test_writer_failure_propagates() {
        struct Broken;
        impl io::Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut ctx = WriterRestoreContext::new(Broken);
        let err = Keyword("IN").restore(&mut ctx).unwrap_err();
        assert!(matches!(err, RestoreError::Io(_)));
    }
}
