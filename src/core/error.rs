//! Error handling for the query parser
//!
//! This module defines error types for the parsing process,
//! providing unified error reporting with position information,
//! hints, and expected-token detail.

use std::error::Error;
use std::fmt;

use super::position::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    LexicalError,
    SyntaxError,
    UnexpectedToken,
    UnterminatedString,
    UnterminatedComment,
    InvalidNumber,
    InvalidEscapeSequence,
    UnexpectedEndOfInput,
    InvalidCharacter,
    RecursionLimitExceeded,
    TrailingInput,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub position: Position,
    pub unexpected_token: Option<String>,
    pub expected_tokens: Vec<String>,
    pub hints: Vec<String>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: String, position: Position) -> Self {
        ParseError {
            kind,
            message,
            position,
            unexpected_token: None,
            expected_tokens: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn syntax_error<T: fmt::Display>(msg: T, position: Position) -> ParseError {
        ParseError::new(
            ParseErrorKind::SyntaxError,
            format!("Syntax error: {}", msg),
            position,
        )
    }

    pub fn unexpected_token<T: fmt::Display>(token: T, position: Position) -> ParseError {
        ParseError::new(
            ParseErrorKind::UnexpectedToken,
            format!("Unexpected token: {}", token),
            position,
        )
    }

    pub fn unexpected_end_of_input(position: Position) -> ParseError {
        ParseError::new(
            ParseErrorKind::UnexpectedEndOfInput,
            "Unexpected end of input".to_string(),
            position,
        )
    }

    pub fn with_unexpected_token<T: fmt::Display>(mut self, token: T) -> Self {
        self.unexpected_token = Some(token.to_string());
        self
    }

    pub fn with_expected_tokens(mut self, tokens: Vec<String>) -> Self {
        self.expected_tokens = tokens;
        self
    }

    pub fn with_hint(mut self, hint: String) -> Self {
        self.hints.push(hint);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.position.line, self.position.column, self.message
        )?;

        if let Some(ref token) = self.unexpected_token {
            writeln!(f, "\n  Unexpected token: {}", token)?;
        }

        if !self.expected_tokens.is_empty() {
            writeln!(f, "\n  Expected one of: {}", self.expected_tokens.join(", "))?;
        }

        if !self.hints.is_empty() {
            writeln!(f, "\n  Hint(s):")?;
            for hint in &self.hints {
                writeln!(f, "    - {}", hint)?;
            }
        }

        Ok(())
    }
}

impl Error for ParseError {}

impl From<crate::lexer::LexError> for ParseError {
    fn from(lex_error: crate::lexer::LexError) -> Self {
        ParseError::new(
            ParseErrorKind::LexicalError,
            lex_error.message,
            lex_error.position,
        )
    }
}

/// A collection of parse errors accumulated over one parse run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseErrors {
    pub errors: Vec<ParseError>,
}

impl ParseErrors {
    pub fn new() -> Self {
        ParseErrors { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn take(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl Error for ParseErrors {}

impl From<Vec<ParseError>> for ParseErrors {
    fn from(errors: Vec<ParseError>) -> Self {
        ParseErrors { errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let error = ParseError::unexpected_token("IDENTIFIER", Position::new(10, 5));
        let display = error.to_string();
        assert!(display.contains("line 10, column 5"));
        assert!(display.contains("Unexpected token: IDENTIFIER"));
    }

    #[test]
    fn test_parse_error_with_hint() {
        let error = ParseError::syntax_error("invalid syntax", Position::new(5, 10))
            .with_hint("Each traverse step needs a parenthesized target list".to_string());

        let display = error.to_string();
        assert!(display.contains("Hint"));
        assert!(display.contains("target list"));
    }

    #[test]
    fn test_parse_errors_collection() {
        let mut errors = ParseErrors::new();
        assert!(errors.is_empty());
        errors.add(ParseError::unexpected_end_of_input(Position::new(1, 1)));
        errors.add(ParseError::syntax_error("bad", Position::new(2, 1)));
        assert_eq!(errors.len(), 2);
        let display = errors.to_string();
        assert!(display.contains("line 1"));
        assert!(display.contains("line 2"));
    }
}
