//! Parser implementations
//!
//! [`ParseContext`] carries the token cursor and error state for one run;
//! [`ExprParser`] and [`TraverseParser`] build AST nodes from it; [`Parser`]
//! is the unified entry point callers use.

pub mod expr_parser;
pub mod parse_context;
pub mod traverse_parser;

pub use expr_parser::ExprParser;
pub use parse_context::ParseContext;
pub use traverse_parser::TraverseParser;

use crate::ast::traverse::TraverseClause;
use crate::core::{ParseError, ParseErrorKind, TokenKind};

/// Unified parser over one input string.
pub struct Parser {
    ctx: ParseContext,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        Self {
            ctx: ParseContext::new(input),
        }
    }

    /// Parse the input as a single TRAVERSE clause consuming all of it.
    pub fn parse_traverse(&mut self) -> Result<TraverseClause, ParseError> {
        let clause = TraverseParser::new().parse_traverse_clause(&mut self.ctx)?;

        if !self.ctx.check_token(TokenKind::Eof) {
            return Err(ParseError::new(
                ParseErrorKind::TrailingInput,
                format!(
                    "Unexpected input after TRAVERSE clause: {}",
                    self.ctx.current_token().kind
                ),
                self.ctx.current_position(),
            ));
        }

        if self.ctx.has_errors() {
            let mut errors = self.ctx.take_errors();
            if let Some(first) = errors.take().into_iter().next() {
                return Err(first);
            }
        }

        Ok(clause)
    }
}

#[cfg(test)]
mod tests;
