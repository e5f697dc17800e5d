//! Shared state for one parse run: token cursor, recursion guard and
//! collected errors.

use crate::core::{ParseError, ParseErrorKind, ParseErrors, Position, Span, Token, TokenKind};
use crate::lexer::{LexError, Lexer};

pub struct ParseContext {
    lexer: Lexer,
    current_token: Token,
    errors: ParseErrors,
    recursion_depth: usize,
    max_recursion_depth: usize,
}

impl ParseContext {
    pub fn new(input: &str) -> Self {
        let lexer = Lexer::new(input);
        let current_token = lexer.current_token().clone();

        Self {
            lexer,
            current_token,
            errors: ParseErrors::new(),
            recursion_depth: 0,
            max_recursion_depth: 100,
        }
    }

    pub fn enter_recursion(&mut self) -> Result<(), ParseError> {
        self.recursion_depth += 1;
        if self.recursion_depth > self.max_recursion_depth {
            let pos = self.current_position();
            Err(ParseError::new(
                ParseErrorKind::RecursionLimitExceeded,
                "Recursion limit exceeded".to_string(),
                pos,
            ))
        } else {
            Ok(())
        }
    }

    pub fn exit_recursion(&mut self) {
        if self.recursion_depth > 0 {
            self.recursion_depth -= 1;
        }
    }

    pub fn add_error(&mut self, error: ParseError) {
        self.errors.add(error);
    }

    pub fn add_lex_error(&mut self, error: LexError) {
        self.errors.add(error.into());
    }

    pub fn errors(&self) -> &ParseErrors {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.lexer.has_errors()
    }

    pub fn take_errors(&mut self) -> ParseErrors {
        for lex_error in self.lexer.take_errors() {
            self.errors.add(lex_error.into());
        }
        std::mem::take(&mut self.errors)
    }

    pub fn current_position(&self) -> Position {
        Position::new(self.current_token.line, self.current_token.column)
    }

    pub fn current_span(&self) -> Span {
        let pos = self.current_position();
        Span::new(pos, pos)
    }

    pub fn merge_span(&self, start: Position, end: Position) -> Span {
        Span::new(start, end)
    }

    pub fn current_token(&self) -> &Token {
        &self.current_token
    }

    pub fn next_token(&mut self) {
        self.lexer.advance();
        self.current_token = self.lexer.current_token().clone();
    }

    /// Consume the current token when it matches.
    pub fn match_token(&mut self, expected: TokenKind) -> bool {
        if self.current_token.kind == expected {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub fn check_token(&self, expected: TokenKind) -> bool {
        self.current_token.kind == expected
    }

    pub fn expect_token(&mut self, expected: TokenKind) -> Result<(), ParseError> {
        if self.current_token.kind == expected {
            self.next_token();
            Ok(())
        } else {
            let pos = self.current_position();
            Err(ParseError::new(
                ParseErrorKind::UnexpectedToken,
                format!(
                    "Expected {:?}, found {:?}",
                    expected, self.current_token.kind
                ),
                pos,
            )
            .with_unexpected_token(&self.current_token.kind)
            .with_expected_tokens(vec![format!("{:?}", expected)]))
        }
    }

    pub fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match &self.current_token.kind {
            TokenKind::Identifier(s) => {
                let id = s.clone();
                self.next_token();
                Ok(id)
            }
            // Action keywords are contextual; outside the action position
            // they are ordinary names.
            TokenKind::In | TokenKind::Out | TokenKind::Both | TokenKind::Tags => {
                let id = self.current_token.lexeme.clone();
                self.next_token();
                Ok(id)
            }
            _ => {
                let pos = self.current_position();
                Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken,
                    format!("Expected identifier, found {:?}", self.current_token.kind),
                    pos,
                ))
            }
        }
    }

    pub fn at_end(&self) -> bool {
        self.current_token.kind == TokenKind::Eof
    }
}
