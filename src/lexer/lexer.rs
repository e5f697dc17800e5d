//! Lexer implementation for the query parser
//!
//! This module implements a lexical analyzer that converts input query
//! strings into tokens. Lexical errors are collected rather than aborting,
//! so one bad literal does not hide the errors after it.

use crate::core::position::Position;
use crate::core::{Token, TokenKind as Tk};
use crate::lexer::LexError;
use std::iter::Peekable;

#[derive(Clone)]
pub struct Lexer {
    chars: Peekable<std::vec::IntoIter<char>>,
    line: usize,
    column: usize,
    current_token: Token,
    errors: Vec<LexError>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let mut lexer = Lexer {
            chars: chars.into_iter().peekable(),
            line: 1,
            column: 0,
            current_token: Token::new(Tk::Eof, String::new(), 1, 0),
            errors: Vec::new(),
        };
        lexer.current_token = lexer.next_token();
        lexer
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.chars.next();
        if ch == Some('\n') {
            self.line += 1;
            self.column = 0;
        } else if ch.is_some() {
            self.column += 1;
        }
        ch
    }

    fn peek_char(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn add_error(&mut self, error: LexError) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn current_token(&self) -> &Token {
        &self.current_token
    }

    pub fn current_position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn advance(&mut self) {
        self.current_token = self.next_token();
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.peek_char() {
            if ch == ' ' || ch == '\t' || ch == '\r' || ch == '\n' {
                self.read_char();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut literal = String::new();
        while let Some(&ch) = self.peek_char() {
            if ch.is_alphanumeric() || ch == '_' {
                literal.push(ch);
                self.read_char();
            } else {
                break;
            }
        }
        literal
    }

    fn read_number(&mut self) -> String {
        let mut literal = String::new();
        let mut has_decimal = false;
        let mut has_exponent = false;

        while let Some(&ch) = self.peek_char() {
            if ch.is_ascii_digit() {
                literal.push(ch);
                self.read_char();
            } else if ch == '.' && !has_decimal && !has_exponent {
                // Only consume the dot when a digit follows, otherwise it is
                // the step separator of a traverse chain.
                let mut lookahead = self.chars.clone();
                lookahead.next();
                if lookahead.next().map_or(false, |c| c.is_ascii_digit()) {
                    has_decimal = true;
                    literal.push(ch);
                    self.read_char();
                } else {
                    break;
                }
            } else if (ch == 'e' || ch == 'E') && !has_exponent && !literal.is_empty() {
                let mut lookahead = self.chars.clone();
                lookahead.next();
                let next = lookahead.next();
                let exponent_follows = match next {
                    Some(c) if c.is_ascii_digit() => true,
                    Some('+') | Some('-') => {
                        lookahead.next().map_or(false, |c| c.is_ascii_digit())
                    }
                    _ => false,
                };
                if !exponent_follows {
                    break;
                }
                has_exponent = true;
                literal.push(ch);
                self.read_char();
                if let Some(&sign) = self.peek_char() {
                    if sign == '+' || sign == '-' {
                        literal.push(sign);
                        self.read_char();
                    }
                }
            } else {
                break;
            }
        }
        literal
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let start_position = self.current_position();
        let quote = match self.read_char() {
            Some(ch) => ch,
            None => {
                return Err(LexError::new(
                    "Unexpected end of input while reading string".to_string(),
                    start_position,
                ));
            }
        };

        let mut result = String::new();

        loop {
            match self.peek_char() {
                Some(&'\\') => {
                    self.read_char();
                    if let Some(ch) = self.read_char() {
                        match ch {
                            'n' => result.push('\n'),
                            't' => result.push('\t'),
                            'r' => result.push('\r'),
                            '\\' => result.push('\\'),
                            '"' => result.push('"'),
                            '\'' => result.push('\''),
                            '0' => result.push('\0'),
                            _ => {
                                self.add_error(LexError::invalid_escape_sequence(
                                    ch.to_string(),
                                    self.current_position(),
                                ));
                                result.push(ch);
                            }
                        }
                    }
                }
                Some(&ch) if ch == quote => {
                    self.read_char();
                    return Ok(result);
                }
                Some(&'\n') | None => {
                    let error = LexError::unterminated_string(start_position);
                    self.add_error(error.clone());
                    return Err(error);
                }
                Some(&ch) => {
                    result.push(ch);
                    self.read_char();
                }
            }
        }
    }

    fn lookup_keyword(&self, identifier: &str) -> Tk {
        match identifier.to_uppercase().as_str() {
            "TRAVERSE" => Tk::Traverse,
            "WHERE" => Tk::Where,
            "IN" => Tk::In,
            "OUT" => Tk::Out,
            "BOTH" => Tk::Both,
            "TAGS" => Tk::Tags,
            "AND" => Tk::And,
            "OR" => Tk::Or,
            "XOR" => Tk::Xor,
            "NOT" => Tk::Not,
            "NULL" => Tk::Null,
            "TRUE" => Tk::BooleanLiteral(true),
            "FALSE" => Tk::BooleanLiteral(false),
            _ => Tk::Identifier(identifier.to_string()),
        }
    }

    /// Skip a `//`, `/* */` or `--` comment. The caller has seen the first
    /// character but not consumed it.
    fn skip_comment(&mut self) -> Result<bool, LexError> {
        let start_position = self.current_position();

        let mut lookahead = self.chars.clone();
        let first = lookahead.next();
        let second = lookahead.next();

        match (first, second) {
            (Some('/'), Some('/')) | (Some('-'), Some('-')) => {
                self.read_char();
                self.read_char();
                while let Some(&ch) = self.peek_char() {
                    if ch == '\n' {
                        break;
                    }
                    self.read_char();
                }
                Ok(true)
            }
            (Some('/'), Some('*')) => {
                self.read_char();
                self.read_char();
                loop {
                    match self.read_char() {
                        Some('*') => {
                            if let Some(&'/') = self.peek_char() {
                                self.read_char();
                                return Ok(true);
                            }
                        }
                        Some(_) => {}
                        None => {
                            let error = LexError::unterminated_comment(start_position);
                            self.add_error(error.clone());
                            return Err(error);
                        }
                    }
                }
            }
            _ => Ok(false),
        }
    }

    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            match self.peek_char() {
                Some(&'/') | Some(&'-') => match self.skip_comment() {
                    Ok(true) => continue,
                    Ok(false) => break,
                    Err(_) => return Token::new(Tk::Eof, String::new(), self.line, self.column),
                },
                _ => break,
            }
        }

        let start_line = self.line;
        let start_col = self.column;

        match self.peek_char() {
            Some(&'=') => {
                self.read_char();
                if let Some(&'=') = self.peek_char() {
                    self.read_char();
                    Token::new(Tk::Eq, "==".to_string(), start_line, start_col)
                } else {
                    // Single '=' is accepted as equality for compatibility
                    // with hand-written queries.
                    Token::new(Tk::Eq, "=".to_string(), start_line, start_col)
                }
            }
            Some(&'+') => {
                self.read_char();
                Token::new(Tk::Plus, "+".to_string(), start_line, start_col)
            }
            Some(&'-') => {
                self.read_char();
                Token::new(Tk::Minus, "-".to_string(), start_line, start_col)
            }
            Some(&'*') => {
                self.read_char();
                Token::new(Tk::Star, "*".to_string(), start_line, start_col)
            }
            Some(&'/') => {
                self.read_char();
                Token::new(Tk::Div, "/".to_string(), start_line, start_col)
            }
            Some(&'%') => {
                self.read_char();
                Token::new(Tk::Mod, "%".to_string(), start_line, start_col)
            }
            Some(&'!') => {
                self.read_char();
                if let Some(&'=') = self.peek_char() {
                    self.read_char();
                    Token::new(Tk::Ne, "!=".to_string(), start_line, start_col)
                } else {
                    Token::new(Tk::NotOp, "!".to_string(), start_line, start_col)
                }
            }
            Some(&'<') => {
                self.read_char();
                if let Some(&'=') = self.peek_char() {
                    self.read_char();
                    Token::new(Tk::Le, "<=".to_string(), start_line, start_col)
                } else {
                    Token::new(Tk::Lt, "<".to_string(), start_line, start_col)
                }
            }
            Some(&'>') => {
                self.read_char();
                if let Some(&'=') = self.peek_char() {
                    self.read_char();
                    Token::new(Tk::Ge, ">=".to_string(), start_line, start_col)
                } else {
                    Token::new(Tk::Gt, ">".to_string(), start_line, start_col)
                }
            }
            Some(&'(') => {
                self.read_char();
                Token::new(Tk::LParen, "(".to_string(), start_line, start_col)
            }
            Some(&')') => {
                self.read_char();
                Token::new(Tk::RParen, ")".to_string(), start_line, start_col)
            }
            Some(&'[') => {
                self.read_char();
                Token::new(Tk::LBracket, "[".to_string(), start_line, start_col)
            }
            Some(&']') => {
                self.read_char();
                Token::new(Tk::RBracket, "]".to_string(), start_line, start_col)
            }
            Some(&',') => {
                self.read_char();
                Token::new(Tk::Comma, ",".to_string(), start_line, start_col)
            }
            Some(&'.') => {
                self.read_char();
                Token::new(Tk::Dot, ".".to_string(), start_line, start_col)
            }
            Some(&'$') => {
                self.read_char();
                Token::new(Tk::Dollar, "$".to_string(), start_line, start_col)
            }
            Some(&'"') | Some(&'\'') => match self.read_string() {
                Ok(literal) => Token::new(
                    Tk::StringLiteral(literal.clone()),
                    literal,
                    start_line,
                    start_col,
                ),
                Err(_) => Token::new(
                    Tk::StringLiteral(String::new()),
                    String::new(),
                    start_line,
                    start_col,
                ),
            },
            Some(&ch) if ch.is_ascii_digit() => {
                let literal = self.read_number();
                if literal.contains('.') || literal.contains('e') || literal.contains('E') {
                    match literal.parse::<f64>() {
                        Ok(float_val) => {
                            Token::new(Tk::FloatLiteral(float_val), literal, start_line, start_col)
                        }
                        Err(_) => {
                            self.add_error(LexError::invalid_number(
                                literal.clone(),
                                self.current_position(),
                            ));
                            Token::new(Tk::FloatLiteral(0.0), literal, start_line, start_col)
                        }
                    }
                } else {
                    match literal.parse::<i64>() {
                        Ok(int_val) => {
                            Token::new(Tk::IntegerLiteral(int_val), literal, start_line, start_col)
                        }
                        Err(_) => {
                            self.add_error(LexError::invalid_number(
                                literal.clone(),
                                self.current_position(),
                            ));
                            Token::new(Tk::IntegerLiteral(0), literal, start_line, start_col)
                        }
                    }
                }
            }
            Some(&ch) if ch.is_alphabetic() || ch == '_' => {
                let literal = self.read_identifier();
                let kind = self.lookup_keyword(&literal);
                Token::new(kind, literal, start_line, start_col)
            }
            Some(&ch) => {
                self.read_char();
                self.add_error(LexError::unexpected_character(ch, self.current_position()));
                Token::new(
                    Tk::Identifier(ch.to_string()),
                    ch.to_string(),
                    start_line,
                    start_col,
                )
            }
            None => Token::new(Tk::Eof, String::new(), self.line, self.column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Tk> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let kind = lexer.current_token().kind.clone();
            let done = kind == Tk::Eof;
            out.push(kind);
            if done {
                break;
            }
            lexer.advance();
        }
        out
    }

    #[test]
    fn test_traverse_keywords() {
        let input = "TRAVERSE IN OUT BOTH TAGS WHERE";
        assert_eq!(
            kinds(input),
            vec![
                Tk::Traverse,
                Tk::In,
                Tk::Out,
                Tk::Both,
                Tk::Tags,
                Tk::Where,
                Tk::Eof
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(kinds("traverse both"), vec![Tk::Traverse, Tk::Both, Tk::Eof]);
    }

    #[test]
    fn test_traverse_clause_tokens() {
        let input = "TRAVERSE OUT(orders WHERE amount > 100).BOTH(refs)";
        assert_eq!(
            kinds(input),
            vec![
                Tk::Traverse,
                Tk::Out,
                Tk::LParen,
                Tk::Identifier("orders".to_string()),
                Tk::Where,
                Tk::Identifier("amount".to_string()),
                Tk::Gt,
                Tk::IntegerLiteral(100),
                Tk::RParen,
                Tk::Dot,
                Tk::Both,
                Tk::LParen,
                Tk::Identifier("refs".to_string()),
                Tk::RParen,
                Tk::Eof
            ]
        );
    }

    #[test]
    fn test_number_dot_disambiguation() {
        // ").BOTH" after an integer must not lex "1." as a float.
        assert_eq!(
            kinds("1.BOTH 1.5"),
            vec![
                Tk::IntegerLiteral(1),
                Tk::Dot,
                Tk::Both,
                Tk::FloatLiteral(1.5),
                Tk::Eof
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let mut lexer = Lexer::new(r#""a\"b\n" 'c'"#);
        assert_eq!(
            lexer.current_token().kind,
            Tk::StringLiteral("a\"b\n".to_string())
        );
        lexer.advance();
        assert_eq!(lexer.current_token().kind, Tk::StringLiteral("c".to_string()));
    }

    #[test]
    fn test_unterminated_string() {
        let lexer = Lexer::new(r#""hello"#);
        assert!(lexer.has_errors());
        assert!(!lexer.errors().is_empty());
    }

    #[test]
    fn test_unterminated_comment() {
        let lexer = Lexer::new("/* comment");
        assert!(lexer.has_errors());
    }

    #[test]
    fn test_comments_are_skipped() {
        let input = "TRAVERSE // trailing\n-- line\n/* block */ IN";
        assert_eq!(kinds(input), vec![Tk::Traverse, Tk::In, Tk::Eof]);
    }

    #[test]
    fn test_parameter_tokens() {
        assert_eq!(
            kinds("$min"),
            vec![Tk::Dollar, Tk::Identifier("min".to_string()), Tk::Eof]
        );
    }

    #[test]
    fn test_unexpected_character_is_reported() {
        let lexer = Lexer::new("#");
        assert!(lexer.has_errors());
    }
}
