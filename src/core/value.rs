//! Literal values carried by constant expressions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal value as written in query text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the literal spelling starts with a minus sign.
    pub fn is_negative(&self) -> bool {
        match self {
            Value::Int(n) => *n < 0,
            Value::Float(x) => x.is_sign_negative(),
            _ => false,
        }
    }

    /// Canonical query-text spelling of the literal.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Int(n) => n.to_string(),
            // {:?} keeps the decimal point on round floats (100.0, not 100)
            // so the literal re-lexes as a float.
            Value::Float(x) => format!("{:?}", x),
            Value::String(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                out.push('"');
                for ch in s.chars() {
                    match ch {
                        '"' => out.push_str("\\\""),
                        '\\' => out.push_str("\\\\"),
                        '\n' => out.push_str("\\n"),
                        '\t' => out.push_str("\\t"),
                        '\r' => out.push_str("\\r"),
                        _ => out.push(ch),
                    }
                }
                out.push('"');
                out
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_literal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_spellings() {
        assert_eq!(Value::Null.to_literal(), "NULL");
        assert_eq!(Value::Bool(true).to_literal(), "true");
        assert_eq!(Value::Int(100).to_literal(), "100");
        assert_eq!(Value::Float(100.0).to_literal(), "100.0");
        assert_eq!(Value::String("a\"b".to_string()).to_literal(), "\"a\\\"b\"");
    }
}
