pub mod error;
pub mod operators;
pub mod position;
pub mod token;
pub mod value;

// Re-export common types for the rest of the crate.
pub use error::{ParseError, ParseErrorKind, ParseErrors};
pub use operators::{BinaryOp, UnaryOp};
pub use position::{Position, Span};
pub use token::{Token, TokenKind};
pub use value::Value;
