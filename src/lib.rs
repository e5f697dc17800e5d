//! Parser front-end for a graph traversal query dialect
//!
//! This crate provides functionality to parse TRAVERSE clauses of a graph
//! query language into abstract syntax trees, restore those trees back into
//! canonical query text, and rewrite them through a generic visitor protocol.

pub mod core;
pub mod lexer;
pub mod ast;
pub mod format;
pub mod parser;

// Re-export the types most callers need.
pub use crate::core::{ParseError, ParseErrorKind, ParseErrors, Token, TokenKind};
pub use crate::ast::{TraverseAction, TraverseClause, TraverseStep, TraverseTarget};
pub use crate::format::{restore_to_string, Restore, RestoreContext, RestoreError};
pub use crate::parser::Parser;
