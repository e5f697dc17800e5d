//! AST definitions for the traverse dialect
//!
//! Nodes are plain enum/struct data carrying their source span. Behavior
//! lives in two cross-cutting protocols every node satisfies: canonical
//! text restoration ([`crate::format::Restore`]) and visitor-based
//! rewriting ([`visitor::Accept`]).

pub mod expr;
pub use expr::*;

pub mod table;
pub use table::*;

pub mod traverse;
pub use traverse::*;

pub mod visitor;
pub use visitor::*;
