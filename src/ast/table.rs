//! Table reference node.

use serde::{Deserialize, Serialize};

use crate::core::Span;
use crate::format::{Restore, RestoreContext, RestoreError};

/// A reference to a tag or edge table scoping a traverse target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRef {
    pub span: Span,
    pub name: String,
}

impl TableRef {
    pub fn new(name: String, span: Span) -> Self {
        Self { span, name }
    }
}

impl Restore for TableRef {
    fn restore(&self, ctx: &mut dyn RestoreContext) -> Result<(), RestoreError> {
        ctx.write_plain(&self.name)
    }
}
