//! TRAVERSE clause AST
//!
//! A traverse clause is an ordered chain of steps, each step an action
//! applied to one or more filtered table targets:
//!
//! ```text
//! TRAVERSE OUT(orders amount > 100).BOTH(refs)
//! ```
//!
//! Steps are applied left to right; target order within a step is preserved
//! for output formatting.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ast::expr::Expr;
use crate::ast::table::TableRef;
use crate::core::Span;
use crate::format::{Restore, RestoreContext, RestoreError};

/// Direction/mode of one traverse step.
///
/// The enumeration is closed for valid parses, but a raw byte outside the
/// known range is kept as `Unknown` so that rendering stays total: one bad
/// tag must not abort printing an otherwise valid tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraverseAction {
    In,
    Out,
    Both,
    Tags,
    Unknown(u8),
}

impl TraverseAction {
    /// Decode the wire byte used by stored plans.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => TraverseAction::In,
            1 => TraverseAction::Out,
            2 => TraverseAction::Both,
            3 => TraverseAction::Tags,
            other => TraverseAction::Unknown(other),
        }
    }

    pub fn as_raw(&self) -> u8 {
        match self {
            TraverseAction::In => 0,
            TraverseAction::Out => 1,
            TraverseAction::Both => 2,
            TraverseAction::Tags => 3,
            TraverseAction::Unknown(raw) => *raw,
        }
    }
}

impl fmt::Display for TraverseAction {
    /// Keyword spelling of the action; never fails, out-of-range values
    /// render a diagnostic placeholder embedding the raw byte.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraverseAction::In => write!(f, "IN"),
            TraverseAction::Out => write!(f, "OUT"),
            TraverseAction::Both => write!(f, "BOTH"),
            TraverseAction::Tags => write!(f, "TAGS"),
            TraverseAction::Unknown(raw) => write!(f, "UNKNOWN({})", raw),
        }
    }
}

/// One table a step traverses over, with an optional filter predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraverseTarget {
    pub span: Span,
    pub table: TableRef,
    pub filter: Option<Expr>,
}

impl TraverseTarget {
    pub fn new(table: TableRef, filter: Option<Expr>, span: Span) -> Self {
        Self {
            span,
            table,
            filter,
        }
    }
}

/// One stage of the chain: an action plus its ordered, non-empty targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraverseStep {
    pub span: Span,
    pub action: TraverseAction,
    pub targets: Vec<TraverseTarget>,
}

impl TraverseStep {
    pub fn new(action: TraverseAction, targets: Vec<TraverseTarget>, span: Span) -> Self {
        Self {
            span,
            action,
            targets,
        }
    }
}

impl Restore for TraverseStep {
    fn restore(&self, ctx: &mut dyn RestoreContext) -> Result<(), RestoreError> {
        ctx.write_plain_fmt(format_args!("{}(", self.action))?;
        for (i, target) in self.targets.iter().enumerate() {
            if i > 0 {
                ctx.write_plain(",")?;
            }
            target.table.restore(ctx)?;
            if let Some(ref filter) = target.filter {
                ctx.write_plain(" ")?;
                filter.restore(ctx)?;
            }
        }
        ctx.write_plain(")")
    }
}

/// The traverse clause: an ordered, non-empty chain of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraverseClause {
    pub span: Span,
    pub steps: Vec<TraverseStep>,
}

impl TraverseClause {
    pub fn new(steps: Vec<TraverseStep>, span: Span) -> Self {
        Self { span, steps }
    }
}

impl Restore for TraverseClause {
    fn restore(&self, ctx: &mut dyn RestoreContext) -> Result<(), RestoreError> {
        ctx.write_keyword("TRAVERSE")?;
        ctx.write_plain(" ")?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                ctx.write_plain(".")?;
            }
            step.restore(ctx)?;
        }
        Ok(())
    }
}
