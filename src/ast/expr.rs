//! Filter expression AST
//!
//! Enum-based expression nodes used as traverse target filters. Each
//! variant struct carries its source span and a `new` constructor.

use serde::{Deserialize, Serialize};

use crate::core::{BinaryOp, Span, UnaryOp, Value};
use crate::format::{Restore, RestoreContext, RestoreError};

/// Expression enum - the core filter AST node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Constant(ConstantExpr),
    Parameter(ParameterExpr),
    Variable(VariableExpr),
    PropertyAccess(PropertyAccessExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    FunctionCall(FunctionCallExpr),
    List(ListExpr),
}

impl Expr {
    /// Source span of the expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Constant(e) => e.span,
            Expr::Parameter(e) => e.span,
            Expr::Variable(e) => e.span,
            Expr::PropertyAccess(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::FunctionCall(e) => e.span,
            Expr::List(e) => e.span,
        }
    }

    /// Whether the expression evaluates to the same value regardless of
    /// bindings (no variables, parameters or function calls).
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Constant(_) => true,
            Expr::Binary(e) => e.left.is_constant() && e.right.is_constant(),
            Expr::Unary(e) => e.operand.is_constant(),
            Expr::List(e) => e.elements.iter().all(|elem| elem.is_constant()),
            _ => false,
        }
    }

    /// Restore an operand, parenthesizing binary children that bind looser
    /// than `min_prec` so the canonical text re-parses to the same tree.
    fn restore_operand(
        expr: &Expr,
        min_prec: u8,
        ctx: &mut dyn RestoreContext,
    ) -> Result<(), RestoreError> {
        let needs_parens = matches!(expr, Expr::Binary(b) if b.op.precedence() < min_prec);
        if needs_parens {
            ctx.write_plain("(")?;
        }
        expr.restore(ctx)?;
        if needs_parens {
            ctx.write_plain(")")?;
        }
        Ok(())
    }
}

impl Restore for Expr {
    fn restore(&self, ctx: &mut dyn RestoreContext) -> Result<(), RestoreError> {
        match self {
            Expr::Constant(e) => ctx.write_plain(&e.value.to_literal()),
            Expr::Parameter(e) => ctx.write_plain_fmt(format_args!("${}", e.name)),
            Expr::Variable(e) => ctx.write_plain(&e.name),
            Expr::PropertyAccess(e) => {
                let compound = matches!(*e.object, Expr::Binary(_) | Expr::Unary(_));
                if compound {
                    ctx.write_plain("(")?;
                }
                e.object.restore(ctx)?;
                if compound {
                    ctx.write_plain(")")?;
                }
                ctx.write_plain_fmt(format_args!(".{}", e.property))
            }
            Expr::Unary(e) => {
                match e.op {
                    UnaryOp::Not => {
                        ctx.write_keyword("NOT")?;
                        ctx.write_plain(" ")?;
                    }
                    UnaryOp::Negate => ctx.write_plain("-")?,
                }
                // Adjacent minus signs would re-lex as a line comment, so an
                // operand whose spelling starts with `-` gets parentheses.
                let needs_parens = match &*e.operand {
                    Expr::Binary(_) => true,
                    Expr::Unary(inner) => {
                        e.op == UnaryOp::Negate && inner.op == UnaryOp::Negate
                    }
                    Expr::Constant(c) => e.op == UnaryOp::Negate && c.value.is_negative(),
                    _ => false,
                };
                if needs_parens {
                    ctx.write_plain("(")?;
                    e.operand.restore(ctx)?;
                    ctx.write_plain(")")
                } else {
                    e.operand.restore(ctx)
                }
            }
            Expr::Binary(e) => {
                let prec = e.op.precedence();
                Expr::restore_operand(&e.left, prec, ctx)?;
                ctx.write_plain(" ")?;
                match e.op {
                    BinaryOp::And | BinaryOp::Or | BinaryOp::Xor => {
                        ctx.write_keyword(e.op.symbol())?
                    }
                    _ => ctx.write_plain(e.op.symbol())?,
                }
                ctx.write_plain(" ")?;
                // Left-associative grammar: an equal-precedence right child
                // came from explicit parentheses, keep them.
                Expr::restore_operand(&e.right, prec + 1, ctx)
            }
            Expr::FunctionCall(e) => {
                ctx.write_plain_fmt(format_args!("{}(", e.name))?;
                for (i, arg) in e.args.iter().enumerate() {
                    if i > 0 {
                        ctx.write_plain(", ")?;
                    }
                    arg.restore(ctx)?;
                }
                ctx.write_plain(")")
            }
            Expr::List(e) => {
                ctx.write_plain("[")?;
                for (i, elem) in e.elements.iter().enumerate() {
                    if i > 0 {
                        ctx.write_plain(", ")?;
                    }
                    elem.restore(ctx)?;
                }
                ctx.write_plain("]")
            }
        }
    }
}

/// Literal constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantExpr {
    pub span: Span,
    pub value: Value,
}

impl ConstantExpr {
    pub fn new(value: Value, span: Span) -> Self {
        Self { span, value }
    }
}

/// Placeholder parameter, written `$name` in query text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterExpr {
    pub span: Span,
    pub name: String,
}

impl ParameterExpr {
    pub fn new(name: String, span: Span) -> Self {
        Self { span, name }
    }
}

/// Bare identifier, usually a property of the traversed element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableExpr {
    pub span: Span,
    pub name: String,
}

impl VariableExpr {
    pub fn new(name: String, span: Span) -> Self {
        Self { span, name }
    }
}

/// `object.property` access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAccessExpr {
    pub span: Span,
    pub object: Box<Expr>,
    pub property: String,
}

impl PropertyAccessExpr {
    pub fn new(object: Expr, property: String, span: Span) -> Self {
        Self {
            span,
            object: Box::new(object),
            property,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub span: Span,
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

impl UnaryExpr {
    pub fn new(op: UnaryOp, operand: Expr, span: Span) -> Self {
        Self {
            span,
            op,
            operand: Box::new(operand),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub span: Span,
    pub left: Box<Expr>,
    pub op: BinaryOp,
    pub right: Box<Expr>,
}

impl BinaryExpr {
    pub fn new(left: Expr, op: BinaryOp, right: Expr, span: Span) -> Self {
        Self {
            span,
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallExpr {
    pub span: Span,
    pub name: String,
    pub args: Vec<Expr>,
}

impl FunctionCallExpr {
    pub fn new(name: String, args: Vec<Expr>, span: Span) -> Self {
        Self { span, name, args }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListExpr {
    pub span: Span,
    pub elements: Vec<Expr>,
}

impl ListExpr {
    pub fn new(elements: Vec<Expr>, span: Span) -> Self {
        Self { span, elements }
    }
}
