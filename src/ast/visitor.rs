//! Rewriting visitor protocol
//!
//! Every node category participates in a uniform enter/children/leave
//! rewrite walk. The visitor receives each node by value on enter and may
//! substitute it; the node's children are then offered to the same visitor
//! so rewrites apply transitively; finally the visitor sees the node again
//! on leave for a last substitution.
//!
//! Continuation flags: a `false` from enter skips the children fan-out (the
//! node still receives its leave call); a `false` from a child stops the
//! fan-out over the remaining children; the flag returned by [`Accept`] is
//! the conjunction of the children outcome and the leave flag and tells the
//! caller whether sibling traversal should proceed. The adapter itself never
//! fails; failure semantics belong to the visitor.

use crate::ast::expr::Expr;
use crate::ast::table::TableRef;
use crate::ast::traverse::TraverseClause;
use crate::core::Span;

/// Enter/leave hooks per node category. All defaults are identity and
/// continue, so a visitor only overrides what it cares about.
pub trait RewriteVisitor {
    fn enter_clause(&mut self, clause: TraverseClause) -> (TraverseClause, bool) {
        (clause, true)
    }

    fn leave_clause(&mut self, clause: TraverseClause) -> (TraverseClause, bool) {
        (clause, true)
    }

    fn enter_table(&mut self, table: TableRef) -> (TableRef, bool) {
        (table, true)
    }

    fn leave_table(&mut self, table: TableRef) -> (TableRef, bool) {
        (table, true)
    }

    fn enter_expr(&mut self, expr: Expr) -> (Expr, bool) {
        (expr, true)
    }

    fn leave_expr(&mut self, expr: Expr) -> (Expr, bool) {
        (expr, true)
    }
}

/// Participation in the rewrite walk. Takes the node by value and returns
/// the (possibly substituted) node plus the continuation flag.
pub trait Accept: Sized {
    fn accept<V: RewriteVisitor>(self, visitor: &mut V) -> (Self, bool);
}

impl Accept for TableRef {
    fn accept<V: RewriteVisitor>(self, visitor: &mut V) -> (Self, bool) {
        let (table, _) = visitor.enter_table(self);
        visitor.leave_table(table)
    }
}

impl Accept for Expr {
    fn accept<V: RewriteVisitor>(self, visitor: &mut V) -> (Self, bool) {
        let (mut expr, descend) = visitor.enter_expr(self);
        let mut ok = true;

        if descend {
            expr = match expr {
                Expr::Binary(mut e) => {
                    let (left, cont) = (*e.left).accept(visitor);
                    e.left = Box::new(left);
                    ok = cont;
                    if ok {
                        let (right, cont) = (*e.right).accept(visitor);
                        e.right = Box::new(right);
                        ok = cont;
                    }
                    Expr::Binary(e)
                }
                Expr::Unary(mut e) => {
                    let (operand, cont) = (*e.operand).accept(visitor);
                    e.operand = Box::new(operand);
                    ok = cont;
                    Expr::Unary(e)
                }
                Expr::PropertyAccess(mut e) => {
                    let (object, cont) = (*e.object).accept(visitor);
                    e.object = Box::new(object);
                    ok = cont;
                    Expr::PropertyAccess(e)
                }
                Expr::FunctionCall(mut e) => {
                    e.args = accept_all(e.args, visitor, &mut ok);
                    Expr::FunctionCall(e)
                }
                Expr::List(mut e) => {
                    e.elements = accept_all(e.elements, visitor, &mut ok);
                    Expr::List(e)
                }
                leaf @ (Expr::Constant(_) | Expr::Parameter(_) | Expr::Variable(_)) => leaf,
            };
        }

        let (expr, cont) = visitor.leave_expr(expr);
        (expr, ok && cont)
    }
}

impl Accept for TraverseClause {
    fn accept<V: RewriteVisitor>(self, visitor: &mut V) -> (Self, bool) {
        let (mut clause, descend) = visitor.enter_clause(self);
        let mut ok = true;

        if descend {
            for step in &mut clause.steps {
                for target in &mut step.targets {
                    if ok {
                        let placeholder = TableRef::new(String::new(), Span::default());
                        let table = std::mem::replace(&mut target.table, placeholder);
                        let (table, cont) = table.accept(visitor);
                        target.table = table;
                        ok = cont;
                    }
                    if ok {
                        if let Some(filter) = target.filter.take() {
                            let (filter, cont) = filter.accept(visitor);
                            target.filter = Some(filter);
                            ok = cont;
                        }
                    }
                    if !ok {
                        break;
                    }
                }
                if !ok {
                    break;
                }
            }
        }

        let (clause, cont) = visitor.leave_clause(clause);
        (clause, ok && cont)
    }
}

/// Offer each element to the visitor in order, stopping the fan-out once a
/// child requests cancellation; unvisited elements pass through unchanged.
fn accept_all<V: RewriteVisitor>(items: Vec<Expr>, visitor: &mut V, ok: &mut bool) -> Vec<Expr> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if *ok {
            let (item, cont) = item.accept(visitor);
            *ok = cont;
            out.push(item);
        } else {
            out.push(item);
        }
    }
    out
}
