//! End-to-end test: parse a TRAVERSE clause, rewrite it through the
//! visitor protocol, restore it to canonical text.

use graph_query_parser::ast::{
    Accept, ConstantExpr, Expr, RewriteVisitor, TableRef,
};
use graph_query_parser::core::Value;
use graph_query_parser::{restore_to_string, Parser};

/// Substitutes `$name` parameters with bound constants.
struct ParameterBinder {
    name: String,
    value: Value,
}

impl RewriteVisitor for ParameterBinder {
    fn leave_expr(&mut self, expr: Expr) -> (Expr, bool) {
        match expr {
            Expr::Parameter(p) if p.name == self.name => (
                Expr::Constant(ConstantExpr::new(self.value.clone(), p.span)),
                true,
            ),
            other => (other, true),
        }
    }
}

#[test]
fn parse_bind_restore() {
    let mut parser = Parser::new("TRAVERSE OUT(orders WHERE amount > $min).BOTH(refs)");
    let clause = parser.parse_traverse().unwrap();

    let mut binder = ParameterBinder {
        name: "min".to_string(),
        value: Value::Int(100),
    };
    let (clause, ok) = clause.accept(&mut binder);
    assert!(ok);

    assert_eq!(
        restore_to_string(&clause).unwrap(),
        "TRAVERSE OUT(orders amount > 100).BOTH(refs)"
    );
}

/// Resolves table names to a qualified form during a rewrite pass.
struct QualifyTables<'a> {
    space: &'a str,
}

impl RewriteVisitor for QualifyTables<'_> {
    fn leave_table(&mut self, mut table: TableRef) -> (TableRef, bool) {
        table.name = format!("{}_{}", self.space, table.name);
        (table, true)
    }
}

#[test]
fn rewrite_reaches_every_table() {
    let clause = Parser::new("TRAVERSE IN(t1,t2).OUT(t3 WHERE id > 0)")
        .parse_traverse()
        .unwrap();

    let (clause, ok) = clause.accept(&mut QualifyTables { space: "prod" });
    assert!(ok);

    assert_eq!(
        restore_to_string(&clause).unwrap(),
        "TRAVERSE IN(prod_t1,prod_t2).OUT(prod_t3 id > 0)"
    );
}

#[test]
fn concurrent_restore_of_shared_tree() {
    use std::sync::Arc;
    use std::thread;

    let clause = Arc::new(
        Parser::new("TRAVERSE BOTH(edges weight >= 0.5)")
            .parse_traverse()
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let clause = Arc::clone(&clause);
            thread::spawn(move || restore_to_string(clause.as_ref()).unwrap())
        })
        .collect();

    let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for out in &outputs {
        assert_eq!(out, "TRAVERSE BOTH(edges weight >= 0.5)");
    }
}
