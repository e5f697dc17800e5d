//! Parser tests for the TRAVERSE clause.

use crate::ast::expr::Expr;
use crate::ast::traverse::TraverseAction;
use crate::core::{BinaryOp, ParseErrorKind};
use crate::format::restore_to_string;
use crate::parser::Parser;

fn parse(input: &str) -> crate::ast::traverse::TraverseClause {
    Parser::new(input).parse_traverse().unwrap()
}

#[test]
fn test_single_step_single_target() {
    let clause = parse("TRAVERSE IN(users)");
    assert_eq!(clause.steps.len(), 1);
    assert_eq!(clause.steps[0].action, TraverseAction::In);
    assert_eq!(clause.steps[0].targets.len(), 1);
    assert_eq!(clause.steps[0].targets[0].table.name, "users");
    assert!(clause.steps[0].targets[0].filter.is_none());
}

#[test]
fn test_chained_steps_with_filter() {
    let clause = parse("TRAVERSE OUT(orders WHERE amount > 100).BOTH(refs)");
    assert_eq!(clause.steps.len(), 2);
    assert_eq!(clause.steps[0].action, TraverseAction::Out);
    assert_eq!(clause.steps[1].action, TraverseAction::Both);

    let filter = clause.steps[0].targets[0].filter.as_ref().unwrap();
    match filter {
        Expr::Binary(b) => assert_eq!(b.op, BinaryOp::GreaterThan),
        other => panic!("unexpected filter: {:?}", other),
    }
}

#[test]
fn test_bare_filter_without_where() {
    // Spans differ by the width of "WHERE ", so compare canonical text.
    let with_where = parse("TRAVERSE OUT(orders WHERE amount > 100)");
    let bare = parse("TRAVERSE OUT(orders amount > 100)");
    let canonical = |clause: &crate::ast::traverse::TraverseClause| {
        restore_to_string(clause.steps[0].targets[0].filter.as_ref().unwrap()).unwrap()
    };
    assert_eq!(canonical(&with_where), canonical(&bare));
}

#[test]
fn test_multiple_targets_per_step() {
    let clause = parse("TRAVERSE IN(t1 WHERE a == 1, t2, t3 WHERE b == 2)");
    let targets = &clause.steps[0].targets;
    assert_eq!(targets.len(), 3);
    assert!(targets[0].filter.is_some());
    assert!(targets[1].filter.is_none());
    assert!(targets[2].filter.is_some());
}

#[test]
fn test_all_actions() {
    let clause = parse("TRAVERSE IN(a).OUT(b).BOTH(c).TAGS(d)");
    let actions: Vec<_> = clause.steps.iter().map(|s| s.action).collect();
    assert_eq!(
        actions,
        vec![
            TraverseAction::In,
            TraverseAction::Out,
            TraverseAction::Both,
            TraverseAction::Tags
        ]
    );
}

#[test]
fn test_case_insensitive_keywords() {
    let clause = parse("traverse out(orders where amount > 100)");
    assert_eq!(clause.steps[0].action, TraverseAction::Out);
}

#[test]
fn test_canonical_round_trip() {
    for input in [
        "TRAVERSE IN(users)",
        "TRAVERSE OUT(orders amount > 100).BOTH(refs)",
        "TRAVERSE IN(t1 a == 1,t2).TAGS(t3)",
        "TRAVERSE BOTH(edges size(labels) > 0 AND weight >= $w)",
        "TRAVERSE IN(t -(-x) > 0)",
    ] {
        let clause = parse(input);
        let restored = restore_to_string(&clause).unwrap();
        assert_eq!(restored, input, "canonical text must round-trip");
        // Reparsing canonical text yields a structurally equal clause,
        // spans aside.
        let reparsed = parse(&restored);
        assert_eq!(restore_to_string(&reparsed).unwrap(), restored);
    }
}

#[test]
fn test_action_keywords_usable_as_names() {
    // IN/OUT/BOTH/TAGS are contextual: outside the action position they are
    // ordinary table and variable names.
    let clause = parse("TRAVERSE TAGS(tags WHERE size(tags) > 0)");
    assert_eq!(clause.steps[0].targets[0].table.name, "tags");
    assert_eq!(
        restore_to_string(&clause).unwrap(),
        "TRAVERSE TAGS(tags size(tags) > 0)"
    );
}

#[test]
fn test_missing_action_is_rejected() {
    let err = Parser::new("TRAVERSE FOO(users)").parse_traverse().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    assert!(err.expected_tokens.iter().any(|t| t == "BOTH"));
}

#[test]
fn test_empty_target_list_is_rejected() {
    let err = Parser::new("TRAVERSE IN()").parse_traverse().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::SyntaxError);
    assert!(!err.hints.is_empty());
}

#[test]
fn test_missing_parens_is_rejected() {
    let err = Parser::new("TRAVERSE IN users").parse_traverse().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
}

#[test]
fn test_empty_clause_is_rejected() {
    assert!(Parser::new("TRAVERSE").parse_traverse().is_err());
    assert!(Parser::new("").parse_traverse().is_err());
}

#[test]
fn test_trailing_input_is_rejected() {
    let err = Parser::new("TRAVERSE IN(users) garbage")
        .parse_traverse()
        .unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TrailingInput);
}

#[test]
fn test_trailing_dot_is_rejected() {
    assert!(Parser::new("TRAVERSE IN(users).").parse_traverse().is_err());
}

#[test]
fn test_lex_errors_surface() {
    let err = Parser::new("TRAVERSE IN(\"unterminated")
        .parse_traverse()
        .unwrap_err();
    // Either the parser stumbles on the bad literal or the collected lex
    // error is reported; both carry a position.
    assert!(err.position.line >= 1);
}

#[test]
fn test_error_positions() {
    let err = Parser::new("TRAVERSE\n  FOO(users)").parse_traverse().unwrap_err();
    assert_eq!(err.position.line, 2);
}
