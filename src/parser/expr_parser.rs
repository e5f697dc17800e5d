//! Filter expression parsing
//!
//! Precedence-climbing parser over the token stream. Precedence levels
//! mirror [`BinaryOp::precedence`]; `NOT` sits between `AND` and the
//! comparison operators, so `NOT a == b` negates the whole comparison.

use crate::ast::expr::*;
use crate::core::{BinaryOp, ParseError, ParseErrorKind, Span, TokenKind, UnaryOp, Value};
use crate::parser::parse_context::ParseContext;

/// Binding strength of prefix `NOT`/`!`.
const NOT_PRECEDENCE: u8 = 3;

pub struct ExprParser;

impl ExprParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_expression(&mut self, ctx: &mut ParseContext) -> Result<Expr, ParseError> {
        self.parse_binary(ctx, 1)
    }

    fn parse_binary(&mut self, ctx: &mut ParseContext, min_prec: u8) -> Result<Expr, ParseError> {
        ctx.enter_recursion()?;
        let result = self.parse_binary_inner(ctx, min_prec);
        ctx.exit_recursion();
        result
    }

    fn parse_binary_inner(
        &mut self,
        ctx: &mut ParseContext,
        min_prec: u8,
    ) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary(ctx)?;

        while let Some(op) = Self::binary_op(&ctx.current_token().kind) {
            if op.precedence() < min_prec {
                break;
            }
            ctx.next_token();
            // Left-associative: the right operand only takes tighter binders.
            let right = self.parse_binary(ctx, op.precedence() + 1)?;
            let span = left.span().merge(right.span());
            left = Expr::Binary(BinaryExpr::new(left, op, right, span));
        }

        Ok(left)
    }

    fn parse_unary(&mut self, ctx: &mut ParseContext) -> Result<Expr, ParseError> {
        let start_span = ctx.current_span();
        match ctx.current_token().kind {
            TokenKind::Not | TokenKind::NotOp => {
                ctx.next_token();
                let operand = self.parse_binary(ctx, NOT_PRECEDENCE + 1)?;
                let span = start_span.merge(operand.span());
                Ok(Expr::Unary(UnaryExpr::new(UnaryOp::Not, operand, span)))
            }
            TokenKind::Minus => {
                ctx.next_token();
                let operand = self.parse_unary(ctx)?;
                let span = start_span.merge(operand.span());
                Ok(Expr::Unary(UnaryExpr::new(UnaryOp::Negate, operand, span)))
            }
            _ => self.parse_postfix(ctx),
        }
    }

    /// Primary expression plus `.property` access chains.
    fn parse_postfix(&mut self, ctx: &mut ParseContext) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary(ctx)?;

        while ctx.check_token(TokenKind::Dot) {
            ctx.next_token();
            let property = ctx.expect_identifier()?;
            let span = expr.span().merge(ctx.current_span());
            expr = Expr::PropertyAccess(PropertyAccessExpr::new(expr, property, span));
        }

        Ok(expr)
    }

    fn parse_primary(&mut self, ctx: &mut ParseContext) -> Result<Expr, ParseError> {
        let span = ctx.current_span();
        let kind = ctx.current_token().kind.clone();
        match kind {
            TokenKind::IntegerLiteral(n) => {
                ctx.next_token();
                Ok(Expr::Constant(ConstantExpr::new(Value::Int(n), span)))
            }
            TokenKind::FloatLiteral(x) => {
                ctx.next_token();
                Ok(Expr::Constant(ConstantExpr::new(Value::Float(x), span)))
            }
            TokenKind::StringLiteral(s) => {
                ctx.next_token();
                Ok(Expr::Constant(ConstantExpr::new(Value::String(s), span)))
            }
            TokenKind::BooleanLiteral(b) => {
                ctx.next_token();
                Ok(Expr::Constant(ConstantExpr::new(Value::Bool(b), span)))
            }
            TokenKind::Null => {
                ctx.next_token();
                Ok(Expr::Constant(ConstantExpr::new(Value::Null, span)))
            }
            TokenKind::Dollar => {
                ctx.next_token();
                let name = ctx.expect_identifier()?;
                Ok(Expr::Parameter(ParameterExpr::new(name, span)))
            }
            TokenKind::Identifier(name) => {
                ctx.next_token();
                self.parse_name(ctx, name, span)
            }
            // Action keywords are contextual and double as plain names in
            // expression position.
            TokenKind::In | TokenKind::Out | TokenKind::Both | TokenKind::Tags => {
                let name = ctx.current_token().lexeme.clone();
                ctx.next_token();
                self.parse_name(ctx, name, span)
            }
            TokenKind::LParen => {
                ctx.next_token();
                let expr = self.parse_expression(ctx)?;
                ctx.expect_token(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                ctx.next_token();
                let mut elements = Vec::new();
                if !ctx.check_token(TokenKind::RBracket) {
                    loop {
                        elements.push(self.parse_expression(ctx)?);
                        if !ctx.match_token(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                ctx.expect_token(TokenKind::RBracket)?;
                let end_span = ctx.current_span();
                Ok(Expr::List(ListExpr::new(elements, span.merge(end_span))))
            }
            TokenKind::Eof => Err(ParseError::unexpected_end_of_input(ctx.current_position())),
            other => Err(ParseError::new(
                ParseErrorKind::UnexpectedToken,
                format!("Expected expression, found {:?}", other),
                ctx.current_position(),
            )
            .with_unexpected_token(other)),
        }
    }

    /// A name already consumed: either a function call or a bare variable.
    fn parse_name(
        &mut self,
        ctx: &mut ParseContext,
        name: String,
        span: Span,
    ) -> Result<Expr, ParseError> {
        if ctx.match_token(TokenKind::LParen) {
            let args = self.parse_call_args(ctx)?;
            let end_span = ctx.current_span();
            Ok(Expr::FunctionCall(FunctionCallExpr::new(
                name,
                args,
                span.merge(end_span),
            )))
        } else {
            Ok(Expr::Variable(VariableExpr::new(name, span)))
        }
    }

    fn parse_call_args(&mut self, ctx: &mut ParseContext) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if !ctx.check_token(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression(ctx)?);
                if !ctx.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        ctx.expect_token(TokenKind::RParen)?;
        Ok(args)
    }

    fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
        let op = match kind {
            TokenKind::Or => BinaryOp::Or,
            TokenKind::Xor => BinaryOp::Xor,
            TokenKind::And => BinaryOp::And,
            TokenKind::Eq => BinaryOp::Equal,
            TokenKind::Ne => BinaryOp::NotEqual,
            TokenKind::Lt => BinaryOp::LessThan,
            TokenKind::Le => BinaryOp::LessThanOrEqual,
            TokenKind::Gt => BinaryOp::GreaterThan,
            TokenKind::Ge => BinaryOp::GreaterThanOrEqual,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Subtract,
            TokenKind::Star => BinaryOp::Multiply,
            TokenKind::Div => BinaryOp::Divide,
            TokenKind::Mod => BinaryOp::Modulo,
            _ => return None,
        };
        Some(op)
    }
}

impl Default for ExprParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::restore_to_string;

    fn parse(input: &str) -> Expr {
        let mut ctx = ParseContext::new(input);
        let expr = ExprParser::new().parse_expression(&mut ctx).unwrap();
        assert!(ctx.at_end(), "trailing input after expression");
        expr
    }

    fn canonical(input: &str) -> String {
        restore_to_string(&parse(input)).unwrap()
    }

    #[test]
    fn test_comparison() {
        assert_eq!(canonical("amount > 100"), "amount > 100");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(canonical("a + b * c"), "a + b * c");
        assert_eq!(canonical("(a + b) * c"), "(a + b) * c");
        assert_eq!(canonical("a > 1 AND b < 2 OR c == 3"), "a > 1 AND b < 2 OR c == 3");
    }

    #[test]
    fn test_explicit_grouping_survives() {
        assert_eq!(canonical("a AND (b OR c)"), "a AND (b OR c)");
    }

    #[test]
    fn test_not_binds_over_comparison() {
        let expr = parse("NOT a == b AND c");
        // (NOT (a == b)) AND c
        match expr {
            Expr::Binary(b) => {
                assert_eq!(b.op, BinaryOp::And);
                assert!(matches!(*b.left, Expr::Unary(_)));
            }
            other => panic!("unexpected shape: {:?}", other),
        }
        assert_eq!(canonical("NOT a == b AND c"), "NOT (a == b) AND c");
    }

    #[test]
    fn test_property_access_and_calls() {
        assert_eq!(canonical("order.total >= $min"), "order.total >= $min");
        assert_eq!(canonical("size(tags) > 0"), "size(tags) > 0");
        assert_eq!(canonical("f(a, b + 1)"), "f(a, b + 1)");
    }

    #[test]
    fn test_literals() {
        assert_eq!(canonical("\"x\""), "\"x\"");
        assert_eq!(canonical("1.5"), "1.5");
        assert_eq!(canonical("true"), "true");
        assert_eq!(canonical("NULL"), "NULL");
        assert_eq!(canonical("[1, 2, 3]"), "[1, 2, 3]");
    }

    #[test]
    fn test_negation() {
        assert_eq!(canonical("-x + 1"), "-x + 1");
        assert_eq!(canonical("-(x + 1)"), "-(x + 1)");
    }

    #[test]
    fn test_double_negation_round_trips() {
        // Adjacent minus signs would re-lex as a line comment.
        assert_eq!(canonical("- -x > 0"), "-(-x) > 0");
        assert_eq!(canonical("-(-x) > 0"), "-(-x) > 0");
    }

    #[test]
    fn test_action_keywords_as_identifiers() {
        assert_eq!(canonical("out.weight > in"), "out.weight > in");
        assert_eq!(canonical("both(tags) > 0"), "both(tags) > 0");
    }

    #[test]
    fn test_unexpected_token_error() {
        let mut ctx = ParseContext::new(",");
        let err = ExprParser::new().parse_expression(&mut ctx).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_recursion_limit() {
        let deep = "(".repeat(300) + "1" + &")".repeat(300);
        let mut ctx = ParseContext::new(&deep);
        let err = ExprParser::new().parse_expression(&mut ctx).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::RecursionLimitExceeded);
    }
}
