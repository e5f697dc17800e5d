//! TRAVERSE clause parsing
//!
//! Grammar:
//!
//! ```text
//! traverse-clause := TRAVERSE step ("." step)*
//! step            := action "(" target ("," target)* ")"
//! action          := IN | OUT | BOTH | TAGS
//! target          := identifier [WHERE] filter-expr?
//! ```
//!
//! The `WHERE` keyword before a filter is optional on input; canonical
//! restored text omits it.

use log::{debug, trace};

use crate::ast::expr::Expr;
use crate::ast::table::TableRef;
use crate::ast::traverse::{TraverseAction, TraverseClause, TraverseStep, TraverseTarget};
use crate::core::{ParseError, ParseErrorKind, TokenKind};
use crate::parser::expr_parser::ExprParser;
use crate::parser::parse_context::ParseContext;

pub struct TraverseParser;

impl TraverseParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_traverse_clause(
        &mut self,
        ctx: &mut ParseContext,
    ) -> Result<TraverseClause, ParseError> {
        debug!("parsing TRAVERSE clause");
        let start_span = ctx.current_span();
        ctx.expect_token(TokenKind::Traverse)?;

        let mut steps = vec![self.parse_step(ctx)?];
        while ctx.match_token(TokenKind::Dot) {
            steps.push(self.parse_step(ctx)?);
        }

        let end_span = ctx.current_span();
        let span = ctx.merge_span(start_span.start, end_span.end);
        trace!("parsed TRAVERSE clause with {} step(s)", steps.len());
        Ok(TraverseClause::new(steps, span))
    }

    fn parse_step(&mut self, ctx: &mut ParseContext) -> Result<TraverseStep, ParseError> {
        let start_span = ctx.current_span();
        let action = self.parse_action(ctx)?;
        trace!("parsing {} step", action);

        ctx.expect_token(TokenKind::LParen)?;

        if ctx.check_token(TokenKind::RParen) {
            return Err(ParseError::syntax_error(
                "a traverse step needs at least one target",
                ctx.current_position(),
            )
            .with_hint("write the tables to traverse inside the parentheses".to_string()));
        }

        let mut targets = vec![self.parse_target(ctx)?];
        while ctx.match_token(TokenKind::Comma) {
            targets.push(self.parse_target(ctx)?);
        }

        ctx.expect_token(TokenKind::RParen)?;

        let end_span = ctx.current_span();
        let span = ctx.merge_span(start_span.start, end_span.end);
        Ok(TraverseStep::new(action, targets, span))
    }

    fn parse_action(&mut self, ctx: &mut ParseContext) -> Result<TraverseAction, ParseError> {
        let action = match ctx.current_token().kind {
            TokenKind::In => TraverseAction::In,
            TokenKind::Out => TraverseAction::Out,
            TokenKind::Both => TraverseAction::Both,
            TokenKind::Tags => TraverseAction::Tags,
            ref other => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken,
                    format!("Expected traverse action, found {:?}", other),
                    ctx.current_position(),
                )
                .with_unexpected_token(other.clone())
                .with_expected_tokens(vec![
                    "IN".to_string(),
                    "OUT".to_string(),
                    "BOTH".to_string(),
                    "TAGS".to_string(),
                ]));
            }
        };
        ctx.next_token();
        Ok(action)
    }

    fn parse_target(&mut self, ctx: &mut ParseContext) -> Result<TraverseTarget, ParseError> {
        let start_span = ctx.current_span();
        let name = ctx.expect_identifier().map_err(|e| {
            e.with_hint("each traverse target starts with a table name".to_string())
        })?;
        let table = TableRef::new(name, start_span);

        let filter = if ctx.match_token(TokenKind::Where) {
            Some(self.parse_filter(ctx)?)
        } else if !ctx.check_token(TokenKind::Comma) && !ctx.check_token(TokenKind::RParen) {
            // Bare filter, as canonical text renders it.
            Some(self.parse_filter(ctx)?)
        } else {
            None
        };

        let end_span = ctx.current_span();
        let span = ctx.merge_span(start_span.start, end_span.end);
        Ok(TraverseTarget::new(table, filter, span))
    }

    fn parse_filter(&mut self, ctx: &mut ParseContext) -> Result<Expr, ParseError> {
        ExprParser::new().parse_expression(ctx)
    }
}

impl Default for TraverseParser {
    fn default() -> Self {
        Self::new()
    }
}
