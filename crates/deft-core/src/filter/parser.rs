//! Recursive descent parser for filter expressions.

use super::ast::{Comparison, Expression};
use super::error::{FilterError, FilterResult};
use super::lexer::{FilterToken, Lexer, LogicalWord, PositionedToken};

/// Maximum nesting of parentheses and `NOT` before parsing is abandoned.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Parser for filter expressions.
///
/// # Grammar
///
/// ```text
/// expr       ::= or_expr
/// or_expr    ::= and_expr (OR and_expr)*
/// and_expr   ::= not_expr (AND not_expr)*
/// not_expr   ::= NOT not_expr | primary
/// primary    ::= comparison | "(" expr ")"
/// comparison ::= IDENT OPERATOR VALUE
/// ```
///
/// # Operator Precedence (highest to lowest)
///
/// 1. `NOT` - unary, right-associative
/// 2. `AND` / `&&` - variadic, left-associative
/// 3. `OR` - variadic, left-associative
///
/// # Example
///
/// ```
/// use deft_core::filter::{Expression, FilterParser};
///
/// let expr = FilterParser::parse("a = 1 OR b = 2 AND c = 3").unwrap();
/// match expr {
///     Expression::Or(children) => assert!(matches!(children[1], Expression::And(_))),
///     _ => panic!("expected OR at the root"),
/// }
/// ```
pub struct FilterParser {
    tokens: Vec<PositionedToken>,
    position: usize,
    /// Byte length of the input, reported as the position of end of input.
    end: usize,
    depth: usize,
}

impl FilterParser {
    /// Parses a filter expression string into an [`Expression`].
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Lex` for characters outside the language,
    /// `FilterError::Syntax` for empty input, missing operands, unbalanced
    /// parentheses or trailing input, and `FilterError::TooDeep` when nesting
    /// exceeds [`MAX_NESTING_DEPTH`].
    pub fn parse(input: &str) -> FilterResult<Expression> {
        let tokens = Lexer::new(input).tokenize_positioned()?;
        if tokens.is_empty() {
            return Err(FilterError::syntax(0, "a comparison", "end of input"));
        }

        let mut parser = Self {
            tokens,
            position: 0,
            end: input.len(),
            depth: 0,
        };
        let expr = parser.parse_expression()?;

        // The whole input must be consumed
        if let Some(remaining) = parser.peek() {
            return Err(FilterError::syntax(
                remaining.position,
                "AND, OR or end of input",
                remaining.token.to_string(),
            ));
        }

        Ok(expr)
    }

    fn peek(&self) -> Option<&PositionedToken> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<PositionedToken> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn check(&self, expected: &FilterToken) -> bool {
        self.peek().map(|t| &t.token) == Some(expected)
    }

    /// Consumes the next token or reports what was expected at end of input.
    fn expect_token(&mut self, expected: &str) -> FilterResult<PositionedToken> {
        self.advance()
            .ok_or_else(|| FilterError::syntax(self.end, expected, "end of input"))
    }

    fn enter(&mut self, position: usize) -> FilterResult<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(FilterError::TooDeep {
                position,
                limit: MAX_NESTING_DEPTH,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_expression(&mut self) -> FilterResult<Expression> {
        self.parse_or_expr()
    }

    /// Parses OR expressions: `and_expr (OR and_expr)*`
    fn parse_or_expr(&mut self) -> FilterResult<Expression> {
        let mut operands = vec![self.parse_and_expr()?];

        while self.check(&FilterToken::LogicalWord(LogicalWord::Or)) {
            self.advance();
            operands.push(self.parse_and_expr()?);
        }

        Ok(Expression::any(operands))
    }

    /// Parses AND expressions: `not_expr (AND not_expr)*`
    fn parse_and_expr(&mut self) -> FilterResult<Expression> {
        let mut operands = vec![self.parse_not_expr()?];

        while self.check(&FilterToken::LogicalWord(LogicalWord::And)) {
            self.advance();
            operands.push(self.parse_not_expr()?);
        }

        Ok(Expression::all(operands))
    }

    /// Parses unary expressions: `NOT not_expr | primary`
    fn parse_not_expr(&mut self) -> FilterResult<Expression> {
        if let Some(token) = self.peek() {
            if token.token == FilterToken::LogicalWord(LogicalWord::Not) {
                let position = token.position;
                self.advance();
                self.enter(position)?;
                let inner = self.parse_not_expr()?;
                self.leave();
                return Ok(Expression::negate(inner));
            }
        }

        self.parse_primary()
    }

    /// Parses primary expressions: `comparison | "(" expr ")"`
    fn parse_primary(&mut self) -> FilterResult<Expression> {
        let token = self.expect_token("a comparison or '('")?;

        match token.token {
            FilterToken::LeftParen => {
                self.enter(token.position)?;
                let inner = self.parse_expression()?;
                match self.advance() {
                    Some(PositionedToken {
                        token: FilterToken::RightParen,
                        ..
                    }) => {}
                    Some(other) => {
                        return Err(FilterError::syntax(
                            other.position,
                            "')'",
                            other.token.to_string(),
                        ))
                    }
                    None => return Err(FilterError::syntax(self.end, "')'", "end of input")),
                }
                self.leave();
                Ok(inner)
            }

            FilterToken::Identifier(field) => self.parse_comparison(field),

            other => Err(FilterError::syntax(
                token.position,
                "a comparison or '('",
                other.to_string(),
            )),
        }
    }

    /// Parses the `OPERATOR VALUE` tail of a comparison.
    fn parse_comparison(&mut self, field: String) -> FilterResult<Expression> {
        let op_token = self.expect_token("a comparison operator")?;
        let operator = match op_token.token {
            FilterToken::Operator(operator) => operator,
            other => {
                return Err(FilterError::syntax(
                    op_token.position,
                    "a comparison operator",
                    other.to_string(),
                ))
            }
        };

        let value_token = self.expect_token("a value")?;
        let (value, quoted) = match value_token.token {
            FilterToken::Value(value) => (value, false),
            FilterToken::Quoted(value) => (value, true),
            other => {
                return Err(FilterError::syntax(
                    value_token.position,
                    "a value",
                    other.to_string(),
                ))
            }
        };

        Ok(Expression::Comparison(Comparison {
            field,
            operator,
            value,
            quoted,
        }))
    }
}
