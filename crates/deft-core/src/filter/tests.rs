//! Tests for the filter parser.

use super::*;

fn cmp(field: &str, op: ComparisonOperator, value: &str) -> Expression {
    Expression::compare(field, op, value)
}

fn eq(field: &str, value: &str) -> Expression {
    cmp(field, ComparisonOperator::Eq, value)
}

fn eq_quoted(field: &str, value: &str) -> Expression {
    Expression::Comparison(Comparison::new_quoted(field, ComparisonOperator::Eq, value))
}

// ==================== Comparison Tests ====================

#[test]
fn test_parse_simple_comparison() {
    let expr = FilterParser::parse("status = open").unwrap();
    assert_eq!(expr, eq("status", "open"));
}

#[test]
fn test_parse_every_operator() {
    for op in ComparisonOperator::ALL {
        let input = format!("age {} 18", op.symbol());
        let expr = FilterParser::parse(&input).unwrap();
        assert_eq!(expr, cmp("age", op, "18"), "input: {input}");
    }
}

#[test]
fn test_parse_quoted_values() {
    assert_eq!(
        FilterParser::parse("status = 'in progress'").unwrap(),
        eq_quoted("status", "in progress")
    );
    assert_eq!(
        FilterParser::parse(r#"status = "in progress""#).unwrap(),
        eq_quoted("status", "in progress")
    );
    assert_eq!(
        FilterParser::parse("status = ''").unwrap(),
        eq_quoted("status", "")
    );
}

#[test]
fn test_parse_quoted_number_stays_quoted() {
    assert_eq!(
        FilterParser::parse("code = '123'").unwrap(),
        eq_quoted("code", "123")
    );
    assert_eq!(FilterParser::parse("code = 123").unwrap(), eq("code", "123"));
    assert_ne!(eq_quoted("code", "123"), eq("code", "123"));
}

#[test]
fn test_parse_with_surrounding_whitespace() {
    assert_eq!(FilterParser::parse("  a = 1  ").unwrap(), eq("a", "1"));
    assert_eq!(FilterParser::parse("\ta=1\n").unwrap(), eq("a", "1"));
}

#[test]
fn test_parse_keyword_as_value() {
    assert_eq!(FilterParser::parse("mode = or").unwrap(), eq("mode", "or"));
}

// ==================== Boolean Operator Tests ====================

#[test]
fn test_parse_and() {
    let expr = FilterParser::parse("a = 1 AND b = 2").unwrap();
    assert_eq!(expr, Expression::And(vec![eq("a", "1"), eq("b", "2")]));
}

#[test]
fn test_parse_double_ampersand_is_and() {
    let expr = FilterParser::parse("a = 1 && b = 2").unwrap();
    assert_eq!(expr, Expression::And(vec![eq("a", "1"), eq("b", "2")]));
}

#[test]
fn test_parse_or() {
    let expr = FilterParser::parse("a = 1 or b = 2").unwrap();
    assert_eq!(expr, Expression::Or(vec![eq("a", "1"), eq("b", "2")]));
}

#[test]
fn test_parse_not() {
    let expr = FilterParser::parse("NOT a = 1").unwrap();
    assert_eq!(expr, Expression::negate(eq("a", "1")));
}

#[test]
fn test_parse_double_not() {
    let expr = FilterParser::parse("not not a = 1").unwrap();
    assert_eq!(
        expr,
        Expression::negate(Expression::negate(eq("a", "1")))
    );
}

#[test]
fn test_parse_and_is_variadic() {
    let expr = FilterParser::parse("a = 1 AND b = 2 AND c = 3").unwrap();
    assert_eq!(
        expr,
        Expression::And(vec![eq("a", "1"), eq("b", "2"), eq("c", "3")])
    );
}

#[test]
fn test_parse_or_is_variadic() {
    let expr = FilterParser::parse("a = 1 OR b = 2 OR c = 3").unwrap();
    assert_eq!(
        expr,
        Expression::Or(vec![eq("a", "1"), eq("b", "2"), eq("c", "3")])
    );
}

// ==================== Precedence Tests ====================

#[test]
fn test_and_binds_tighter_than_or() {
    let expr = FilterParser::parse("a=1 OR b=2 AND c=3").unwrap();
    assert_eq!(
        expr,
        Expression::Or(vec![
            eq("a", "1"),
            Expression::And(vec![eq("b", "2"), eq("c", "3")]),
        ])
    );
}

#[test]
fn test_and_binds_tighter_than_or_on_the_left() {
    let expr = FilterParser::parse("a=1 AND b=2 OR c=3").unwrap();
    assert_eq!(
        expr,
        Expression::Or(vec![
            Expression::And(vec![eq("a", "1"), eq("b", "2")]),
            eq("c", "3"),
        ])
    );
}

#[test]
fn test_not_binds_tighter_than_and() {
    let expr = FilterParser::parse("NOT a=1 AND b=2").unwrap();
    assert_eq!(
        expr,
        Expression::And(vec![Expression::negate(eq("a", "1")), eq("b", "2")])
    );
}

#[test]
fn test_parentheses_override_precedence() {
    let expr = FilterParser::parse("(a=1 OR b=2) AND c=3").unwrap();
    assert_eq!(
        expr,
        Expression::And(vec![
            Expression::Or(vec![eq("a", "1"), eq("b", "2")]),
            eq("c", "3"),
        ])
    );
}

#[test]
fn test_not_applies_to_group() {
    let expr = FilterParser::parse("NOT (a=1 AND b=2)").unwrap();
    assert_eq!(
        expr,
        Expression::negate(Expression::And(vec![eq("a", "1"), eq("b", "2")]))
    );
}

#[test]
fn test_redundant_parentheses() {
    assert_eq!(FilterParser::parse("((a = 1))").unwrap(), eq("a", "1"));
}

#[test]
fn test_nested_group_is_kept_as_child() {
    let expr = FilterParser::parse("a=1 AND (b=2 AND c=3)").unwrap();
    assert_eq!(
        expr,
        Expression::And(vec![
            eq("a", "1"),
            Expression::And(vec![eq("b", "2"), eq("c", "3")]),
        ])
    );
}

// ==================== Error Tests ====================

#[test]
fn test_parse_empty_input() {
    let err = FilterParser::parse("").unwrap_err();
    assert!(err.is_syntax());
    assert!(matches!(err, FilterError::Syntax { position: 0, .. }));
}

#[test]
fn test_parse_whitespace_only() {
    let err = FilterParser::parse("   \t ").unwrap_err();
    assert!(err.is_syntax());
}

#[test]
fn test_parse_unclosed_parenthesis() {
    let err = FilterParser::parse("a = 1 AND (b = 2").unwrap_err();
    assert_eq!(err, FilterError::syntax(16, "')'", "end of input"));
}

#[test]
fn test_parse_unopened_parenthesis() {
    let err = FilterParser::parse("a = 1)").unwrap_err();
    assert_eq!(
        err,
        FilterError::syntax(5, "AND, OR or end of input", "')'")
    );
}

#[test]
fn test_parse_empty_parentheses() {
    let err = FilterParser::parse("()").unwrap_err();
    assert_eq!(err, FilterError::syntax(1, "a comparison or '('", "')'"));
}

#[test]
fn test_parse_missing_operand_after_and() {
    let err = FilterParser::parse("a = 1 AND").unwrap_err();
    assert_eq!(
        err,
        FilterError::syntax(9, "a comparison or '('", "end of input")
    );
}

#[test]
fn test_parse_missing_operand_before_or() {
    let err = FilterParser::parse("OR a = 1").unwrap_err();
    assert_eq!(err, FilterError::syntax(0, "a comparison or '('", "'OR'"));
}

#[test]
fn test_parse_missing_value() {
    let err = FilterParser::parse("a =").unwrap_err();
    assert_eq!(err, FilterError::syntax(3, "a value", "end of input"));
}

#[test]
fn test_parse_missing_operator() {
    let err = FilterParser::parse("a 1").unwrap_err();
    assert_eq!(
        err,
        FilterError::syntax(2, "a comparison operator", "value '1'")
    );
}

#[test]
fn test_parse_double_equals_is_unknown_operator() {
    let err = FilterParser::parse("a == 1").unwrap_err();
    assert_eq!(err, FilterError::syntax(3, "a value", "operator '='"));
}

#[test]
fn test_parse_field_must_be_identifier() {
    let err = FilterParser::parse("1a = 2").unwrap_err();
    assert_eq!(
        err,
        FilterError::syntax(0, "a comparison or '('", "value '1a'")
    );
}

#[test]
fn test_parse_trailing_input() {
    let err = FilterParser::parse("a = 1 b = 2").unwrap_err();
    assert_eq!(
        err,
        FilterError::syntax(6, "AND, OR or end of input", "identifier 'b'")
    );
}

#[test]
fn test_parse_bare_identifier() {
    let err = FilterParser::parse("status").unwrap_err();
    assert!(err.is_syntax());
}

#[test]
fn test_parse_lex_error_propagates() {
    let err = FilterParser::parse("a = 1 | b = 2").unwrap_err();
    assert_eq!(err, FilterError::lex("|", 6));
    assert!(!err.is_syntax());
}

// ==================== Nesting Limit Tests ====================

#[test]
fn test_parse_nesting_at_limit() {
    let input = format!(
        "{}a = 1{}",
        "(".repeat(MAX_NESTING_DEPTH),
        ")".repeat(MAX_NESTING_DEPTH)
    );
    assert_eq!(FilterParser::parse(&input).unwrap(), eq("a", "1"));
}

#[test]
fn test_parse_nesting_over_limit() {
    let input = format!(
        "{}a = 1{}",
        "(".repeat(MAX_NESTING_DEPTH + 1),
        ")".repeat(MAX_NESTING_DEPTH + 1)
    );
    let err = FilterParser::parse(&input).unwrap_err();
    assert_eq!(
        err,
        FilterError::TooDeep {
            position: MAX_NESTING_DEPTH,
            limit: MAX_NESTING_DEPTH,
        }
    );
    assert!(err.is_syntax());
}

#[test]
fn test_parse_not_chain_over_limit() {
    let input = format!("{}a = 1", "NOT ".repeat(MAX_NESTING_DEPTH + 1));
    let err = FilterParser::parse(&input).unwrap_err();
    assert!(matches!(err, FilterError::TooDeep { .. }));
}

#[test]
fn test_parse_deep_input_does_not_overflow_stack() {
    let input = format!("{}a = 1", "(".repeat(100_000));
    let err = FilterParser::parse(&input).unwrap_err();
    assert!(matches!(err, FilterError::TooDeep { .. }));
}
