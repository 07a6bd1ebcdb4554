//! Abstract Syntax Tree (AST) for filter expressions.

use std::fmt;

/// A comparison operator between a column and a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `~`, substring containment.
    Like,
    /// `!~`, negated substring containment.
    NotLike,
}

impl ComparisonOperator {
    /// All operators, in lexer match order.
    pub const ALL: [ComparisonOperator; 8] = [
        ComparisonOperator::NotEq,
        ComparisonOperator::NotLike,
        ComparisonOperator::Ge,
        ComparisonOperator::Le,
        ComparisonOperator::Eq,
        ComparisonOperator::Like,
        ComparisonOperator::Gt,
        ComparisonOperator::Lt,
    ];

    /// The operator as written in a filter expression.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::NotEq => "!=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Ge => ">=",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Like => "~",
            ComparisonOperator::NotLike => "!~",
        }
    }

    /// The operator as emitted into SQL.
    pub fn sql(self) -> &'static str {
        match self {
            ComparisonOperator::Like => "LIKE",
            ComparisonOperator::NotLike => "NOT LIKE",
            other => other.symbol(),
        }
    }

    /// Returns true for the fuzzy-match operators.
    pub fn is_fuzzy(self) -> bool {
        matches!(self, ComparisonOperator::Like | ComparisonOperator::NotLike)
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single `field OP value` test. Leaf of the expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Column name.
    pub field: String,
    /// Comparison operator.
    pub operator: ComparisonOperator,
    /// Literal value, quotes already stripped.
    pub value: String,
    /// The value was written in quotes, so it is text even if it looks
    /// numeric.
    pub quoted: bool,
}

impl Comparison {
    /// Creates a comparison.
    pub fn new(
        field: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            quoted: false,
        }
    }

    /// Creates a comparison against a quoted literal.
    pub fn new_quoted(
        field: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            quoted: true,
            ..Self::new(field, operator, value)
        }
    }
}

/// Represents a parsed filter expression.
///
/// `And` and `Or` are variadic and always hold at least two children; the
/// parser collapses single-operand groups into the operand itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// A leaf comparison.
    Comparison(Comparison),

    /// Logical NOT of an expression.
    Not(Box<Expression>),

    /// Logical AND of two or more expressions, in source order.
    And(Vec<Expression>),

    /// Logical OR of two or more expressions, in source order.
    Or(Vec<Expression>),
}

impl Expression {
    /// Creates a comparison leaf.
    ///
    /// # Example
    ///
    /// ```
    /// use deft_core::filter::{ComparisonOperator, Expression};
    ///
    /// let expr = Expression::compare("age", ComparisonOperator::Ge, "18");
    /// assert!(matches!(expr, Expression::Comparison(_)));
    /// ```
    pub fn compare(
        field: impl Into<String>,
        operator: ComparisonOperator,
        value: impl Into<String>,
    ) -> Self {
        Expression::Comparison(Comparison::new(field, operator, value))
    }

    /// Creates a NOT expression.
    pub fn negate(inner: Expression) -> Self {
        Expression::Not(Box::new(inner))
    }

    /// Creates an AND from a list of operands. A single operand is returned
    /// unchanged.
    pub fn all(mut operands: Vec<Expression>) -> Self {
        if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expression::And(operands)
        }
    }

    /// Creates an OR from a list of operands. A single operand is returned
    /// unchanged.
    pub fn any(mut operands: Vec<Expression>) -> Self {
        if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expression::Or(operands)
        }
    }
}
