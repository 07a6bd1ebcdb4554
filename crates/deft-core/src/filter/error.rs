//! Error types for the filter compiler.

use thiserror::Error;

/// A specialized Result type for filter compilation.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while compiling a filter expression.
///
/// Every error aborts the whole compilation; there is no partial result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// A character sequence that is not part of the filter language.
    #[error("unrecognized input '{fragment}' at position {position}")]
    Lex {
        /// The offending text.
        fragment: String,
        /// Byte offset of the offending text.
        position: usize,
    },

    /// Malformed grammar: missing operand, unbalanced parentheses,
    /// unknown operator or trailing input.
    #[error("syntax error at position {position}: expected {expected}, found {found}")]
    Syntax {
        /// Byte offset where parsing failed.
        position: usize,
        /// What the parser was looking for.
        expected: String,
        /// What it found instead.
        found: String,
    },

    /// Parentheses or `NOT` nested deeper than the parser allows.
    #[error("syntax error at position {position}: expression too deeply nested (limit {limit})")]
    TooDeep {
        /// Byte offset of the token that crossed the limit.
        position: usize,
        /// The nesting limit.
        limit: usize,
    },
}

impl FilterError {
    /// Creates a lex error.
    pub fn lex(fragment: impl Into<String>, position: usize) -> Self {
        FilterError::Lex {
            fragment: fragment.into(),
            position,
        }
    }

    /// Creates a syntax error.
    pub fn syntax(position: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        FilterError::Syntax {
            position,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Returns true for grammar-level failures (everything but lex errors).
    pub fn is_syntax(&self) -> bool {
        !matches!(self, FilterError::Lex { .. })
    }

    /// Byte offset in the input where the error was detected.
    pub fn position(&self) -> usize {
        match self {
            FilterError::Lex { position, .. }
            | FilterError::Syntax { position, .. }
            | FilterError::TooDeep { position, .. } => *position,
        }
    }
}
