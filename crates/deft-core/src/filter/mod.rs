//! Filter expression compiler.
//!
//! Parses a single-line boolean filter and compiles it into a parameterized
//! SQL predicate plus the values for its bind parameters.
//!
//! # Supported Syntax
//!
//! ## Comparisons
//! - `field = value`, `!=`, `>`, `<`, `>=`, `<=`
//! - `field ~ value` - substring match (`LIKE '%value%'`)
//! - `field !~ value` - negated substring match
//!
//! Fields are `[A-Za-z][A-Za-z0-9_]*`. Values are bare words
//! (`[A-Za-z0-9_.-]+`) or single/double quoted strings. A quoted value is
//! always bound as text; a bare one is typed when it looks numeric.
//!
//! ## Boolean Operators
//! - `NOT` - negation (binds tightest)
//! - `AND` or `&&` - conjunction
//! - `OR` - disjunction (binds loosest)
//! - `()` - grouping
//!
//! Keywords are case-insensitive.
//!
//! # Example
//!
//! ```
//! use deft_core::filter::FilterCompiler;
//!
//! let compiled = FilterCompiler::compile("name ~ smith").unwrap();
//! assert_eq!(compiled.sql, "( name LIKE :name_1 )");
//! assert_eq!(compiled.bindings["name_1"], "%smith%");
//!
//! let query = compiled.wrap("SELECT * FROM people;");
//! assert_eq!(
//!     query,
//!     "SELECT * FROM (\nSELECT * FROM people\n) AS subselect WHERE ( name LIKE :name_1 )"
//! );
//! ```

mod ast;
mod compiler;
mod error;
mod lexer;
mod parser;

pub use ast::{Comparison, ComparisonOperator, Expression};
pub use compiler::{CompiledFilter, FilterCompiler, SUBSELECT_ALIAS};
pub use error::{FilterError, FilterResult};
pub use lexer::{FilterToken, Lexer, LogicalWord, PositionedToken};
pub use parser::{FilterParser, MAX_NESTING_DEPTH};

#[cfg(test)]
mod tests;
