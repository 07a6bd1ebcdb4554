//! Compilation of parsed filter expressions into SQL.
//!
//! The [`FilterCompiler`] walks an [`Expression`] depth-first and produces a
//! [`CompiledFilter`]: a parenthesized SQL boolean fragment whose literals are
//! all named placeholders (`:status_1`), plus the map of those names to the
//! literal values. Values never appear in the SQL text.
//!
//! # Example
//!
//! ```
//! use deft_core::filter::FilterCompiler;
//!
//! let compiled = FilterCompiler::compile("status = 'open' AND priority >= 3").unwrap();
//! assert_eq!(
//!     compiled.sql,
//!     "( ( status = :status_1 ) AND ( priority >= :priority_1 ) )"
//! );
//! assert_eq!(compiled.bindings["status_1"], "open");
//! assert_eq!(compiled.bindings["priority_1"], "3");
//! assert!(compiled.is_quoted("status_1"));
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::ast::{Comparison, Expression};
use super::error::FilterResult;
use super::parser::FilterParser;

/// Alias used in the emitted `SELECT * FROM (...) AS subselect` wrapper.
pub const SUBSELECT_ALIAS: &str = "subselect";

/// The result of compiling a filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFilter {
    /// SQL boolean fragment, valid after `WHERE`.
    pub sql: String,
    /// Bind name to literal value. Keys are exactly the `:name` placeholders
    /// used in `sql`.
    pub bindings: BTreeMap<String, String>,
    /// Bind names whose value was quoted in the filter.
    pub quoted: BTreeSet<String>,
}

impl CompiledFilter {
    /// Wraps a base query so that the filter applies to its result set.
    ///
    /// Trailing whitespace and semicolons are removed from `base_query`. The
    /// base query sits on its own lines, so a trailing `--` comment in it
    /// cannot swallow the wrapper.
    pub fn wrap(&self, base_query: &str) -> String {
        let base = base_query.trim().trim_end_matches(';').trim_end();
        format!(
            "SELECT * FROM (\n{}\n) AS {} WHERE {}",
            base, SUBSELECT_ALIAS, self.sql
        )
    }

    /// Returns true if the value bound to `name` was quoted.
    pub fn is_quoted(&self, name: &str) -> bool {
        self.quoted.contains(name)
    }

    /// Returns the placeholder names referenced by the SQL fragment, in order
    /// of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let bytes = self.sql.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b':' {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_')
                {
                    end += 1;
                }
                if end > start {
                    names.push(&self.sql[start..end]);
                }
                i = end;
            } else {
                i += 1;
            }
        }
        names
    }
}

/// Per-compilation occurrence counter for bind names.
///
/// The Nth comparison on field `f` is bound as `f_N`. Because `N` never
/// contains an underscore, distinct `(field, N)` pairs always yield distinct
/// names, even for fields such as `a` and `a_1`.
#[derive(Debug, Default)]
struct BindNames {
    counts: HashMap<String, usize>,
}

impl BindNames {
    fn next(&mut self, field: &str) -> String {
        let count = self.counts.entry(field.to_string()).or_insert(0);
        *count += 1;
        format!("{}_{}", field, count)
    }
}

/// Compiles filter expressions into SQL fragments with bind parameters.
#[derive(Debug, Default)]
pub struct FilterCompiler {
    names: BindNames,
    bindings: BTreeMap<String, String>,
    quoted: BTreeSet<String>,
}

impl FilterCompiler {
    /// Parses and compiles a filter expression string.
    ///
    /// # Errors
    ///
    /// Returns any lex or syntax error from parsing; nothing is compiled
    /// unless the whole input parses.
    pub fn compile(input: &str) -> FilterResult<CompiledFilter> {
        let expr = FilterParser::parse(input)?;
        Ok(Self::compile_expression(&expr))
    }

    /// Compiles an already-parsed expression.
    pub fn compile_expression(expr: &Expression) -> CompiledFilter {
        let mut compiler = Self::default();
        let sql = compiler.emit(expr);
        CompiledFilter {
            sql,
            bindings: compiler.bindings,
            quoted: compiler.quoted,
        }
    }

    fn emit(&mut self, expr: &Expression) -> String {
        match expr {
            Expression::Comparison(comparison) => self.emit_comparison(comparison),
            Expression::Not(inner) => format!("NOT ( {} )", self.emit(inner)),
            Expression::And(children) => self.emit_group(children, "AND"),
            Expression::Or(children) => self.emit_group(children, "OR"),
        }
    }

    fn emit_group(&mut self, children: &[Expression], keyword: &str) -> String {
        let parts: Vec<String> = children.iter().map(|child| self.emit(child)).collect();
        format!("( {} )", parts.join(&format!(" {} ", keyword)))
    }

    fn emit_comparison(&mut self, comparison: &Comparison) -> String {
        let name = self.names.next(&comparison.field);
        let value = if comparison.operator.is_fuzzy() {
            format!("%{}%", comparison.value)
        } else {
            comparison.value.clone()
        };
        let sql = format!(
            "( {} {} :{} )",
            comparison.field,
            comparison.operator.sql(),
            name
        );
        if comparison.quoted {
            self.quoted.insert(name.clone());
        }
        self.bindings.insert(name, value);
        sql
    }
}
