//! Named bind parameters and their rewriting into positional placeholders.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{DataSourceError, DataSourceResult, Dialect};
use crate::filter::CompiledFilter;

/// A value bound to a statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Infers a typed value from user text: integers first, then plain
    /// decimal floats, otherwise text.
    ///
    /// Text that would not round-trip (such as `007`) stays text.
    pub fn infer(text: &str) -> Self {
        if let Ok(i) = text.parse::<i64>() {
            if i.to_string() == text {
                return ParamValue::Int(i);
            }
        }
        let numeric_chars = text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
        if numeric_chars && text.chars().any(|c| c.is_ascii_digit()) {
            if let Ok(f) = text.parse::<f64>() {
                if f.is_finite() {
                    return ParamValue::Float(f);
                }
            }
        }
        ParamValue::Text(text.to_string())
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

/// Named statement parameters.
pub type Params = BTreeMap<String, ParamValue>;

/// Converts filter bindings into typed parameters.
///
/// Values quoted in the filter stay text; bare values go through
/// [`ParamValue::infer`].
pub fn infer_params(filter: &CompiledFilter) -> Params {
    filter
        .bindings
        .iter()
        .map(|(name, value)| {
            let value = if filter.is_quoted(name) {
                ParamValue::Text(value.clone())
            } else {
                ParamValue::infer(value)
            };
            (name.clone(), value)
        })
        .collect()
}

/// Rewrites `:name` placeholders into the dialect's positional form.
///
/// Placeholders inside single- or double-quoted text and inside `--` or
/// `/* */` comments are left alone, as are `::` casts and `\:` escapes (the
/// backslash is dropped). Quote characters inside a comment do not open a
/// string. Each occurrence gets its own positional slot, so a name used twice
/// is bound twice.
///
/// # Errors
///
/// Returns `DataSourceError::MissingParameter` for a placeholder with no
/// entry in `params`.
pub fn bind_named(
    sql: &str,
    params: &Params,
    dialect: Dialect,
) -> DataSourceResult<(String, Vec<ParamValue>)> {
    let mut out = String::with_capacity(sql.len());
    let mut args = Vec::new();
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                out.push(c);
            }
            '-' if chars.peek() == Some(&'-') => {
                out.push(c);
                for n in chars.by_ref() {
                    out.push(n);
                    if n == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                out.push(c);
                if let Some(star) = chars.next() {
                    out.push(star);
                }
                let mut prev = '\0';
                for n in chars.by_ref() {
                    out.push(n);
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
            }
            '\\' if chars.peek() == Some(&':') => {
                chars.next();
                out.push(':');
            }
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                out.push_str("::");
            }
            ':' if chars
                .peek()
                .is_some_and(|n| n.is_ascii_alphabetic() || *n == '_') =>
            {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_alphanumeric() || n == '_' {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = params
                    .get(&name)
                    .ok_or_else(|| DataSourceError::MissingParameter(name.clone()))?;
                args.push(value.clone());
                out.push_str(&dialect.placeholder(args.len()));
            }
            _ => out.push(c),
        }
    }

    Ok((out, args))
}
