//! Editor drafts for creating and updating records through a form.
//!
//! A draft is a YAML document with a commented header: the form's
//! `comments`, the record's current values (for edits) and finally the
//! uncommented `# new values` mapping the user changes.

use chrono::NaiveDate;
use serde_yaml_ng::{Mapping, Value};
use thiserror::Error;

use crate::datasource::Record;
use crate::recipe::FormSpec;

/// Width that form comments are wrapped to, before the `# ` prefix.
pub const COMMENT_WIDTH: usize = 78;

pub type FormResult<T> = std::result::Result<T, FormError>;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("invalid value '{0}': expected key:value")]
    InvalidValue(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("draft must be a mapping of column names to values")]
    NotAMapping,

    #[error("invalid column name {0}: expected a string")]
    InvalidKey(String),

    #[error("form '{label}' has no '{statement}' statement")]
    MissingStatement {
        label: String,
        statement: &'static str,
    },

    #[error("record '{pk}' not found")]
    RecordNotFound { pk: String },
}

fn comment(line: &str) -> String {
    if line.is_empty() {
        "#".to_string()
    } else {
        format!("# {line}")
    }
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split = word
                .char_indices()
                .nth(width)
                .map_or(word.len(), |(i, _)| i);
            lines.push(word[..split].to_string());
            word = &word[split..];
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn header(form: &FormSpec) -> Vec<String> {
    form.comments
        .as_deref()
        .map(|c| wrap_text(c, COMMENT_WIDTH).iter().map(|l| comment(l)).collect())
        .unwrap_or_default()
}

fn dump(mapping: &Mapping) -> FormResult<Vec<String>> {
    if mapping.is_empty() {
        return Ok(Vec::new());
    }
    let yaml = serde_yaml_ng::to_string(mapping)?;
    Ok(yaml.lines().map(str::to_string).collect())
}

fn finish(lines: Vec<String>) -> String {
    let mut draft = lines.join("\n");
    draft.push('\n');
    draft
}

fn to_yaml(value: &serde_json::Value) -> Value {
    serde_yaml_ng::to_value(value).unwrap_or(Value::Null)
}

/// Default values of every column of the form, in column order.
pub fn default_values(form: &FormSpec, today: NaiveDate) -> Mapping {
    form.columns
        .iter()
        .map(|c| (Value::String(c.name.clone()), c.default_value(today)))
        .collect()
}

/// Values an edit starts from: defaults of the editable columns, replaced by
/// the record's current values where the record has that column.
pub fn editable_values(form: &FormSpec, row: &Record, today: NaiveDate) -> Mapping {
    form.columns
        .iter()
        .filter(|c| c.is_editable())
        .map(|c| {
            let value = row
                .get(&c.name)
                .map(to_yaml)
                .unwrap_or_else(|| c.default_value(today));
            (Value::String(c.name.clone()), value)
        })
        .collect()
}

/// Record values shown in the commented `original values` section: the
/// record's columns that the form lists without `noshow`, in record order.
pub fn original_values(form: &FormSpec, row: &Record) -> Mapping {
    row.iter()
        .filter(|(name, _)| form.columns.iter().any(|c| c.name == *name && c.is_shown()))
        .map(|(name, value)| (Value::String(name.to_string()), to_yaml(value)))
        .collect()
}

/// Builds the draft for a new record.
pub fn create_draft(form: &FormSpec, today: NaiveDate) -> FormResult<String> {
    let mut lines = header(form);
    lines.push("# new values".to_string());
    lines.push("# ----------".to_string());
    lines.extend(dump(&default_values(form, today))?);
    Ok(finish(lines))
}

/// Builds the draft for editing `row`.
pub fn edit_draft(form: &FormSpec, row: &Record, today: NaiveDate) -> FormResult<String> {
    let mut lines = header(form);
    lines.push(String::new());
    lines.push("# original values".to_string());
    lines.push("# ---------------".to_string());
    lines.extend(dump(&original_values(form, row))?.iter().map(|l| comment(l)));
    lines.push("# new values".to_string());
    lines.push("# ----------".to_string());
    lines.extend(dump(&editable_values(form, row, today))?);
    Ok(finish(lines))
}
