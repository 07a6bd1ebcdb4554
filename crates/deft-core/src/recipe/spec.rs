//! Typed YAML specifications for views, forms and data sources.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

/// Per-column restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// The column is never offered for editing.
    NoEdit,
    /// The column is left out of the "original values" section of a draft.
    NoShow,
}

/// A column of a view or form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name as returned by the query.
    pub name: String,

    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Default value for new records. The string `now()` means today's date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Restrictions on the column.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub perms: Vec<Permission>,
}

impl ColumnSpec {
    /// Returns true unless the column is marked `noedit`.
    pub fn is_editable(&self) -> bool {
        !self.perms.contains(&Permission::NoEdit)
    }

    /// Returns true unless the column is marked `noshow`.
    pub fn is_shown(&self) -> bool {
        !self.perms.contains(&Permission::NoShow)
    }

    /// Resolves the column default against `today`.
    ///
    /// A missing default is an empty string; `now()` (any case) becomes
    /// `today` formatted as `%Y-%m-%d`; anything else is returned as written.
    pub fn default_value(&self, today: NaiveDate) -> Value {
        match &self.default {
            None => Value::String(String::new()),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("now()") => {
                Value::String(today.format("%Y-%m-%d").to_string())
            }
            Some(other) => other.clone(),
        }
    }
}

/// A read-only view: a base query plus display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSpec {
    /// Short title shown by `list-views`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Longer description shown by `list-views`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Name of the data source under `sources/`.
    pub source: String,

    /// Query used for the default listing.
    pub list: String,

    /// Query used with `--detail`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Column metadata, looked up by name.
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

impl ViewSpec {
    /// Returns the display title for a result column, falling back to its name.
    pub fn column_title<'a>(&'a self, name: &'a str) -> &'a str {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.title.as_deref())
            .unwrap_or(name)
    }
}

/// An editable form: detail/insert/update statements plus column metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSpec {
    /// Short title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Free text placed as comments at the top of every draft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    /// Name of the data source under `sources/`.
    pub source: String,

    /// Columns offered in drafts.
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,

    /// Query fetching one record by `:pk`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Statement creating a record from the column parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert: Option<String>,

    /// Statement updating the record `:pk` from the column parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<String>,
}

/// Connection parameters of a data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Database kind: `postgresql`, `mysql` or `sqlite`.
    pub dialect: String,

    /// Client driver name. Accepted for compatibility and otherwise unused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Database name, or the file path for SQLite.
    pub dbname: String,
}
