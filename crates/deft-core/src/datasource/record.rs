//! Result rows decoded into JSON values.

use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::any::AnyRow;
use sqlx::{Column, Row, ValueRef};

use super::{DataSourceError, DataSourceResult};

/// One result row: column names in query order mapped to their values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: Map<String, Value>,
}

impl Record {
    /// Column names in query order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    /// Decodes a row returned by the `Any` driver.
    ///
    /// Each column is tried as integer, float, boolean, text and finally raw
    /// bytes (rendered lossily as UTF-8).
    pub(crate) fn from_row(row: &AnyRow) -> DataSourceResult<Self> {
        let mut record = Record::default();
        for column in row.columns() {
            let index = column.ordinal();
            let name = column.name().to_string();
            let value = decode_column(row, index).map_err(|message| DataSourceError::Decode {
                column: name.clone(),
                message,
            })?;
            record.values.insert(name, value);
        }
        Ok(record)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

fn decode_column(row: &AnyRow, index: usize) -> Result<Value, String> {
    let raw = row.try_get_raw(index).map_err(|e| e.to_string())?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    if let Ok(i) = row.try_get::<i64, _>(index) {
        return Ok(Value::from(i));
    }
    if let Ok(f) = row.try_get::<f64, _>(index) {
        return Ok(serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number));
    }
    if let Ok(b) = row.try_get::<bool, _>(index) {
        return Ok(Value::Bool(b));
    }
    if let Ok(s) = row.try_get::<String, _>(index) {
        return Ok(Value::String(s));
    }
    match row.try_get::<Vec<u8>, _>(index) {
        Ok(bytes) => Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) => Err(e.to_string()),
    }
}
