//! Record values supplied on the command line or in an edited draft.

use serde_yaml_ng::{Mapping, Value};

use crate::datasource::{ParamValue, Params};
use crate::form::{FormError, FormResult};

/// Turns a command-line value into a YAML scalar, typing it the same way
/// filter values are typed.
fn scalar(text: &str) -> Value {
    match ParamValue::infer(text) {
        ParamValue::Int(i) => Value::Number(i.into()),
        ParamValue::Float(f) => Value::Number(f.into()),
        _ => Value::String(text.to_string()),
    }
}

/// Parses `key:value` entries into a mapping.
///
/// Keys and values are trimmed. A dotted key `parent.key` sets `key` inside
/// the nested mapping `parent`; only the first dot nests.
///
/// ```
/// use deft_core::values::parse_values;
///
/// let values = parse_values(["name: Ada", "meta.team:core"]).unwrap();
/// assert_eq!(values["name"].as_str(), Some("Ada"));
/// assert_eq!(values["meta"]["team"].as_str(), Some("core"));
/// ```
pub fn parse_values<I, S>(entries: I) -> FormResult<Mapping>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values = Mapping::new();
    for entry in entries {
        let entry = entry.as_ref();
        let (key, value) = entry
            .split_once(':')
            .ok_or_else(|| FormError::InvalidValue(entry.to_string()))?;
        let (key, value) = (key.trim(), scalar(value.trim()));
        if key.is_empty() {
            return Err(FormError::InvalidValue(entry.to_string()));
        }

        match key.split_once('.') {
            Some((parent, child)) => {
                let parent = Value::String(parent.to_string());
                let slot = values
                    .entry(parent)
                    .or_insert_with(|| Value::Mapping(Mapping::new()));
                if !slot.is_mapping() {
                    *slot = Value::Mapping(Mapping::new());
                }
                if let Value::Mapping(nested) = slot {
                    nested.insert(Value::String(child.to_string()), value);
                }
            }
            None => {
                values.insert(Value::String(key.to_string()), value);
            }
        }
    }
    Ok(values)
}

/// Recursively merges `update` into `base`. Nested mappings are merged key
/// by key; any other value replaces what `base` had.
pub fn merge_nested(base: &mut Mapping, update: Mapping) {
    for (key, value) in update {
        if let Value::Mapping(nested) = value {
            if let Some(Value::Mapping(existing)) = base.get_mut(&key) {
                merge_nested(existing, nested);
                continue;
            }
            base.insert(key, Value::Mapping(nested));
        } else {
            base.insert(key, value);
        }
    }
}

fn key_name(key: &Value) -> FormResult<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(FormError::InvalidKey(
            serde_yaml_ng::to_string(other)?.trim().to_string(),
        )),
    }
}

fn param(value: &Value) -> FormResult<ParamValue> {
    Ok(match value {
        Value::Null => ParamValue::Null,
        Value::Bool(b) => ParamValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => ParamValue::Int(i),
            None => n
                .as_f64()
                .map_or_else(|| ParamValue::Text(n.to_string()), ParamValue::Float),
        },
        Value::String(s) => ParamValue::Text(s.clone()),
        Value::Tagged(tagged) => param(&tagged.value)?,
        Value::Mapping(nested) => ParamValue::Text(nested_json(nested)?.to_string()),
        Value::Sequence(_) => ParamValue::Text(serde_json::to_string(value).map_err(
            |e| FormError::InvalidValue(e.to_string()),
        )?),
    })
}

/// Nested mappings are stored as JSON objects whose scalar members are
/// stringified.
fn nested_json(mapping: &Mapping) -> FormResult<serde_json::Value> {
    let mut object = serde_json::Map::new();
    for (key, value) in mapping {
        let member = match value {
            Value::Mapping(inner) => nested_json(inner)?,
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::String(b.to_string()),
            Value::Number(n) => serde_json::Value::String(n.to_string()),
            other => serde_json::to_value(other)
                .map_err(|e| FormError::InvalidValue(e.to_string()))?,
        };
        object.insert(key_name(key)?, member);
    }
    Ok(serde_json::Value::Object(object))
}

/// Converts a reviewed mapping into statement parameters.
pub fn params_from_mapping(mapping: &Mapping) -> FormResult<Params> {
    mapping
        .iter()
        .map(|(key, value)| Ok::<_, FormError>((key_name(key)?, param(value)?)))
        .collect()
}

/// Converts a reviewed YAML document into statement parameters.
///
/// # Errors
///
/// `FormError::NotAMapping` unless the document is a mapping.
pub fn params_from_yaml(document: &Value) -> FormResult<Params> {
    match document {
        Value::Mapping(mapping) => params_from_mapping(mapping),
        _ => Err(FormError::NotAMapping),
    }
}

/// Parses an edited draft into statement parameters.
pub fn parse_draft(text: &str) -> FormResult<Params> {
    let document: Value = serde_yaml_ng::from_str(text)?;
    params_from_yaml(&document)
}
