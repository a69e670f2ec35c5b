//! A generic field-map target type.
//!
//! [`Record`] lets rule sets run against untyped rows, such as parsed CSV
//! lines or JSON objects. Its accessors are the two names rule files use for
//! row access: `getFieldValue(name)` and `setFieldValue(name, value)`.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::accessor::Accessors;
use crate::error::FunctionError;
use crate::value::{Value, ValueType};

/// Getter reading a named field.
pub const GET_FIELD: &str = "getFieldValue";
/// Setter writing a named field.
pub const SET_FIELD: &str = "setFieldValue";

/// Ordered map of field name to value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>")]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Field value, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Adds or replaces a field, keeping the original position on replace.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `getFieldValue` / `setFieldValue` accessors.
    ///
    /// Reading an absent field is an accessor error; writing one adds it.
    pub fn accessors() -> Accessors<Self> {
        Accessors::new()
            .getter_with(GET_FIELD, ValueType::String, |record: &Self, name| {
                let name = name.as_str().unwrap_or_default();
                record
                    .get(name)
                    .cloned()
                    .ok_or_else(|| FunctionError::new(format!("record has no field `{name}`")))
            })
            .setter_with(SET_FIELD, ValueType::String, |record: &mut Self, name, value| {
                let name = name.as_str().unwrap_or_default();
                record.set(name, value);
                Ok(())
            })
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(name, value)| (name, json_scalar(value)))
                .collect(),
        }
    }
}

/// Strings, booleans and numbers map to their natural kind (`integer` when
/// the number fits, else `long` or `double`); nested values are kept as
/// JSON text.
fn json_scalar(value: serde_json::Value) -> Value {
    use serde_json::Value as Json;
    match value {
        Json::Null => Value::Null,
        Json::Bool(flag) => Value::Boolean(flag),
        Json::String(text) => Value::String(text),
        Json::Number(number) => match number.as_i64() {
            Some(long) => i32::try_from(long).map_or(Value::Long(long), Value::Integer),
            None => number.as_f64().map_or(Value::Null, Value::Double),
        },
        nested @ (Json::Array(_) | Json::Object(_)) => Value::String(nested.to_string()),
    }
}
