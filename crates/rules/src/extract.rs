//! Operand descriptors and extraction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::accessor::Accessors;
use crate::error::ExtractionError;
use crate::value::{Value, ValueType};

/// Where an operand's value comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueSource {
    /// Read through a getter registered on the target type.
    Accessor {
        /// Getter name.
        #[serde(rename = "accessor")]
        name: String,
        /// Optional argument, usually a field selector.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        argument: Option<Value>,
    },
    /// A constant.
    Literal {
        /// The constant value.
        literal: Value,
    },
}

impl ValueSource {
    /// Getter source with an argument.
    pub fn accessor(name: impl Into<String>, argument: Option<Value>) -> Self {
        Self::Accessor {
            name: name.into(),
            argument,
        }
    }

    /// Short label used in logs and errors.
    pub fn label(&self) -> &str {
        match self {
            Self::Accessor { name, .. } => name,
            Self::Literal { .. } => "literal",
        }
    }
}

/// Describes how to obtain one operand of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleObject {
    /// Name of the target type; informational.
    #[serde(default)]
    pub class_name: String,
    /// Where the value comes from.
    #[serde(flatten)]
    pub source: ValueSource,
    /// Declared type the value is coerced to.
    pub value_type: ValueType,
}

impl RuleObject {
    /// Operand read through `accessor` called with `argument`.
    pub fn accessor(
        accessor: impl Into<String>,
        argument: Option<Value>,
        value_type: ValueType,
    ) -> Self {
        Self {
            class_name: String::new(),
            source: ValueSource::accessor(accessor, argument),
            value_type,
        }
    }

    /// Field of a [`Record`](crate::Record) read via `getFieldValue`.
    pub fn field(name: &str, value_type: ValueType) -> Self {
        Self::accessor(crate::record::GET_FIELD, Some(Value::from(name)), value_type)
    }

    /// Constant operand.
    pub fn literal(value: Value) -> Self {
        let value_type = value.value_type().unwrap_or(ValueType::String);
        Self {
            class_name: String::new(),
            source: ValueSource::Literal { literal: value },
            value_type,
        }
    }

    /// Sets the informational class name.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }
}

/// Reads the operand described by `object` from `target` and coerces it to
/// the declared type.
pub fn extract<T>(
    target: &T,
    object: &RuleObject,
    accessors: &Accessors<T>,
) -> Result<Value, ExtractionError> {
    let raw = match &object.source {
        ValueSource::Accessor { name, argument } => accessors.get(target, name, argument.as_ref())?,
        ValueSource::Literal { literal } => literal.clone(),
    };
    raw.coerce(object.value_type)
        .map_err(|source| ExtractionError::Conversion {
            accessor: object.source.label().to_owned(),
            declared: object.value_type,
            source,
        })
}

// ============================================================================
// OPERAND
// ============================================================================

/// An operand as recorded in a result.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Extracted successfully (may be [`Value::Null`]).
    Value(Value),
    /// Could not be read.
    Unavailable,
    /// Read, but not convertible to the declared type.
    InvalidConversion(ValueType),
}

impl Operand {
    /// The extracted value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&Result<Value, ExtractionError>> for Operand {
    fn from(result: &Result<Value, ExtractionError>) -> Self {
        match result {
            Ok(value) => Self::Value(value.clone()),
            Err(ExtractionError::Conversion { declared, .. }) => Self::InvalidConversion(*declared),
            Err(_) => Self::Unavailable,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => fmt::Display::fmt(value, f),
            Self::Unavailable => f.write_str("null"),
            Self::InvalidConversion(declared) => write!(f, "invalid type conversion: [{declared}]"),
        }
    }
}
