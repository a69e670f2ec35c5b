//! Action definitions as loaded from a rule set.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::accessor::Accessors;
use crate::error::ExtractionError;
use crate::logic::Verdict;
use crate::rule::Parameter;
use crate::value::{Value, ValueType};

/// Group verdict an action requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecuteIf {
    /// Only when the group passed.
    Passed,
    /// Only when the group failed.
    Failed,
    /// Regardless of the verdict.
    #[default]
    Always,
}

impl ExecuteIf {
    /// Whether an action with this condition runs for `verdict`.
    pub const fn admits(self, verdict: Verdict) -> bool {
        match self {
            Self::Passed => verdict.is_passed(),
            Self::Failed => verdict.is_failed(),
            Self::Always => true,
        }
    }
}

impl fmt::Display for ExecuteIf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Always => "always",
        })
    }
}

/// A getter or setter used by an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionObject {
    /// Name of the target type; informational.
    #[serde(default)]
    pub class_name: String,
    /// Accessor name.
    pub accessor: String,
    /// Declared type of the value read or written.
    pub value_type: ValueType,
    /// Accessor arguments. The first non-setter parameter is the selector
    /// passed to the accessor; a `setterValue` parameter fixes the type the
    /// written value is coerced to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

impl ActionObject {
    /// Object for `accessor` with no arguments.
    pub fn new(accessor: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            class_name: String::new(),
            accessor: accessor.into(),
            value_type,
            parameters: Vec::new(),
        }
    }

    /// Object reading or writing a [`Record`](crate::Record) field.
    pub fn field(accessor: &str, name: &str, value_type: ValueType) -> Self {
        Self::new(accessor, value_type).with_parameter(Parameter::new(name))
    }

    /// Appends an accessor parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Selector argument handed to the accessor.
    pub fn argument(&self) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|parameter| !parameter.setter_value)
            .map(|parameter| &parameter.value)
    }

    /// Type a written value is coerced to.
    pub fn setter_type(&self) -> ValueType {
        self.parameters
            .iter()
            .find(|parameter| parameter.setter_value)
            .and_then(|parameter| parameter.value.value_type())
            .unwrap_or(self.value_type)
    }

    pub(crate) fn read<T>(
        &self,
        target: &T,
        accessors: &Accessors<T>,
    ) -> Result<Value, ExtractionError> {
        let raw = accessors.get(target, &self.accessor, self.argument())?;
        raw.coerce(self.value_type)
            .map_err(|source| ExtractionError::Conversion {
                accessor: self.accessor.clone(),
                declared: self.value_type,
                source,
            })
    }

    pub(crate) fn write<T>(
        &self,
        target: &mut T,
        accessors: &Accessors<T>,
        value: &Value,
    ) -> Result<(), ExtractionError> {
        let declared = self.setter_type();
        let value = value
            .coerce(declared)
            .map_err(|source| ExtractionError::Conversion {
                accessor: self.accessor.clone(),
                declared,
                source,
            })?;
        accessors.set(target, &self.accessor, self.argument(), value)
    }
}

/// A follow-on action run after a group's verdict is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    /// Identifier, unique within its group.
    pub id: String,
    /// Free text.
    #[serde(default)]
    pub description: String,
    /// Namespace of the action function, e.g. `StringAction`.
    pub class_name: String,
    /// Function name within the namespace.
    pub method_name: String,
    /// Verdict condition.
    #[serde(default)]
    pub execute_if: ExecuteIf,
    /// Operands read before invoking, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub getters: Vec<ActionObject>,
    /// Destination for the function's return value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setter: Option<ActionObject>,
    /// Literal arguments appended after the getter operands.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

impl ActionDefinition {
    /// Create an unconditional action invoking `class_name.method_name`.
    pub fn new(
        id: impl Into<String>,
        class_name: impl Into<String>,
        method_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            class_name: class_name.into(),
            method_name: method_name.into(),
            execute_if: ExecuteIf::Always,
            getters: Vec::new(),
            setter: None,
            parameters: Vec::new(),
        }
    }

    /// Registry key: `class_name.method_name`.
    pub fn key(&self) -> String {
        format!("{}.{}", self.class_name, self.method_name)
    }

    /// Sets the verdict condition.
    #[must_use]
    pub const fn with_execute_if(mut self, execute_if: ExecuteIf) -> Self {
        self.execute_if = execute_if;
        self
    }

    /// Appends a getter operand.
    #[must_use]
    pub fn with_getter(mut self, getter: ActionObject) -> Self {
        self.getters.push(getter);
        self
    }

    /// Sets the write destination.
    #[must_use]
    pub fn with_setter(mut self, setter: ActionObject) -> Self {
        self.setter = Some(setter);
        self
    }

    /// Appends a literal argument.
    #[must_use]
    pub fn with_parameter(mut self, value: impl Into<Value>) -> Self {
        self.parameters.push(Parameter::new(value));
        self
    }
}
