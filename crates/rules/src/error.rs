//! Error taxonomy for rule evaluation.
//!
//! Every failure the engine can observe has its own enum. None of them abort
//! an evaluation pass: the component that catches one converts it into a
//! fail-closed outcome (rule failed, action skipped, group excluded) and logs
//! it. They surface in the public API only where callers ask for them
//! explicitly, e.g. [`CheckRegistry::invoke`](crate::CheckRegistry::invoke).

use crate::value::ValueType;

// ============================================================================
// VALUES
// ============================================================================

/// A literal could not be parsed or a value could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ValueError {
    /// The type tag is not one of the known operand kinds.
    #[error("unknown value type `{0}`")]
    UnknownType(String),

    /// The literal text does not parse as the requested type.
    #[error("cannot parse `{text}` as {target}")]
    Parse {
        /// The offending literal.
        text: String,
        /// The type it was parsed as.
        target: ValueType,
    },

    /// No conversion exists between the two types.
    #[error("cannot convert {from} to {target}")]
    Conversion {
        /// Type of the value at hand.
        from: ValueType,
        /// Requested type.
        target: ValueType,
    },
}

/// Error returned by user-registered accessor and action functions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FunctionError {
    message: String,
}

impl FunctionError {
    /// Creates a new function error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// An operand could not be read from (or written to) the target object.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ExtractionError {
    /// No accessor with this name is registered for the target type.
    #[error("accessor `{0}` is not registered")]
    UnknownAccessor(String),

    /// The supplied argument does not match what the accessor declares.
    #[error(
        "accessor `{accessor}` expects {} argument but received {}",
        argument_label(.expected),
        argument_label(.actual)
    )]
    ArgumentMismatch {
        /// Accessor name.
        accessor: String,
        /// Argument type declared at registration.
        expected: Option<ValueType>,
        /// Argument type supplied by the rule definition.
        actual: Option<ValueType>,
    },

    /// The accessor ran and reported a failure.
    #[error("accessor `{accessor}` failed: {source}")]
    Accessor {
        /// Accessor name.
        accessor: String,
        /// What the accessor reported.
        #[source]
        source: FunctionError,
    },

    /// The accessor's value cannot be coerced to the declared operand type.
    #[error("value of `{accessor}` cannot be converted to {declared}: {source}")]
    Conversion {
        /// Accessor name (or `literal`).
        accessor: String,
        /// Declared operand type.
        declared: ValueType,
        /// Underlying coercion failure.
        #[source]
        source: ValueError,
    },

    /// The rule defines no operand at this position.
    #[error("no operand defined at position {0}")]
    MissingOperand(usize),
}

fn argument_label(argument: &Option<ValueType>) -> String {
    match argument {
        Some(kind) => format!("a {kind}"),
        None => "no".to_owned(),
    }
}

// ============================================================================
// DISPATCH
// ============================================================================

/// A check could not be invoked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CheckInvocationError {
    /// No check is registered under this name.
    #[error("check `{0}` is not registered")]
    UnknownCheck(String),

    /// The check exists but none of its overloads accepts these arguments.
    #[error("check `{check}` has no overload accepting ({})", signature_label(.arguments))]
    NoMatchingSignature {
        /// Check name.
        check: String,
        /// Argument types supplied (`None` = null).
        arguments: Vec<Option<ValueType>>,
    },

    /// An argument could not be handed to the selected overload.
    #[error("check `{check}` rejected argument {position}")]
    ArgumentConversion {
        /// Check name.
        check: String,
        /// Zero-based argument position.
        position: usize,
    },
}

/// An action could not be executed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ActionInvocationError {
    /// No action is registered under this key.
    #[error("action `{0}` is not registered")]
    UnknownAction(String),

    /// The action exists but none of its overloads accepts these arguments.
    #[error("action `{action}` has no overload accepting ({})", signature_label(.arguments))]
    NoMatchingSignature {
        /// Action key.
        action: String,
        /// Argument types supplied (`None` = null).
        arguments: Vec<Option<ValueType>>,
    },

    /// An argument could not be handed to the selected overload.
    #[error("action `{action}` rejected argument {position}")]
    ArgumentConversion {
        /// Action key.
        action: String,
        /// Zero-based argument position.
        position: usize,
    },

    /// The action function reported a failure.
    #[error("action `{action}` failed: {source}")]
    Failed {
        /// Action key.
        action: String,
        /// What the function reported.
        #[source]
        source: FunctionError,
    },

    /// A getter operand could not be read.
    #[error("action `{action}` could not read its operand: {source}")]
    Read {
        /// Action key.
        action: String,
        /// Underlying extraction failure.
        #[source]
        source: ExtractionError,
    },

    /// The result could not be written back to the target.
    #[error("action `{action}` could not write its result: {source}")]
    Write {
        /// Action key.
        action: String,
        /// Underlying extraction failure.
        #[source]
        source: ExtractionError,
    },
}

pub(crate) fn signature_label(arguments: &[Option<ValueType>]) -> String {
    arguments
        .iter()
        .map(|argument| argument.map_or("null", ValueType::as_str))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a rule could not be evaluated. Always resolves to a failed verdict.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleEvaluationError {
    /// An operand could not be extracted.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The check could not be invoked.
    #[error(transparent)]
    Check(#[from] CheckInvocationError),
}

// ============================================================================
// GROUPS, TEMPLATES, DEFINITIONS
// ============================================================================

/// A validity-window bound is not a `yyyy-MM-dd` date.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("group `{group}` has an invalid {bound} date `{value}`: {source}")]
pub struct ValidityParseError {
    /// Group id.
    pub group: String,
    /// `validFrom` or `validUntil`.
    pub bound: &'static str,
    /// The raw text.
    pub value: String,
    /// Parser failure.
    #[source]
    pub source: chrono::ParseError,
}

/// A message template could not be produced. Never leaves the renderer;
/// it becomes the `[undefined message]` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// The rule has no message for this verdict.
    #[error("no {0} message configured")]
    Missing(crate::logic::Verdict),
}

/// A rule definition document could not be loaded.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DefinitionError {
    /// The document is not valid JSON for the rule model.
    #[error("malformed rule definition: {0}")]
    Json(#[from] serde_json::Error),

    /// A rule is structurally invalid.
    #[error("rule `{rule}` in group `{group}` is invalid: {reason}")]
    InvalidRule {
        /// Owning group id.
        group: String,
        /// Rule id.
        rule: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two groups share one id, so dependencies would be ambiguous.
    #[error("group id `{0}` is defined more than once")]
    DuplicateGroup(String),
}
