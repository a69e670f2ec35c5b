//! Typed operand values.
//!
//! Rule definitions describe operands with a type tag (`"integer"`,
//! `"date"`, ...). Loaders turn those tags into [`ValueType`] and literals
//! into [`Value`] once, so evaluation never re-parses strings.
//!
//! Numeric values widen along `integer → long → float → double`; that is the
//! only implicit conversion the dispatcher performs.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Calendar date format used for literals, validity windows and messages.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// VALUE TYPE
// ============================================================================

/// The closed set of operand kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ValueType {
    /// UTF-8 text.
    String,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Boolean.
    Boolean,
    /// Calendar date without time of day.
    Date,
}

impl ValueType {
    /// Canonical lowercase tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Date => "date",
        }
    }

    const fn numeric_rank(self) -> Option<u32> {
        match self {
            Self::Integer => Some(0),
            Self::Long => Some(1),
            Self::Float => Some(2),
            Self::Double => Some(3),
            _ => None,
        }
    }

    /// Number of widening steps from `self` to `target`.
    ///
    /// `Some(0)` for identical types, `None` when no implicit conversion
    /// exists.
    pub fn widening_distance(self, target: ValueType) -> Option<u32> {
        if self == target {
            return Some(0);
        }
        match (self.numeric_rank(), target.numeric_rank()) {
            (Some(from), Some(to)) if from < to => Some(to - from),
            _ => None,
        }
    }

    /// Returns `true` for the four numeric kinds.
    pub const fn is_numeric(self) -> bool {
        self.numeric_rank().is_some()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = ValueError;

    /// Accepts the canonical tags plus the short and Java-style aliases
    /// found in older rule files (`int`, `bool`, `java.lang.String`, ...).
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let normalized = tag.trim().to_ascii_lowercase();
        let short = normalized.rsplit('.').next().unwrap_or(&normalized);
        match short {
            "string" | "str" | "text" => Ok(Self::String),
            "integer" | "int" => Ok(Self::Integer),
            "long" | "bigint" => Ok(Self::Long),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            "boolean" | "bool" => Ok(Self::Boolean),
            "date" => Ok(Self::Date),
            _ => Err(ValueError::UnknownType(tag.to_owned())),
        }
    }
}

impl TryFrom<String> for ValueType {
    type Error = ValueError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// A typed operand.
///
/// On the wire a value is `{"type": "<tag>", "value": <literal>}`; the
/// literal may be a JSON string or a native JSON scalar, and is parsed
/// according to the tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Literal", into = "Literal")]
pub enum Value {
    /// Absent value.
    Null,
    /// UTF-8 text.
    String(String),
    /// 32-bit signed integer.
    Integer(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Boolean.
    Boolean(bool),
    /// Calendar date.
    Date(NaiveDate),
}

impl Value {
    /// Parses literal text as the given type.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_rules::{Value, ValueType};
    ///
    /// assert_eq!(Value::parse(ValueType::Integer, "4").unwrap(), Value::Integer(4));
    /// assert!(Value::parse(ValueType::Date, "2024-13-01").is_err());
    /// ```
    pub fn parse(kind: ValueType, text: &str) -> Result<Self, ValueError> {
        let parse_error = || ValueError::Parse {
            text: text.to_owned(),
            target: kind,
        };
        let trimmed = text.trim();
        let value = match kind {
            ValueType::String => Self::String(text.to_owned()),
            ValueType::Integer => Self::Integer(trimmed.parse().map_err(|_| parse_error())?),
            ValueType::Long => Self::Long(trimmed.parse().map_err(|_| parse_error())?),
            ValueType::Float => Self::Float(trimmed.parse().map_err(|_| parse_error())?),
            ValueType::Double => Self::Double(trimmed.parse().map_err(|_| parse_error())?),
            ValueType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" => Self::Boolean(true),
                "false" => Self::Boolean(false),
                _ => return Err(parse_error()),
            },
            ValueType::Date => Self::Date(
                NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| parse_error())?,
            ),
        };
        Ok(value)
    }

    /// The value's type, or `None` for [`Value::Null`].
    pub const fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Null => None,
            Self::String(_) => Some(ValueType::String),
            Self::Integer(_) => Some(ValueType::Integer),
            Self::Long(_) => Some(ValueType::Long),
            Self::Float(_) => Some(ValueType::Float),
            Self::Double(_) => Some(ValueType::Double),
            Self::Boolean(_) => Some(ValueType::Boolean),
            Self::Date(_) => Some(ValueType::Date),
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Applies numeric widening. Returns `None` if `target` is not reachable.
    pub fn widen(&self, target: ValueType) -> Option<Self> {
        let value = match (self, target) {
            (value, kind) if value.value_type() == Some(kind) => value.clone(),
            (Self::Integer(v), ValueType::Long) => Self::Long(i64::from(*v)),
            (Self::Integer(v), ValueType::Float) => Self::Float(*v as f32),
            (Self::Integer(v), ValueType::Double) => Self::Double(f64::from(*v)),
            (Self::Long(v), ValueType::Float) => Self::Float(*v as f32),
            (Self::Long(v), ValueType::Double) => Self::Double(*v as f64),
            (Self::Float(v), ValueType::Double) => Self::Double(f64::from(*v)),
            _ => return None,
        };
        Some(value)
    }

    /// Converts the value to the declared type of an operand.
    ///
    /// Nulls stay null, numerics widen, a finite double within `f32` range
    /// narrows to float, text is parsed, and anything can become text.
    /// Every other pairing is a [`ValueError::Conversion`].
    pub fn coerce(&self, target: ValueType) -> Result<Self, ValueError> {
        let Some(current) = self.value_type() else {
            return Ok(Self::Null);
        };
        if let Some(widened) = self.widen(target) {
            return Ok(widened);
        }
        match (self, target) {
            (Self::Double(v), ValueType::Float)
                if v.is_finite() && v.abs() <= f64::from(f32::MAX) =>
            {
                Ok(Self::Float(*v as f32))
            }
            (Self::String(text), kind) => Self::parse(kind, text),
            (value, ValueType::String) => Ok(Self::String(value.to_string())),
            _ => Err(ValueError::Conversion {
                from: current,
                target,
            }),
        }
    }

    /// Borrows the text of a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::String(v) => f.write_str(v),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            // whole numbers keep their fraction: `4.0`, not `4`
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Double(v) => write!(f, "{v:?}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{}", v.format(DATE_FORMAT)),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Literal {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<LiteralText>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum LiteralText {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Text(String),
}

impl fmt::Display for LiteralText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl TryFrom<Literal> for Value {
    type Error = ValueError;

    fn try_from(literal: Literal) -> Result<Self, Self::Error> {
        if literal.kind.eq_ignore_ascii_case("null") {
            return Ok(Self::Null);
        }
        let kind: ValueType = literal.kind.parse()?;
        match literal.value {
            None => Ok(Self::Null),
            Some(text) => Self::parse(kind, &text.to_string()),
        }
    }
}

impl From<Value> for Literal {
    fn from(value: Value) -> Self {
        let kind = value
            .value_type()
            .map_or("null", ValueType::as_str)
            .to_owned();
        let value = match value {
            Value::Null => None,
            Value::String(v) => Some(LiteralText::Text(v)),
            Value::Integer(v) => Some(LiteralText::Integer(i64::from(v))),
            Value::Long(v) => Some(LiteralText::Integer(v)),
            Value::Float(v) => Some(LiteralText::Double(f64::from(v))),
            Value::Double(v) => Some(LiteralText::Double(v)),
            Value::Boolean(v) => Some(LiteralText::Boolean(v)),
            date @ Value::Date(_) => Some(LiteralText::Text(date.to_string())),
        };
        Self { kind, value }
    }
}
