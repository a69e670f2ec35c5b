//! `StringAction.*`: text transformations for action pipelines.
//!
//! Every function takes the current value as its first argument and returns
//! the new text. Indices and lengths count characters, not bytes.

use regex::Regex;

use super::{ActionFn, ActionRegistry};
use crate::error::FunctionError;
use crate::value::Value;

const NAMESPACE: &str = "StringAction";

pub(super) fn register_all(registry: &mut ActionRegistry) {
    let key = |method: &str| format!("{NAMESPACE}.{method}");

    registry
        .register(key("setValue"), ActionFn::unary(|v: String| Ok(Value::String(v))))
        .register(key("setValue"), ActionFn::unary(|v: i64| Ok(Value::Long(v))))
        .register(key("setValue"), ActionFn::unary(|v: f64| Ok(Value::Double(v))))
        .register(key("trimValue"), ActionFn::unary(|v: String| text(v.trim())))
        .register(key("upperCaseValue"), ActionFn::unary(|v: String| text(&v.to_uppercase())))
        .register(key("lowerCaseValue"), ActionFn::unary(|v: String| text(&v.to_lowercase())))
        .register(
            key("replaceValue"),
            ActionFn::ternary(|v: String, pattern: String, replacement: String| {
                let regex = Regex::new(&pattern).map_err(|error| {
                    FunctionError::new(format!("invalid pattern `{pattern}`: {error}"))
                })?;
                text(&regex.replace_all(&v, replacement.as_str()))
            }),
        )
        .register(
            key("subStringValue"),
            ActionFn::binary(|v: String, until: String| {
                text(v.find(&until).map_or(v.as_str(), |end| v[..end].trim()))
            }),
        )
        .register(
            key("subStringValue"),
            ActionFn::binary(|v: String, begin: i64| substring(&v, begin, None)),
        )
        .register(
            key("subStringValue"),
            ActionFn::ternary(|v: String, begin: i64, end: i64| substring(&v, begin, Some(end))),
        )
        .register(
            key("addLeadingZeros"),
            ActionFn::binary(|v: String, width: i64| pad_left(&v, width, '0')),
        )
        .register(
            key("addLeadingSpaces"),
            ActionFn::binary(|v: String, width: i64| pad_left(&v, width, ' ')),
        );

    for method in ["concatValues", "appendValue"] {
        register_joins(registry, &key(method), |value, other, separator| {
            format!("{value}{separator}{other}")
        });
    }
    register_joins(registry, &key("prependValue"), |value, other, separator| {
        format!("{other}{separator}{value}")
    });
}

/// Registers `(String, x)` and `(String, x, separator)` overloads for text,
/// long, float and double `x`. Numbers are joined in their message form.
fn register_joins(registry: &mut ActionRegistry, key: &str, join: fn(&str, &str, &str) -> String) {
    registry
        .register(key, ActionFn::binary(move |v: String, o: String| text(&join(&v, &o, ""))))
        .register(key, ActionFn::binary(move |v: String, o: i64| text(&join(&v, &number(o), ""))))
        .register(key, ActionFn::binary(move |v: String, o: f32| text(&join(&v, &number(o), ""))))
        .register(key, ActionFn::binary(move |v: String, o: f64| text(&join(&v, &number(o), ""))))
        .register(
            key,
            ActionFn::ternary(move |v: String, o: String, s: String| text(&join(&v, &o, &s))),
        )
        .register(
            key,
            ActionFn::ternary(move |v: String, o: i64, s: String| {
                text(&join(&v, &number(o), &s))
            }),
        )
        .register(
            key,
            ActionFn::ternary(move |v: String, o: f32, s: String| {
                text(&join(&v, &number(o), &s))
            }),
        )
        .register(
            key,
            ActionFn::ternary(move |v: String, o: f64, s: String| {
                text(&join(&v, &number(o), &s))
            }),
        );
}

fn number(value: impl Into<Value>) -> String {
    value.into().to_string()
}

#[allow(clippy::unnecessary_wraps)]
fn text(value: &str) -> Result<Value, FunctionError> {
    Ok(Value::String(value.to_owned()))
}

fn substring(value: &str, begin: i64, end: Option<i64>) -> Result<Value, FunctionError> {
    let length = value.chars().count();
    let index = |position: i64| {
        usize::try_from(position)
            .ok()
            .filter(|position| *position <= length)
            .ok_or_else(|| {
                FunctionError::new(format!("index {position} out of range for length {length}"))
            })
    };
    let begin = index(begin)?;
    let end = end.map_or(Ok(length), index)?;
    if begin > end {
        return Err(FunctionError::new(format!("begin {begin} is after end {end}")));
    }
    text(&value.chars().skip(begin).take(end - begin).collect::<String>())
}

fn pad_left(value: &str, width: i64, fill: char) -> Result<Value, FunctionError> {
    let width = usize::try_from(width).unwrap_or(0);
    let missing = width.saturating_sub(value.chars().count());
    let mut padded = String::with_capacity(value.len() + missing);
    padded.extend(std::iter::repeat_n(fill, missing));
    padded.push_str(value);
    Ok(Value::String(padded))
}
