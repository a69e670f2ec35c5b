//! A single rule: one named check over one or two operands.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::accessor::Accessors;
use crate::check::CheckRegistry;
use crate::error::{ExtractionError, RuleEvaluationError};
use crate::extract::{Operand, RuleObject, extract};
use crate::logic::Verdict;
use crate::value::Value;

/// Extra literal argument for a check or action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// The literal.
    #[serde(flatten)]
    pub value: Value,
    /// Marks the slot whose type a setter coerces the written value to.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub setter_value: bool,
}

impl Parameter {
    /// Plain literal parameter.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            setter_value: false,
        }
    }

    /// Parameter marking the setter's value slot.
    pub fn setter_value(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            setter_value: true,
        }
    }
}

/// Message template for one verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMessage {
    /// Verdict the message applies to.
    #[serde(rename = "type")]
    pub kind: Verdict,
    /// Template text with `$1` / `$0` placeholders.
    pub text: String,
}

/// A named check applied to extracted operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Identifier, unique within its subgroup.
    pub id: String,
    /// Free text.
    #[serde(default)]
    pub description: String,
    /// One or two operand descriptors.
    pub objects: Vec<RuleObject>,
    /// Literal compared against operand 1. When set, operand 2 is ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    /// Extra literal arguments appended after the operands.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Registered check name.
    pub check: String,
    /// Pass/fail templates.
    #[serde(default)]
    pub messages: Vec<RuleMessage>,
}

/// Verdict and operands of one rule evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleRun {
    /// Outcome; [`Verdict::Failed`] whenever evaluation failed.
    pub verdict: Verdict,
    /// Operand 1 as extracted.
    pub operand1: Option<Operand>,
    /// Operand 2 as extracted; `None` when an expected literal is set.
    pub operand2: Option<Operand>,
}

type Extracted = Option<Result<Value, ExtractionError>>;

impl Rule {
    /// Create a rule invoking `check`, with no operands yet.
    pub fn new(id: impl Into<String>, check: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            objects: Vec::new(),
            expected: None,
            parameters: Vec::new(),
            check: check.into(),
            messages: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends an operand.
    #[must_use]
    pub fn with_object(mut self, object: RuleObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Sets the expected literal.
    #[must_use]
    pub fn with_expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Appends an extra literal argument.
    #[must_use]
    pub fn with_parameter(mut self, value: impl Into<Value>) -> Self {
        self.parameters.push(Parameter::new(value));
        self
    }

    /// Sets the template for `kind`, replacing any existing one.
    #[must_use]
    pub fn with_message(mut self, kind: Verdict, text: impl Into<String>) -> Self {
        self.messages.retain(|message| message.kind != kind);
        self.messages.push(RuleMessage {
            kind,
            text: text.into(),
        });
        self
    }

    /// Template configured for `kind`.
    pub fn message(&self, kind: Verdict) -> Option<&str> {
        self.messages
            .iter()
            .find(|message| message.kind == kind)
            .map(|message| message.text.as_str())
    }

    /// Structural problems that make the rule unusable.
    pub fn validate(&self) -> Result<(), String> {
        if self.check.trim().is_empty() {
            return Err("no check name".to_owned());
        }
        match self.objects.len() {
            1 | 2 => Ok(()),
            count => Err(format!("expected one or two objects, found {count}")),
        }
    }

    /// Evaluates the rule against `target`.
    ///
    /// Never fails: anything that prevents evaluation is logged and yields
    /// [`Verdict::Failed`].
    pub fn run<T>(&self, target: &T, checks: &CheckRegistry, accessors: &Accessors<T>) -> RuleRun {
        let (first, second) = self.extract_all(target, accessors);
        let verdict = match self.invoke(first.as_ref(), second.as_ref(), checks) {
            Ok(passed) => Verdict::from_passed(passed),
            Err(error) => {
                tracing::warn!(
                    rule = %self.id,
                    check = %self.check,
                    %error,
                    "rule could not be evaluated"
                );
                Verdict::Failed
            }
        };
        tracing::debug!(rule = %self.id, check = %self.check, %verdict, "rule evaluated");
        RuleRun {
            verdict,
            operand1: first.as_ref().map(Operand::from),
            operand2: second.as_ref().map(Operand::from),
        }
    }

    /// Extracts the reported operands without running the check.
    pub fn operands<T>(
        &self,
        target: &T,
        accessors: &Accessors<T>,
    ) -> (Option<Operand>, Option<Operand>) {
        let (first, second) = self.extract_all(target, accessors);
        (
            first.as_ref().map(Operand::from),
            second.as_ref().map(Operand::from),
        )
    }

    fn extract_all<T>(&self, target: &T, accessors: &Accessors<T>) -> (Extracted, Extracted) {
        let first = self
            .objects
            .first()
            .map(|object| extract(target, object, accessors));
        let second = if self.expected.is_some() {
            None
        } else {
            self.objects
                .get(1)
                .map(|object| extract(target, object, accessors))
        };
        (first, second)
    }

    fn invoke(
        &self,
        first: Option<&Result<Value, ExtractionError>>,
        second: Option<&Result<Value, ExtractionError>>,
        checks: &CheckRegistry,
    ) -> Result<bool, RuleEvaluationError> {
        let mut arguments: SmallVec<[Value; 4]> = SmallVec::new();
        let first = first.ok_or(ExtractionError::MissingOperand(0))?;
        arguments.push(first.clone()?);
        if let Some(expected) = &self.expected {
            arguments.push(expected.clone());
        } else if let Some(second) = second {
            arguments.push(second.clone()?);
        }
        arguments.extend(self.parameters.iter().map(|parameter| parameter.value.clone()));
        Ok(checks.invoke(&self.check, &arguments)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueType;

    struct Pair {
        left: i32,
        right: i32,
    }

    fn accessors() -> Accessors<Pair> {
        Accessors::new()
            .getter("getLeft", |pair: &Pair| Value::Integer(pair.left))
            .getter("getRight", |pair: &Pair| Value::Integer(pair.right))
    }

    fn left() -> RuleObject {
        RuleObject::accessor("getLeft", None, ValueType::Integer)
    }

    fn right() -> RuleObject {
        RuleObject::accessor("getRight", None, ValueType::Integer)
    }

    fn evaluate(rule: &Rule, left: i32, right: i32) -> RuleRun {
        rule.run(&Pair { left, right }, &CheckRegistry::with_builtins(), &accessors())
    }

    #[test]
    fn compares_two_operands() {
        let rule = Rule::new("r1", "LessThan").with_object(left()).with_object(right());
        let run = evaluate(&rule, 1, 2);
        assert_eq!(run.verdict, Verdict::Passed);
        assert_eq!(run.operand2, Some(Operand::Value(Value::Integer(2))));
    }

    #[test]
    fn expected_literal_replaces_second_operand() {
        let rule = Rule::new("r1", "Equals")
            .with_object(left())
            .with_object(right())
            .with_expected(Value::Integer(4));
        let run = evaluate(&rule, 4, 9);
        assert_eq!(run.verdict, Verdict::Passed);
        assert_eq!(run.operand2, None);
    }

    #[test]
    fn extraction_failure_fails_closed() {
        let rule = Rule::new("r1", "IsEven")
            .with_object(RuleObject::accessor("getMiddle", None, ValueType::Integer));
        let run = evaluate(&rule, 2, 2);
        assert_eq!(run.verdict, Verdict::Failed);
        assert_eq!(run.operand1, Some(Operand::Unavailable));
    }

    #[test]
    fn unknown_check_fails_closed() {
        let rule = Rule::new("r1", "IsPrime").with_object(left());
        let run = evaluate(&rule, 3, 0);
        assert_eq!(run.verdict, Verdict::Failed);
    }

    #[test]
    fn parameters_follow_operands() {
        let rule = Rule::new("r1", "IsBetween")
            .with_object(left())
            .with_parameter(Value::Integer(1))
            .with_parameter(Value::Integer(10));
        let checks = CheckRegistry::with_builtins();
        let verdict = |left| rule.run(&Pair { left, right: 0 }, &checks, &accessors()).verdict;
        assert_eq!(verdict(10), Verdict::Passed);
        assert_eq!(verdict(11), Verdict::Failed);
    }

    #[test]
    fn validate_rejects_missing_objects() {
        assert!(Rule::new("r1", "IsEven").validate().is_err());
        assert!(Rule::new("r1", "").with_object(left()).validate().is_err());
        assert!(Rule::new("r1", "IsEven").with_object(left()).validate().is_ok());
    }

    #[test]
    fn with_message_replaces_same_kind() {
        let rule = Rule::new("r1", "IsEven")
            .with_message(Verdict::Passed, "a")
            .with_message(Verdict::Passed, "b");
        assert_eq!(rule.message(Verdict::Passed), Some("b"));
        assert_eq!(rule.message(Verdict::Failed), None);
    }

    #[test]
    fn deserializes_from_json() {
        let rule: Rule = serde_json::from_str(
            r#"{
                "id": "r1",
                "check": "Equals",
                "objects": [{"accessor": "getLeft", "valueType": "integer"}],
                "expected": {"type": "integer", "value": "4"},
                "messages": [{"type": "passed", "text": "value $1 matched $0"}]
            }"#,
        )
        .unwrap();
        assert_eq!(rule.expected, Some(Value::Integer(4)));
        assert_eq!(rule.message(Verdict::Passed), Some("value $1 matched $0"));
    }
}
