//! Message templates.
//!
//! A rule carries one template per verdict. `$1` stands for operand 1 and
//! `$0` for the expected literal, or for operand 2 when the rule compares two
//! extracted operands. Substituted values are wrapped in brackets:
//!
//! ```text
//! "value $1 matched $0"  +  operand1 = 4, expected = 4
//!   => "value [4] matched [4]"
//! ```
//!
//! Substitution is a single left-to-right pass, so a `$` inside a value is
//! copied verbatim and never re-read as a placeholder.

use crate::error::TemplateError;
use crate::logic::Verdict;
use crate::result::RuleExecutionResult;
use crate::rule::Rule;

/// Rendered when the rule has no template for its verdict.
pub const UNDEFINED_MESSAGE: &str = "[undefined message]";

/// Renders the message for `result`. Pure: the same result always renders
/// the same text.
pub fn render(result: &RuleExecutionResult) -> String {
    let template = template(&result.rule, result.verdict).unwrap_or_else(|error| {
        tracing::trace!(rule = %result.rule.id, %error, "using placeholder message");
        UNDEFINED_MESSAGE
    });

    let operand1 = result.operand1.as_ref().map(|operand| bracket(&operand.to_string()));
    let operand0 = match &result.rule.expected {
        Some(expected) => Some(bracket(&expected.to_string())),
        None => result.operand2.as_ref().map(|operand| bracket(&operand.to_string())),
    };
    substitute(template, operand1.as_deref(), operand0.as_deref())
}

fn template(rule: &Rule, verdict: Verdict) -> Result<&str, TemplateError> {
    rule.message(verdict).ok_or(TemplateError::Missing(verdict))
}

fn bracket(text: &str) -> String {
    format!("[{}]", text.replace('\\', "/"))
}

/// Replaces `$1` and `$0` in one pass. Placeholders without a value stay.
fn substitute(template: &str, one: Option<&str>, zero: Option<&str>) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        let replacement = match (c, chars.peek()) {
            ('$', Some('1')) => one,
            ('$', Some('0')) => zero,
            _ => None,
        };
        match replacement {
            Some(value) => {
                chars.next();
                rendered.push_str(value);
            }
            None => rendered.push(c),
        }
    }
    rendered
}
