//! Loading rule sets from JSON documents.
//!
//! A document is a serialized [`RuleSet`]:
//!
//! ```json
//! {
//!   "groups": [{
//!     "id": "address",
//!     "validFrom": "2024-01-01",
//!     "subgroups": [{
//!       "id": "zip",
//!       "intraOperator": "and",
//!       "rules": [{
//!         "id": "zip-length",
//!         "check": "LengthEquals",
//!         "objects": [{"accessor": "getFieldValue",
//!                      "argument": {"type": "string", "value": "zip"},
//!                      "valueType": "string"}],
//!         "parameters": [{"type": "integer", "value": 5}],
//!         "messages": [{"type": "failed", "text": "zip $1 must have 5 digits"}]
//!       }]
//!     }]
//!   }]
//! }
//! ```
//!
//! Loading validates the structure and applies the validity gate, so the
//! returned rule set only holds groups active on the given date.

use std::io::Read;

use chrono::NaiveDate;

use crate::error::DefinitionError;
use crate::ruleset::RuleSet;

/// Parses `json` and keeps the groups active on `today`.
pub fn from_json_str(json: &str, today: NaiveDate) -> Result<RuleSet, DefinitionError> {
    finish(serde_json::from_str(json)?, today)
}

/// Reads a document from `reader` and keeps the groups active on `today`.
pub fn from_reader(reader: impl Read, today: NaiveDate) -> Result<RuleSet, DefinitionError> {
    finish(serde_json::from_reader(reader)?, today)
}

fn finish(mut rule_set: RuleSet, today: NaiveDate) -> Result<RuleSet, DefinitionError> {
    rule_set.validate()?;
    let excluded = rule_set.retain_active(today);
    tracing::debug!(
        groups = rule_set.groups.len(),
        rules = rule_set.rule_count(),
        excluded = excluded.len(),
        "rule set loaded"
    );
    Ok(rule_set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    const DOCUMENT: &str = r#"{
        "groups": [
            {
                "id": "current",
                "validFrom": "2024-01-01",
                "subgroups": [{
                    "id": "zip",
                    "rules": [{
                        "id": "zip-length",
                        "check": "LengthEquals",
                        "objects": [{"accessor": "getFieldValue",
                                     "argument": {"type": "string", "value": "zip"},
                                     "valueType": "string"}],
                        "parameters": [{"type": "integer", "value": 5}]
                    }]
                }]
            },
            {"id": "retired", "validUntil": "2023-12-31"}
        ],
        "referenceFields": [{"name": "zip", "nameDescriptive": "Postal code", "typeId": "string"}]
    }"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn loads_active_groups() {
        let rule_set = from_json_str(DOCUMENT, today()).unwrap();
        assert_eq!(rule_set.groups.len(), 1);
        assert_eq!(rule_set.groups[0].id, "current");
        assert_eq!(rule_set.reference_fields[0].name_descriptive, "Postal code");
        let rule = &rule_set.groups[0].subgroups[0].rules[0];
        assert_eq!(rule.parameters[0].value, Value::Integer(5));
    }

    #[test]
    fn from_reader_matches_from_str() {
        let from_reader = from_reader(DOCUMENT.as_bytes(), today()).unwrap();
        assert_eq!(from_reader, from_json_str(DOCUMENT, today()).unwrap());
    }

    #[test]
    fn malformed_json_is_a_definition_error() {
        let error = from_json_str("{\"groups\": [", today()).unwrap_err();
        assert!(matches!(error, DefinitionError::Json(_)));
    }

    #[test]
    fn unknown_value_type_is_rejected() {
        let document = r#"{"groups": [{"id": "g", "subgroups": [{"id": "s", "rules": [{
            "id": "r", "check": "IsEven",
            "objects": [{"accessor": "getFieldValue", "valueType": "money"}]
        }]}]}]}"#;
        assert!(from_json_str(document, today()).is_err());
    }
}
