//! Integration test: rule sets loaded from JSON, evaluated over JSON rows

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tessera_rules::definition;
use tessera_rules::prelude::*;

const RULES: &str = r#"{
    "groups": [
        {
            "id": "customer",
            "description": "customer master data",
            "validFrom": "2024-01-01",
            "subgroups": [
                {
                    "id": "identity",
                    "intraOperator": "and",
                    "rules": [
                        {
                            "id": "name-present",
                            "check": "IsNotEmpty",
                            "objects": [{"accessor": "getFieldValue",
                                         "argument": {"type": "string", "value": "name"},
                                         "valueType": "string"}],
                            "messages": [{"type": "failed", "text": "name is empty"}]
                        },
                        {
                            "id": "zip-length",
                            "check": "LengthEquals",
                            "objects": [{"accessor": "getFieldValue",
                                         "argument": {"type": "string", "value": "zip"},
                                         "valueType": "string"}],
                            "parameters": [{"type": "integer", "value": 5}],
                            "messages": [{"type": "failed", "text": "zip $1 must have 5 digits"}]
                        }
                    ]
                },
                {
                    "id": "age",
                    "interOperator": "or",
                    "rules": [{
                        "id": "adult",
                        "check": "GreaterThan",
                        "objects": [{"accessor": "getFieldValue",
                                     "argument": {"type": "string", "value": "age"},
                                     "valueType": "integer"}],
                        "expected": {"type": "integer", "value": "17"},
                        "messages": [{"type": "passed", "text": "age $1 is above $0"}]
                    }]
                }
            ],
            "actions": [{
                "id": "pad-zip",
                "className": "StringAction",
                "methodName": "addLeadingZeros",
                "executeIf": "failed",
                "getters": [{"accessor": "getFieldValue", "valueType": "string",
                             "parameters": [{"type": "string", "value": "zip"}]}],
                "setter": {"accessor": "setFieldValue", "valueType": "string",
                           "parameters": [{"type": "string", "value": "zip"}]},
                "parameters": [{"type": "integer", "value": 5}]
            }],
            "outputAfterActions": true
        },
        {
            "id": "follow-up",
            "dependency": {"groupId": "customer", "executeIf": "failed"},
            "subgroups": [{
                "id": "zip",
                "rules": [{
                    "id": "zip-padded",
                    "check": "StartsWith",
                    "objects": [{"accessor": "getFieldValue",
                                 "argument": {"type": "string", "value": "zip"},
                                 "valueType": "string"}],
                    "parameters": [{"type": "string", "value": "0"}]
                }]
            }]
        },
        {
            "id": "legacy",
            "validUntil": "2019-12-31",
            "subgroups": [{"id": "s", "rules": [{
                "id": "r", "check": "IsEmpty",
                "objects": [{"accessor": "getFieldValue",
                             "argument": {"type": "string", "value": "name"},
                             "valueType": "string"}]
            }]}]
        }
    ],
    "referenceFields": [
        {"name": "zip", "nameDescriptive": "Postal code", "typeId": "string"}
    ]
}"#;

const ROWS: &str = r#"[
    {"name": "Ada", "zip": "4711", "age": 36},
    {"name": "", "zip": "50667", "age": 12},
    {"name": "Grace", "zip": "10115", "age": 85}
]"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn engine() -> RuleEngine<Record> {
    let rule_set = definition::from_json_str(RULES, today()).unwrap();
    RuleEngine::builder(Record::accessors())
        .rule_set(rule_set)
        .today(today())
        .build()
}

#[test]
fn loader_keeps_only_active_groups() {
    let engine = engine();
    let ids: Vec<_> = engine.rule_set().groups.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, ["customer", "follow-up"]);
    assert_eq!(engine.rule_set().rule_count(), 4);
    assert!(engine.unresolved().is_empty());
    assert_eq!(
        engine.rule_set().group("customer").unwrap().rule_logic(),
        "((name-present and zip-length) or (adult))"
    );
}

#[test]
fn rows_are_validated_and_repaired() {
    let engine = engine();
    let mut rows: Vec<Record> = serde_json::from_str(ROWS).unwrap();

    let collection = engine.run_all(
        rows.iter_mut()
            .enumerate()
            .map(|(index, row)| (format!("row {}", index + 1), row)),
    );

    // Row 1 fails on the zip but passes on the age, so the group passes.
    // Row 2 fails both subgroups; its zip is fine, so padding keeps it.
    assert_eq!(rows[0].get("zip"), Some(&Value::from("4711")));
    assert_eq!(rows[1].get("zip"), Some(&Value::from("50667")));

    let reported: Vec<_> = collection
        .filtered(OutputFilter::Failed)
        .map(|result| format!("{} {} {}", result.object_label, result.path(), result.message()))
        .collect();
    assert_eq!(
        reported,
        [
            "row 1 customer/identity/zip-length zip [4711] must have 5 digits",
            "row 2 customer/identity/name-present name is empty",
            "row 2 customer/age/adult [undefined message]",
            "row 2 follow-up/zip/zip-padded [undefined message]",
        ]
    );

    let counters = collection.counters();
    assert_eq!(counters.objects, 3);
    assert_eq!(counters.groups_passed, 2);
    assert_eq!(counters.groups_failed, 2);
    assert_eq!(counters.groups_skipped, 2);
    assert_eq!(counters.actions_executed, 1);
}

#[test]
fn passed_messages_render_with_expected_literal() {
    let engine = engine();
    let mut row = Record::new()
        .with_field("name", "Ada")
        .with_field("zip", "10115")
        .with_field("age", Value::Integer(36));

    let evaluation = engine.run("row 1", &mut row);

    let adult = evaluation
        .results()
        .find(|result| result.rule.id == "adult")
        .unwrap();
    assert_eq!(adult.message(), "age [36] is above [17]");
}
