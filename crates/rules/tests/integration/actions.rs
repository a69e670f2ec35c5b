//! Integration test: actions rewriting the target after a verdict

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tessera_rules::prelude::*;
use tessera_rules::record::{GET_FIELD, SET_FIELD};
use tessera_rules::{ActionInvocationError, ExtractionError};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn name_starts_upper() -> RuleSubGroup {
    RuleSubGroup::new("name").with_rule(
        Rule::new("capitalised", "StartsWith")
            .with_object(RuleObject::field("name", ValueType::String))
            .with_expected("A")
            .with_message(Verdict::Failed, "name $1 does not start with $0")
            .with_message(Verdict::Passed, "name $1 starts with $0"),
    )
}

fn on_name(id: &str, method: &str) -> ActionDefinition {
    ActionDefinition::new(id, "StringAction", method)
        .with_execute_if(ExecuteIf::Failed)
        .with_getter(ActionObject::field(GET_FIELD, "name", ValueType::String))
        .with_setter(ActionObject::field(SET_FIELD, "name", ValueType::String))
}

fn engine(group: RuleGroup) -> RuleEngine<Record> {
    RuleEngine::builder(Record::accessors())
        .rule_set(RuleSet::new().with_group(group))
        .config(EngineConfig::default().with_output(OutputFilter::All))
        .today(today())
        .build()
}

#[test]
fn failed_group_runs_admitted_actions_in_order() {
    let group = RuleGroup::new("g")
        .with_subgroup(name_starts_upper())
        .with_action(on_name("trim", "trimValue"))
        .with_action(on_name("shout", "upperCaseValue"))
        .with_action(on_name("never", "lowerCaseValue").with_execute_if(ExecuteIf::Passed));
    let mut record = Record::new().with_field("name", "  alice ");

    let evaluation = engine(group).run("row 1", &mut record);

    assert_eq!(record.get("name"), Some(&Value::from("ALICE")));
    let outcome = evaluation.group("g").unwrap();
    assert_eq!(outcome.actions.executed, 2);
    assert_eq!(outcome.actions.skipped, 1);
    assert!(outcome.actions.failures.is_empty());
}

#[test]
fn operands_are_reported_before_actions_by_default() {
    let group = RuleGroup::new("g")
        .with_subgroup(name_starts_upper())
        .with_action(on_name("shout", "upperCaseValue"));
    let mut record = Record::new().with_field("name", "alice");

    let evaluation = engine(group).run("row 1", &mut record);
    let result = evaluation.results().next().unwrap();

    assert_eq!(result.verdict, Verdict::Failed);
    assert_eq!(result.message(), "name [alice] does not start with [A]");
}

#[test]
fn output_after_actions_reports_rewritten_operands() {
    let group = RuleGroup::new("g")
        .with_subgroup(name_starts_upper())
        .with_action(on_name("shout", "upperCaseValue"))
        .with_output_after_actions(true);
    let mut record = Record::new().with_field("name", "alice");

    let evaluation = engine(group).run("row 1", &mut record);
    let result = evaluation.results().next().unwrap();

    // The verdict stays the one computed before the actions ran.
    assert_eq!(result.verdict, Verdict::Failed);
    assert_eq!(result.message(), "name [ALICE] does not start with [A]");
}

#[test]
fn failing_action_does_not_stop_the_others() {
    let _log = tessera_log::init_test();
    let group = RuleGroup::new("g")
        .with_subgroup(name_starts_upper())
        .with_action(on_name("cut", "subStringValue").with_parameter(40))
        .with_action(on_name("missing", "reverseValue"))
        .with_action(on_name("pad", "addLeadingZeros").with_parameter(8));
    let mut record = Record::new().with_field("name", "bob");

    let evaluation = engine(group).run("row 1", &mut record);

    assert_eq!(record.get("name"), Some(&Value::from("00000bob")));
    let report = &evaluation.group("g").unwrap().actions;
    assert_eq!(report.executed, 1);
    let failed: Vec<_> = report.failures.iter().map(|f| f.action_id.as_str()).collect();
    assert_eq!(failed, ["cut", "missing"]);
    assert!(matches!(report.failures[0].error, ActionInvocationError::Failed { .. }));
    assert!(matches!(report.failures[1].error, ActionInvocationError::UnknownAction(_)));
    assert_eq!(evaluation.counters().actions_failed, 2);
}

#[test]
fn unreadable_getter_fails_the_action() {
    let _log = tessera_log::init_test();
    let group = RuleGroup::new("g")
        .with_subgroup(name_starts_upper())
        .with_action(
            ActionDefinition::new("copy", "StringAction", "trimValue")
                .with_getter(ActionObject::field(GET_FIELD, "nickname", ValueType::String))
                .with_setter(ActionObject::field(SET_FIELD, "name", ValueType::String)),
        );
    let mut record = Record::new().with_field("name", "bob");

    let evaluation = engine(group).run("row 1", &mut record);

    let report = &evaluation.group("g").unwrap().actions;
    assert_eq!(report.executed, 0);
    assert!(matches!(
        report.failures[0].error,
        ActionInvocationError::Read { source: ExtractionError::Accessor { .. }, .. }
    ));
    assert_eq!(record.get("name"), Some(&Value::from("bob")));
}

#[test]
fn setter_value_type_controls_the_write() {
    let group = RuleGroup::new("g")
        .with_subgroup(name_starts_upper())
        .with_action(
            ActionDefinition::new("zip", "StringAction", "setValue")
                .with_parameter("04711")
                .with_setter(
                    ActionObject::field(SET_FIELD, "zip", ValueType::String)
                        .with_parameter(Parameter::setter_value(Value::Integer(0))),
                ),
        );
    let mut record = Record::new().with_field("name", "bob");

    engine(group).run("row 1", &mut record);

    assert_eq!(record.get("zip"), Some(&Value::Integer(4711)));
}
