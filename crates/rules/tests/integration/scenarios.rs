//! Integration test: reference scenarios for the combinators and messages

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tessera_rules::prelude::*;
use tessera_rules::{UNDEFINED_MESSAGE, render};
use tessera_rules::record::{GET_FIELD, SET_FIELD};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn even(id: &str, field: &str) -> Rule {
    Rule::new(id, "IsEven").with_object(RuleObject::field(field, ValueType::Integer))
}

fn engine(rule_set: RuleSet) -> RuleEngine<Record> {
    RuleEngine::builder(Record::accessors())
        .rule_set(rule_set)
        .config(EngineConfig::default().with_output(OutputFilter::All))
        .today(today())
        .build()
}

#[test]
fn and_subgroup_fails_when_one_rule_fails() {
    let rule_set = RuleSet::new().with_group(
        RuleGroup::new("g").with_subgroup(
            RuleSubGroup::new("sg")
                .with_intra_operator(LogicalOperator::And)
                .with_rule(even("r1", "two"))
                .with_rule(even("r2", "three")),
        ),
    );
    let mut record = Record::new()
        .with_field("two", Value::Integer(2))
        .with_field("three", Value::Integer(3));

    let evaluation = engine(rule_set).run("row 1", &mut record);

    assert_eq!(evaluation.verdict_of("g"), Some(Verdict::Failed));
    let verdicts: Vec<_> = evaluation.results().map(|r| (r.rule.id.as_str(), r.verdict)).collect();
    assert_eq!(verdicts, [("r1", Verdict::Passed), ("r2", Verdict::Failed)]);
}

#[test]
fn or_subgroup_passes_when_one_rule_passes() {
    let rule_set = RuleSet::new().with_group(
        RuleGroup::new("g").with_subgroup(
            RuleSubGroup::new("sg")
                .with_intra_operator(LogicalOperator::Or)
                .with_rule(even("r1", "three"))
                .with_rule(even("r2", "two")),
        ),
    );
    let mut record = Record::new()
        .with_field("two", Value::Integer(2))
        .with_field("three", Value::Integer(3));

    let evaluation = engine(rule_set).run("row 1", &mut record);

    assert_eq!(evaluation.verdict_of("g"), Some(Verdict::Passed));
}

#[test]
fn subgroups_chain_left_to_right() {
    // passed AND failed = failed, failed OR passed = passed
    let rule_set = RuleSet::new().with_group(
        RuleGroup::new("g")
            .with_subgroup(RuleSubGroup::new("s1").with_rule(even("r1", "two")))
            .with_subgroup(
                RuleSubGroup::new("s2")
                    .with_inter_operator(LogicalOperator::And)
                    .with_rule(even("r2", "three")),
            )
            .with_subgroup(
                RuleSubGroup::new("s3")
                    .with_inter_operator(LogicalOperator::Or)
                    .with_rule(even("r3", "two")),
            ),
    );
    let mut record = Record::new()
        .with_field("two", Value::Integer(2))
        .with_field("three", Value::Integer(3));

    let engine = engine(rule_set);
    let evaluation = engine.run("row 1", &mut record);

    assert_eq!(evaluation.verdict_of("g"), Some(Verdict::Passed));
    let outcome = evaluation.group("g").unwrap();
    assert_eq!(outcome.rule_logic, "(((r1) and (r2)) or (r3))");
    assert_eq!(outcome.counters.run, 3);
    assert_eq!(outcome.counters.failed, 1);
}

#[test]
fn expected_literal_renders_into_message() {
    let rule_set = RuleSet::new().with_group(
        RuleGroup::new("g").with_subgroup(
            RuleSubGroup::new("sg").with_rule(
                Rule::new("four", "Equals")
                    .with_object(RuleObject::field("n", ValueType::Integer))
                    .with_expected(Value::Integer(4))
                    .with_message(Verdict::Passed, "value $1 matched $0")
                    .with_message(Verdict::Failed, "value $1 did not match $0"),
            ),
        ),
    );
    let mut record = Record::new().with_field("n", Value::Integer(4));

    let evaluation = engine(rule_set).run("row 1", &mut record);
    let result = evaluation.results().next().unwrap();

    assert!(result.passed());
    assert_eq!(result.message(), "value [4] matched [4]");
    assert_eq!(result.path(), "g/sg/four");
    assert_eq!(render(result), render(result));
}

#[test]
fn action_for_failed_verdict_does_not_run_on_passed_group() {
    let rule_set = RuleSet::new().with_group(
        RuleGroup::new("g")
            .with_subgroup(RuleSubGroup::new("sg").with_rule(even("r1", "two")))
            .with_action(
                ActionDefinition::new("shout", "StringAction", "upperCaseValue")
                    .with_execute_if(ExecuteIf::Failed)
                    .with_getter(ActionObject::field(GET_FIELD, "name", ValueType::String))
                    .with_setter(ActionObject::field(SET_FIELD, "name", ValueType::String)),
            ),
    );
    let mut record = Record::new()
        .with_field("two", Value::Integer(2))
        .with_field("name", "alice");

    let evaluation = engine(rule_set).run("row 1", &mut record);

    assert_eq!(evaluation.verdict_of("g"), Some(Verdict::Passed));
    assert_eq!(evaluation.actions_executed(), 0);
    assert_eq!(evaluation.group("g").unwrap().actions.skipped, 1);
    assert_eq!(record.get("name"), Some(&Value::from("alice")));
}

#[test]
fn output_filter_selects_reported_results() {
    let rule_set = RuleSet::new().with_group(
        RuleGroup::new("g").with_subgroup(
            RuleSubGroup::new("sg")
                .with_rule(even("r1", "two"))
                .with_rule(even("r2", "three")),
        ),
    );
    let engine = RuleEngine::builder(Record::accessors())
        .rule_set(rule_set)
        .today(today())
        .build();
    let mut record = Record::new()
        .with_field("two", Value::Integer(2))
        .with_field("three", Value::Integer(3));

    let evaluation = engine.run("row 1", &mut record);

    let reported: Vec<_> = evaluation.reportable().map(|r| r.rule.id.clone()).collect();
    assert_eq!(reported, ["r2"]);
    assert_eq!(evaluation.results().count(), 2);
}

#[test]
fn missing_template_renders_placeholder() {
    let rule_set = RuleSet::new().with_group(
        RuleGroup::new("g").with_subgroup(RuleSubGroup::new("sg").with_rule(even("r1", "three"))),
    );
    let mut record = Record::new().with_field("three", Value::Integer(3));

    let evaluation = engine(rule_set).run("row 1", &mut record);

    assert_eq!(evaluation.results().next().unwrap().message(), UNDEFINED_MESSAGE);
}
