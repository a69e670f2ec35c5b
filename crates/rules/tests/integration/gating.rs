//! Integration test: validity windows, dependencies and result retention

use chrono::NaiveDate;
use tessera_rules::prelude::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn group(id: &str, field: &str) -> RuleGroup {
    RuleGroup::new(id).with_subgroup(
        RuleSubGroup::new("sg").with_rule(
            Rule::new(format!("{id}-even"), "IsEven")
                .with_object(RuleObject::field(field, ValueType::Integer)),
        ),
    )
}

fn record() -> Record {
    Record::new()
        .with_field("two", Value::Integer(2))
        .with_field("three", Value::Integer(3))
}

fn engine(rule_set: RuleSet) -> RuleEngine<Record> {
    RuleEngine::builder(Record::accessors())
        .rule_set(rule_set)
        .config(EngineConfig::default().with_output(OutputFilter::All))
        .today(today())
        .build()
}

#[test]
fn groups_outside_their_window_never_report() {
    let _log = tessera_log::init_test();
    let rule_set = RuleSet::new()
        .with_group(group("expired", "three").with_validity(Some("2020-01-01"), Some("2023-12-31")))
        .with_group(group("pending", "three").with_validity(Some("2024-06-02"), None))
        .with_group(group("malformed", "three").with_validity(Some("01.01.2024"), None))
        .with_group(
            group("today-only", "three").with_validity(Some("2024-06-01"), Some("2024-06-01")),
        );

    let engine = engine(rule_set);
    let evaluation = engine.run("row 1", &mut record());

    let ids: Vec<_> = engine.rule_set().groups.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, ["today-only"]);
    assert!(evaluation.results().all(|result| result.group_id == "today-only"));
    assert_eq!(evaluation.groups().len(), 1);
}

#[test]
fn passed_dependency_skips_group_after_failed_reference() {
    let rule_set = RuleSet::new()
        .with_group(group("base", "three"))
        .with_group(group("on-pass", "two").with_dependency("base", Verdict::Passed))
        .with_group(group("on-fail", "two").with_dependency("base", Verdict::Failed));

    let evaluation = engine(rule_set).run("row 1", &mut record());

    assert_eq!(evaluation.verdict_of("base"), Some(Verdict::Failed));
    assert!(evaluation.group("on-pass").unwrap().skipped());
    assert_eq!(evaluation.verdict_of("on-pass"), None);
    assert_eq!(evaluation.verdict_of("on-fail"), Some(Verdict::Passed));
    assert!(evaluation.results().all(|result| result.group_id != "on-pass"));

    let counters = evaluation.counters();
    assert_eq!(counters.groups_run, 2);
    assert_eq!(counters.groups_skipped, 1);
}

#[test]
fn dependency_on_skipped_or_unknown_group_skips() {
    let rule_set = RuleSet::new()
        .with_group(group("base", "three"))
        .with_group(group("second", "two").with_dependency("base", Verdict::Passed))
        .with_group(group("third", "two").with_dependency("second", Verdict::Passed))
        .with_group(group("orphan", "two").with_dependency("missing", Verdict::Passed));

    let evaluation = engine(rule_set).run("row 1", &mut record());

    assert!(evaluation.group("third").unwrap().skipped());
    assert!(evaluation.group("orphan").unwrap().skipped());
}

#[test]
fn dependency_on_later_group_skips() {
    let rule_set = RuleSet::new()
        .with_group(group("early", "two").with_dependency("late", Verdict::Passed))
        .with_group(group("late", "two"));

    let evaluation = engine(rule_set).run("row 1", &mut record());

    assert!(evaluation.group("early").unwrap().skipped());
    assert_eq!(evaluation.verdict_of("late"), Some(Verdict::Passed));
}

#[test]
fn repeated_group_id_keeps_first_declaration() {
    let rule_set = RuleSet::new()
        .with_group(group("g", "two"))
        .with_group(group("g", "three"))
        .with_group(group("after", "two").with_dependency("g", Verdict::Passed));

    let engine = engine(rule_set);
    let evaluation = engine.run("row 1", &mut record());

    assert_eq!(engine.rule_set().groups.len(), 2);
    assert_eq!(evaluation.groups().len(), 2);
    assert_eq!(evaluation.verdict_of("g"), Some(Verdict::Passed));
    assert_eq!(evaluation.verdict_of("after"), Some(Verdict::Passed));
}

#[test]
fn duplicate_in_expired_window_does_not_shadow_active_group() {
    let rule_set = RuleSet::new()
        .with_group(group("g", "three").with_validity(None, Some("2023-12-31")))
        .with_group(group("g", "two").with_validity(Some("2024-01-01"), None));

    let evaluation = engine(rule_set).run("row 1", &mut record());

    assert_eq!(evaluation.verdict_of("g"), Some(Verdict::Passed));
}

#[test]
fn counters_survive_when_results_are_not_preserved() {
    let rule_set = RuleSet::new()
        .with_group(group("quiet", "three").with_preserve_results(false))
        .with_group(group("loud", "three"));

    let evaluation = engine(rule_set).run("row 1", &mut record());

    assert!(evaluation.group("quiet").unwrap().results.is_empty());
    assert_eq!(evaluation.results().count(), 1);
    let counters = evaluation.counters();
    assert_eq!(counters.rules.run, 2);
    assert_eq!(counters.rules.failed, 2);
    assert_eq!(counters.groups_failed, 2);
}

#[test]
fn collection_aggregates_many_objects() {
    let engine = engine(RuleSet::new().with_group(group("g", "n")));
    let mut rows: Vec<Record> = (0..4)
        .map(|n| Record::new().with_field("n", Value::Integer(n)))
        .collect();

    let collection = engine.run_all(
        rows.iter_mut()
            .enumerate()
            .map(|(index, row)| (format!("row {}", index + 1), row)),
    );

    let counters = collection.counters();
    assert_eq!(counters.objects, 4);
    assert_eq!(counters.groups_passed, 2);
    assert_eq!(counters.groups_failed, 2);
    assert_eq!(collection.len(), 4);
    let failed: Vec<_> = collection
        .filtered(OutputFilter::Failed)
        .map(|result| result.object_label.as_str())
        .collect();
    assert_eq!(failed, ["row 2", "row 4"]);
}

#[test]
fn unknown_check_is_reported_and_fails() {
    let _log = tessera_log::init_test();
    let rule_set = RuleSet::new().with_group(
        RuleGroup::new("g").with_subgroup(
            RuleSubGroup::new("sg").with_rule(
                Rule::new("r", "IsPrime").with_object(RuleObject::field("two", ValueType::Integer)),
            ),
        ),
    );

    let engine = engine(rule_set);
    let evaluation = engine.run("row 1", &mut record());

    assert_eq!(engine.unresolved(), ["check `IsPrime`"]);
    assert_eq!(evaluation.verdict_of("g"), Some(Verdict::Failed));
}

#[test]
fn unreadable_operand_fails_rule_and_reports_null() {
    let rule_set = RuleSet::new().with_group(
        RuleGroup::new("g").with_subgroup(
            RuleSubGroup::new("sg").with_rule(
                Rule::new("r", "IsEmpty")
                    .with_object(RuleObject::field("absent", ValueType::String))
                    .with_message(Verdict::Failed, "got $1"),
            ),
        ),
    );

    let evaluation = engine(rule_set).run("row 1", &mut record());
    let result = evaluation.results().next().unwrap();

    assert_eq!(result.verdict, Verdict::Failed);
    assert_eq!(result.message(), "got [null]");
}
