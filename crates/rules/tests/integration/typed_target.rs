//! Integration test: a typed target with custom checks and actions

use std::sync::Arc;

use chrono::NaiveDate;
use tessera_rules::prelude::*;

#[derive(Debug, Clone)]
struct Invoice {
    amount: f64,
    currency: String,
    issued: NaiveDate,
    due: NaiveDate,
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn accessors() -> Accessors<Invoice> {
    Accessors::new()
        .getter("getAmount", |invoice: &Invoice| Value::Double(invoice.amount))
        .getter("getCurrency", |invoice: &Invoice| Value::from(invoice.currency.as_str()))
        .getter("getIssued", |invoice: &Invoice| Value::Date(invoice.issued))
        .getter("getDue", |invoice: &Invoice| Value::Date(invoice.due))
        .setter("setAmount", |invoice: &mut Invoice, value| match value {
            Value::Double(amount) => {
                invoice.amount = amount;
                Ok(())
            }
            other => Err(FunctionError::new(format!("not an amount: {other}"))),
        })
}

fn checks() -> CheckRegistry {
    let mut checks = CheckRegistry::with_builtins();
    checks.register(
        "IsCurrency",
        CheckFn::unary(|code: String| matches!(code.as_str(), "EUR" | "USD")),
    );
    checks
}

fn actions() -> ActionRegistry {
    let mut actions = ActionRegistry::with_builtins();
    actions.register(
        "InvoiceAction.clamp",
        ActionFn::binary(|amount: f64, limit: f64| Ok(Value::Double(amount.min(limit)))),
    );
    actions
}

fn rule_set() -> RuleSet {
    RuleSet::new().with_group(
        RuleGroup::new("invoice")
            .with_subgroup(
                RuleSubGroup::new("header")
                    .with_rule(
                        Rule::new("currency", "IsCurrency")
                            .with_object(RuleObject::accessor(
                                "getCurrency",
                                None,
                                ValueType::String,
                            )),
                    )
                    .with_rule(
                        Rule::new("due-after-issue", "GreaterThan")
                            .with_object(RuleObject::accessor("getDue", None, ValueType::Date))
                            .with_object(RuleObject::accessor("getIssued", None, ValueType::Date))
                            .with_message(Verdict::Failed, "due date $1 is not after $0"),
                    ),
            )
            .with_subgroup(
                RuleSubGroup::new("amount").with_rule(
                    Rule::new("in-range", "IsBetween")
                        .with_object(RuleObject::accessor("getAmount", None, ValueType::Double))
                        .with_parameter(0.0)
                        .with_parameter(1000.0)
                        .with_message(Verdict::Failed, "amount $1 out of range"),
                ),
            )
            .with_action(
                ActionDefinition::new("clamp", "InvoiceAction", "clamp")
                    .with_execute_if(ExecuteIf::Failed)
                    .with_getter(ActionObject::new("getAmount", ValueType::Double))
                    .with_setter(ActionObject::new("setAmount", ValueType::Double))
                    .with_parameter(1000.0),
            ),
    )
}

fn engine() -> RuleEngine<Invoice> {
    RuleEngine::builder(accessors())
        .rule_set(rule_set())
        .checks(checks())
        .actions(actions())
        .today(day(2024, 6, 1))
        .build()
}

#[test]
fn valid_invoice_passes_untouched() {
    let mut invoice = Invoice {
        amount: 250.0,
        currency: "EUR".into(),
        issued: day(2024, 5, 1),
        due: day(2024, 5, 31),
    };

    let evaluation = engine().run("INV-1", &mut invoice);

    assert_eq!(evaluation.verdict_of("invoice"), Some(Verdict::Passed));
    assert_eq!(evaluation.reportable().count(), 0);
    assert_eq!(evaluation.actions_executed(), 0);
}

#[test]
fn failing_invoice_is_reported_and_clamped() {
    let mut invoice = Invoice {
        amount: 1250.5,
        currency: "EUR".into(),
        issued: day(2024, 5, 31),
        due: day(2024, 5, 1),
    };

    let evaluation = engine().run("INV-2", &mut invoice);

    assert_eq!(evaluation.verdict_of("invoice"), Some(Verdict::Failed));
    let messages: Vec<_> = evaluation.reportable().map(|r| r.message()).collect();
    assert_eq!(
        messages,
        [
            "due date [2024-05-01] is not after [2024-05-31]",
            "amount [1250.5] out of range",
        ]
    );
    assert!((invoice.amount - 1000.0).abs() < f64::EPSILON);
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = Arc::new(engine());
    let handles: Vec<_> = ["EUR", "GBP"]
        .into_iter()
        .map(|currency| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                let mut invoice = Invoice {
                    amount: 10.0,
                    currency: currency.to_owned(),
                    issued: day(2024, 1, 1),
                    due: day(2024, 2, 1),
                };
                engine.run(currency, &mut invoice).verdict_of("invoice")
            })
        })
        .collect();

    let verdicts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(verdicts, [Some(Verdict::Passed), Some(Verdict::Failed)]);
}
