use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tessera_rules::{EngineConfig, Record, RuleEngine, definition};

use super::{open, today_or};
use crate::cli::RunArgs;
use crate::report;

pub fn run(args: &RunArgs) -> Result<ExitCode> {
    let today = today_or(args.date);
    let rule_set = definition::from_reader(open(&args.rules, "rules")?, today)
        .with_context(|| format!("cannot load rule set {}", args.rules.display()))?;
    let mut records: Vec<Record> = serde_json::from_reader(open(&args.records, "records")?)
        .with_context(|| format!("cannot read records {}", args.records.display()))?;

    let mut config = EngineConfig::from_env();
    if let Some(output) = args.output {
        config.output = output;
    }

    let engine = RuleEngine::builder(Record::accessors())
        .rule_set(rule_set)
        .config(config.clone())
        .today(today)
        .build();
    tracing::info!(
        groups = engine.rule_set().groups.len(),
        records = records.len(),
        "evaluating"
    );

    let label_field = args.label_field.as_deref();
    let collection = engine.run_all(
        records
            .iter_mut()
            .enumerate()
            .map(|(index, record)| (label(record, index, label_field), record)),
    );

    let timestamp_format = args.timestamps.then_some(config.timestamp_format());
    let mut out = io::stdout().lock();
    let mut any_failed = false;
    for result in collection.filtered(config.output) {
        any_failed |= !result.passed();
        writeln!(out, "{}", report::line(result, timestamp_format))?;
    }
    writeln!(out, "{}", report::summary(collection.counters()))?;
    out.flush()?;

    Ok(if args.strict && any_failed {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

/// Value of `field` when present and not null, else the 1-based position.
fn label(record: &Record, index: usize, field: Option<&str>) -> String {
    field
        .and_then(|field| record.get(field))
        .filter(|value| !value.is_null())
        .map_or_else(|| format!("row {}", index + 1), ToString::to_string)
}
