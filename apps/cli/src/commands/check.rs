use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tessera_rules::{Record, RuleEngine, RuleSet};

use super::{open, today_or};
use crate::cli::CheckArgs;

pub fn check(args: &CheckArgs) -> Result<ExitCode> {
    let today = today_or(args.date);
    let mut rule_set: RuleSet = serde_json::from_reader(open(&args.rules, "rules")?)
        .with_context(|| format!("cannot parse rule set {}", args.rules.display()))?;
    rule_set
        .validate()
        .with_context(|| format!("invalid rule set {}", args.rules.display()))?;
    let excluded = rule_set.retain_active(today);

    let engine = RuleEngine::builder(Record::accessors())
        .rule_set(rule_set)
        .today(today)
        .build();

    let mut out = io::stdout().lock();
    for group in &engine.rule_set().groups {
        writeln!(out, "group {}: {} rules {}", group.id, group.rule_count(), group.rule_logic())?;
        if let Some(dependency) = &group.dependency {
            writeln!(out, "  runs if {} {}", dependency.group_id, dependency.execute_if)?;
        }
        for action in &group.actions {
            writeln!(out, "  action {} {} on {}", action.id, action.key(), action.execute_if)?;
        }
    }
    for id in &excluded {
        writeln!(out, "excluded {id} (not valid on {today})")?;
    }
    for name in engine.unresolved() {
        writeln!(out, "unresolved {name}")?;
    }
    out.flush()?;

    Ok(if engine.unresolved().is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
