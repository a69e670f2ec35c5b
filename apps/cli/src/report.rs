//! Plain-text report lines.

use tessera_rules::config::{DEFAULT_TIMESTAMP_FORMAT, is_valid_timestamp_format};
use tessera_rules::{ExecutionCounters, RuleExecutionResult};

/// `<label> <group>/<subgroup>/<rule> <true|false> <message>`, optionally
/// prefixed with the evaluation timestamp. An invalid timestamp format
/// falls back to [`DEFAULT_TIMESTAMP_FORMAT`].
pub fn line(result: &RuleExecutionResult, timestamp_format: Option<&str>) -> String {
    let body = format!(
        "{} {} {} {}",
        result.object_label,
        result.path(),
        result.passed(),
        result.message()
    );
    match timestamp_format {
        Some(format) => {
            let format = if is_valid_timestamp_format(format) {
                format
            } else {
                DEFAULT_TIMESTAMP_FORMAT
            };
            format!("{} {body}", result.timestamp.format(format))
        }
        None => body,
    }
}

/// One-line totals.
pub fn summary(counters: &ExecutionCounters) -> String {
    format!(
        "objects: {}, rules: {} (passed {}, failed {}), groups: {} run, {} skipped, actions: {} executed, {} failed",
        counters.objects,
        counters.rules.run,
        counters.rules.passed,
        counters.rules.failed,
        counters.groups_run,
        counters.groups_skipped,
        counters.actions_executed,
        counters.actions_failed,
    )
}
