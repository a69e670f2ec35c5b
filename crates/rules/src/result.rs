//! Per-rule results and their aggregation across evaluations.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::OutputFilter;
use crate::evaluation::Evaluation;
use crate::extract::Operand;
use crate::logic::Verdict;
use crate::message;
use crate::rule::Rule;
use crate::subgroup::RuleCounters;

/// Immutable record of one rule evaluation against one object.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleExecutionResult {
    /// When the owning group was evaluated.
    pub timestamp: NaiveDateTime,
    /// Owning group.
    pub group_id: String,
    /// Owning subgroup.
    pub subgroup_id: String,
    /// Label of the evaluated object.
    pub object_label: String,
    /// The rule that ran.
    pub rule: Arc<Rule>,
    /// Its verdict.
    pub verdict: Verdict,
    /// Operand 1 as reported.
    pub operand1: Option<Operand>,
    /// Operand 2 as reported; never set when the rule has an expected literal.
    pub operand2: Option<Operand>,
}

impl RuleExecutionResult {
    /// Rendered message for the verdict.
    pub fn message(&self) -> String {
        message::render(self)
    }

    /// `group/subgroup/rule` path.
    pub fn path(&self) -> String {
        format!("{}/{}/{}", self.group_id, self.subgroup_id, self.rule.id)
    }

    /// Returns `true` if the rule passed.
    pub const fn passed(&self) -> bool {
        self.verdict.is_passed()
    }
}

impl fmt::Display for RuleExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Aggregate counters over any number of evaluations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionCounters {
    /// Objects evaluated.
    pub objects: u64,
    /// Rule counters.
    pub rules: RuleCounters,
    /// Groups evaluated (not skipped).
    pub groups_run: u64,
    /// Groups that passed.
    pub groups_passed: u64,
    /// Groups that failed.
    pub groups_failed: u64,
    /// Groups skipped by their dependency gate.
    pub groups_skipped: u64,
    /// Actions that completed.
    pub actions_executed: u64,
    /// Actions that were eligible but failed.
    pub actions_failed: u64,
}

impl ExecutionCounters {
    /// Adds another set of counters.
    pub fn merge(&mut self, other: &Self) {
        self.objects += other.objects;
        self.rules.merge(other.rules);
        self.groups_run += other.groups_run;
        self.groups_passed += other.groups_passed;
        self.groups_failed += other.groups_failed;
        self.groups_skipped += other.groups_skipped;
        self.actions_executed += other.actions_executed;
        self.actions_failed += other.actions_failed;
    }
}

/// Results and counters collected over many evaluations.
#[derive(Debug, Clone, Default)]
pub struct RuleExecutionCollection {
    results: Vec<RuleExecutionResult>,
    counters: ExecutionCounters,
}

impl RuleExecutionCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one evaluation in, taking its preserved results.
    pub fn absorb(&mut self, evaluation: Evaluation) {
        self.counters.merge(&evaluation.counters());
        self.results.extend(evaluation.into_results());
    }

    /// Aggregate counters.
    pub const fn counters(&self) -> &ExecutionCounters {
        &self.counters
    }

    /// All preserved results, in evaluation order.
    pub fn results(&self) -> &[RuleExecutionResult] {
        &self.results
    }

    /// Results admitted by `filter`.
    pub fn filtered(&self, filter: OutputFilter) -> impl Iterator<Item = &RuleExecutionResult> {
        self.results
            .iter()
            .filter(move |result| filter.admits(result.verdict))
    }

    /// Number of preserved results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if no results are preserved.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
