//! Per-pass evaluation state.
//!
//! The rule tree never changes while it is evaluated. Everything a pass
//! produces (group verdicts, counters, action reports, results) lives in an
//! [`Evaluation`], created fresh for each object.

use std::collections::HashMap;

use crate::action::ActionReport;
use crate::config::OutputFilter;
use crate::logic::Verdict;
use crate::result::{ExecutionCounters, RuleExecutionResult};
use crate::subgroup::RuleCounters;

/// How a group fared in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    /// Evaluated with this verdict.
    Evaluated(Verdict),
    /// Not evaluated because its dependency gate was closed.
    Skipped,
}

/// Outcome of one group in one pass.
#[derive(Debug, Clone)]
pub struct GroupOutcome {
    /// Group id.
    pub group_id: String,
    /// Verdict or skip.
    pub status: GroupStatus,
    /// Audit expression of the fold.
    pub rule_logic: String,
    /// Rule counters; zero when skipped.
    pub counters: RuleCounters,
    /// Action report; empty when skipped.
    pub actions: ActionReport,
    /// Preserved results; empty when skipped or not preserved.
    pub results: Vec<RuleExecutionResult>,
}

impl GroupOutcome {
    /// The verdict, or `None` if the group was skipped.
    pub const fn verdict(&self) -> Option<Verdict> {
        match self.status {
            GroupStatus::Evaluated(verdict) => Some(verdict),
            GroupStatus::Skipped => None,
        }
    }

    /// Returns `true` if the dependency gate skipped the group.
    pub const fn skipped(&self) -> bool {
        matches!(self.status, GroupStatus::Skipped)
    }

    /// Number of actions that completed.
    pub const fn actions_executed(&self) -> usize {
        self.actions.executed
    }
}

/// Everything one pass over one object produced.
#[derive(Debug, Clone)]
pub struct Evaluation {
    label: String,
    filter: OutputFilter,
    groups: Vec<GroupOutcome>,
    index: HashMap<String, usize>,
}

impl Evaluation {
    pub(crate) fn new(label: impl Into<String>, filter: OutputFilter) -> Self {
        Self {
            label: label.into(),
            filter,
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub(crate) fn push(&mut self, outcome: GroupOutcome) {
        self.index.insert(outcome.group_id.clone(), self.groups.len());
        self.groups.push(outcome);
    }

    /// Label of the evaluated object.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Group outcomes in evaluation order.
    pub fn groups(&self) -> &[GroupOutcome] {
        &self.groups
    }

    /// Outcome of `group_id`, if it was reached in this pass.
    pub fn group(&self, group_id: &str) -> Option<&GroupOutcome> {
        self.index.get(group_id).map(|&position| &self.groups[position])
    }

    /// Verdict of `group_id`; `None` if unknown, not yet evaluated or
    /// skipped.
    pub fn verdict_of(&self, group_id: &str) -> Option<Verdict> {
        self.group(group_id).and_then(GroupOutcome::verdict)
    }

    /// All preserved results, in evaluation order.
    pub fn results(&self) -> impl Iterator<Item = &RuleExecutionResult> {
        self.groups.iter().flat_map(|group| group.results.iter())
    }

    /// Results admitted by the engine's output filter.
    pub fn reportable(&self) -> impl Iterator<Item = &RuleExecutionResult> {
        let filter = self.filter;
        self.results()
            .filter(move |result| filter.admits(result.verdict))
    }

    /// Counters for this pass.
    pub fn counters(&self) -> ExecutionCounters {
        let mut counters = ExecutionCounters {
            objects: 1,
            ..ExecutionCounters::default()
        };
        for group in &self.groups {
            counters.rules.merge(group.counters);
            counters.actions_executed += group.actions.executed as u64;
            counters.actions_failed += group.actions.failures.len() as u64;
            match group.status {
                GroupStatus::Evaluated(verdict) => {
                    counters.groups_run += 1;
                    match verdict {
                        Verdict::Passed => counters.groups_passed += 1,
                        Verdict::Failed => counters.groups_failed += 1,
                    }
                }
                GroupStatus::Skipped => counters.groups_skipped += 1,
            }
        }
        counters
    }

    /// Total number of actions that completed.
    pub fn actions_executed(&self) -> usize {
        self.groups.iter().map(GroupOutcome::actions_executed).sum()
    }

    /// Consumes the evaluation, yielding its preserved results.
    pub fn into_results(self) -> impl Iterator<Item = RuleExecutionResult> {
        self.groups.into_iter().flat_map(|group| group.results)
    }
}
