//! Subgroups: rules combined by one operator.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::accessor::Accessors;
use crate::check::CheckRegistry;
use crate::logic::{LogicalOperator, Verdict, fold_chain};
use crate::rule::{Rule, RuleRun};

/// Ordered rules folded with `intra_operator`, chained into the parent group
/// with `inter_operator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSubGroup {
    /// Identifier, unique within its group.
    pub id: String,
    /// Free text.
    #[serde(default)]
    pub description: String,
    /// Rules in evaluation order.
    #[serde(default)]
    pub rules: Vec<Arc<Rule>>,
    /// Combines this subgroup's rules.
    #[serde(default)]
    pub intra_operator: LogicalOperator,
    /// Combines this subgroup's verdict with the preceding chain. Never
    /// consulted for the first subgroup of a group.
    #[serde(default)]
    pub inter_operator: LogicalOperator,
}

/// Rule counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleCounters {
    /// Rules evaluated.
    pub run: u64,
    /// Rules that passed.
    pub passed: u64,
    /// Rules that failed.
    pub failed: u64,
}

impl RuleCounters {
    /// Counts one verdict.
    pub fn record(&mut self, verdict: Verdict) {
        self.run += 1;
        match verdict {
            Verdict::Passed => self.passed += 1,
            Verdict::Failed => self.failed += 1,
        }
    }

    /// Adds another set of counters.
    pub fn merge(&mut self, other: Self) {
        self.run += other.run;
        self.passed += other.passed;
        self.failed += other.failed;
    }
}

/// Outcome of one subgroup evaluation.
#[derive(Debug, Clone)]
pub struct SubGroupRun {
    /// Id of the subgroup.
    pub id: String,
    /// Operator chaining this subgroup into its group.
    pub inter_operator: LogicalOperator,
    /// Folded verdict.
    pub verdict: Verdict,
    /// Rule counters.
    pub counters: RuleCounters,
    /// One entry per rule, in order.
    pub rules: Vec<(Arc<Rule>, RuleRun)>,
}

impl RuleSubGroup {
    /// Create an empty AND/AND subgroup.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            rules: Vec::new(),
            intra_operator: LogicalOperator::And,
            inter_operator: LogicalOperator::And,
        }
    }

    /// Appends a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Sets the operator combining this subgroup's rules.
    #[must_use]
    pub const fn with_intra_operator(mut self, operator: LogicalOperator) -> Self {
        self.intra_operator = operator;
        self
    }

    /// Sets the operator chaining this subgroup into its group.
    #[must_use]
    pub const fn with_inter_operator(mut self, operator: LogicalOperator) -> Self {
        self.inter_operator = operator;
        self
    }

    /// Folds already-known rule verdicts with the intra operator.
    pub fn combine(&self, verdicts: impl IntoIterator<Item = Verdict>) -> Verdict {
        let operator = self.intra_operator;
        fold_chain(verdicts.into_iter().map(|verdict| (operator, verdict)))
    }

    /// Evaluates every rule (no short-circuit) and folds the verdicts.
    pub fn run<T>(
        &self,
        target: &T,
        checks: &CheckRegistry,
        accessors: &Accessors<T>,
    ) -> SubGroupRun {
        let mut counters = RuleCounters::default();
        let rules: Vec<_> = self
            .rules
            .iter()
            .map(|rule| {
                let run = rule.run(target, checks, accessors);
                counters.record(run.verdict);
                (Arc::clone(rule), run)
            })
            .collect();
        let verdict = self.combine(rules.iter().map(|(_, run)| run.verdict));
        tracing::debug!(subgroup = %self.id, %verdict, rules = counters.run, "subgroup evaluated");
        SubGroupRun {
            id: self.id.clone(),
            inter_operator: self.inter_operator,
            verdict,
            counters,
            rules,
        }
    }

    /// Rule ids joined by the intra operator, in one pair of parentheses.
    pub fn rule_logic(&self) -> String {
        let separator = format!(" {} ", self.intra_operator);
        let ids: Vec<&str> = self.rules.iter().map(|rule| rule.id.as_str()).collect();
        format!("({})", ids.join(&separator))
    }
}
