//! Orchestration of a whole rule set over target objects.
//!
//! ```rust
//! use tessera_rules::prelude::*;
//!
//! let rule_set = RuleSet::new().with_group(
//!     RuleGroup::new("age").with_subgroup(
//!         RuleSubGroup::new("adult").with_rule(
//!             Rule::new("min-age", "GreaterThan")
//!                 .with_object(RuleObject::field("age", ValueType::Integer))
//!                 .with_expected(Value::Integer(17))
//!                 .with_message(Verdict::Failed, "age $1 is not above $0"),
//!         ),
//!     ),
//! );
//!
//! let engine = RuleEngine::builder(Record::accessors())
//!     .rule_set(rule_set)
//!     .build();
//!
//! let mut record = Record::new().with_field("age", Value::Integer(15));
//! let evaluation = engine.run("row 1", &mut record);
//!
//! let messages: Vec<String> = evaluation.reportable().map(|r| r.message()).collect();
//! assert_eq!(messages, ["age [15] is not above [17]"]);
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::accessor::Accessors;
use crate::action::{ActionRegistry, ActionReport};
use crate::check::CheckRegistry;
use crate::config::EngineConfig;
use crate::evaluation::{Evaluation, GroupOutcome, GroupStatus};
use crate::extract::ValueSource;
use crate::group::RuleGroup;
use crate::result::{RuleExecutionCollection, RuleExecutionResult};
use crate::ruleset::RuleSet;
use crate::subgroup::RuleCounters;

/// Evaluates the active groups of a [`RuleSet`] against objects of type `T`.
///
/// Immutable once built; one engine may evaluate different objects from
/// different threads.
pub struct RuleEngine<T> {
    rule_set: RuleSet,
    checks: Arc<CheckRegistry>,
    actions: Arc<ActionRegistry>,
    accessors: Arc<Accessors<T>>,
    config: EngineConfig,
    unresolved: Vec<String>,
}

impl<T> RuleEngine<T> {
    /// Start building an engine over `accessors`.
    pub fn builder(accessors: impl Into<Arc<Accessors<T>>>) -> RuleEngineBuilder<T> {
        RuleEngineBuilder {
            rule_set: RuleSet::default(),
            checks: None,
            actions: None,
            accessors: accessors.into(),
            config: EngineConfig::default(),
            today: None,
        }
    }

    /// Evaluates every active group against `target`, in declaration order.
    pub fn run(&self, label: &str, target: &mut T) -> Evaluation {
        let span = tracing::debug_span!("evaluate", object = %label);
        let _entered = span.enter();

        let mut evaluation = Evaluation::new(label, self.config.output);
        for group in &self.rule_set.groups {
            let outcome = if self.dependency_admits(group, &evaluation) {
                self.run_group(group, label, target)
            } else {
                GroupOutcome {
                    group_id: group.id.clone(),
                    status: GroupStatus::Skipped,
                    rule_logic: group.rule_logic(),
                    counters: RuleCounters::default(),
                    actions: ActionReport::default(),
                    results: Vec::new(),
                }
            };
            evaluation.push(outcome);
        }

        let counters = evaluation.counters();
        tracing::debug!(
            groups = counters.groups_run,
            skipped = counters.groups_skipped,
            failed_rules = counters.rules.failed,
            "object evaluated"
        );
        evaluation
    }

    /// Evaluates each `(label, target)` pair and aggregates the results.
    pub fn run_all<'a, I>(&self, targets: I) -> RuleExecutionCollection
    where
        I: IntoIterator<Item = (String, &'a mut T)>,
        T: 'a,
    {
        let mut collection = RuleExecutionCollection::new();
        for (label, target) in targets {
            collection.absorb(self.run(&label, target));
        }
        collection
    }

    fn dependency_admits(&self, group: &RuleGroup, evaluation: &Evaluation) -> bool {
        let Some(dependency) = &group.dependency else {
            return true;
        };
        let actual = evaluation.verdict_of(&dependency.group_id);
        let admitted = actual == Some(dependency.execute_if);
        if !admitted {
            tracing::debug!(
                group = %group.id,
                depends_on = %dependency.group_id,
                required = %dependency.execute_if,
                actual = ?actual,
                "group skipped"
            );
        }
        admitted
    }

    fn run_group(&self, group: &RuleGroup, label: &str, target: &mut T) -> GroupOutcome {
        let timestamp = Local::now().naive_local();
        let run = group.run(target, &self.checks, &self.actions, &self.accessors);

        let results = if group.preserve_results {
            run.subgroups
                .iter()
                .flat_map(|subgroup| {
                    subgroup.rules.iter().map(|(rule, rule_run)| RuleExecutionResult {
                        timestamp,
                        group_id: group.id.clone(),
                        subgroup_id: subgroup.id.clone(),
                        object_label: label.to_owned(),
                        rule: Arc::clone(rule),
                        verdict: rule_run.verdict,
                        operand1: rule_run.operand1.clone(),
                        operand2: rule_run.operand2.clone(),
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        GroupOutcome {
            group_id: group.id.clone(),
            status: GroupStatus::Evaluated(run.verdict),
            rule_logic: group.rule_logic(),
            counters: run.counters,
            actions: run.actions,
            results,
        }
    }

    /// The active rule set.
    pub const fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// Engine configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check registry in use.
    pub fn checks(&self) -> &CheckRegistry {
        &self.checks
    }

    /// Action registry in use.
    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Checks, actions and accessors referenced by the rule set that could
    /// not be found when the engine was built. Rules and actions using them
    /// always fail.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }
}

impl<T> fmt::Debug for RuleEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEngine")
            .field("groups", &self.rule_set.groups.len())
            .field("checks", &self.checks.len())
            .field("actions", &self.actions.len())
            .field("config", &self.config)
            .field("unresolved", &self.unresolved)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`RuleEngine`].
pub struct RuleEngineBuilder<T> {
    rule_set: RuleSet,
    checks: Option<Arc<CheckRegistry>>,
    actions: Option<Arc<ActionRegistry>>,
    accessors: Arc<Accessors<T>>,
    config: EngineConfig,
    today: Option<NaiveDate>,
}

impl<T> RuleEngineBuilder<T> {
    /// Rule set to evaluate. Groups outside their validity window on the
    /// build date are dropped.
    #[must_use]
    pub fn rule_set(mut self, rule_set: RuleSet) -> Self {
        self.rule_set = rule_set;
        self
    }

    /// Check registry; defaults to [`CheckRegistry::with_builtins`].
    #[must_use]
    pub fn checks(mut self, checks: impl Into<Arc<CheckRegistry>>) -> Self {
        self.checks = Some(checks.into());
        self
    }

    /// Action registry; defaults to [`ActionRegistry::with_builtins`].
    #[must_use]
    pub fn actions(mut self, actions: impl Into<Arc<ActionRegistry>>) -> Self {
        self.actions = Some(actions.into());
        self
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Date used for the validity gate; defaults to the local date.
    #[must_use]
    pub const fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Applies the validity gate, keeps the first of any active groups
    /// sharing an id, validates the rest and resolves names once.
    pub fn build(self) -> RuleEngine<T> {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let mut rule_set = self.rule_set;
        let excluded = rule_set.retain_active(today);
        if !excluded.is_empty() {
            tracing::info!(?excluded, %today, "groups excluded from the active rule set");
        }
        let duplicates = rule_set.remove_duplicate_groups();
        if !duplicates.is_empty() {
            tracing::warn!(?duplicates, "dropping groups that repeat an earlier group id");
        }
        if let Err(error) = rule_set.validate() {
            tracing::warn!(%error, "rule set failed validation");
        }

        let checks = self
            .checks
            .unwrap_or_else(|| Arc::new(CheckRegistry::with_builtins()));
        let actions = self
            .actions
            .unwrap_or_else(|| Arc::new(ActionRegistry::with_builtins()));

        let unresolved = unresolved_names(&rule_set, &checks, &actions, &self.accessors);
        for name in &unresolved {
            tracing::warn!(%name, "unresolved name in rule set");
        }

        RuleEngine {
            rule_set,
            checks,
            actions,
            accessors: self.accessors,
            config: self.config,
            unresolved,
        }
    }
}

impl<T> fmt::Debug for RuleEngineBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEngineBuilder")
            .field("groups", &self.rule_set.groups.len())
            .field("config", &self.config)
            .field("today", &self.today)
            .finish_non_exhaustive()
    }
}

fn unresolved_names<T>(
    rule_set: &RuleSet,
    checks: &CheckRegistry,
    actions: &ActionRegistry,
    accessors: &Accessors<T>,
) -> Vec<String> {
    let mut missing = Vec::new();
    let mut note = |name: String| {
        if !missing.contains(&name) {
            missing.push(name);
        }
    };

    for group in &rule_set.groups {
        for rule in group.subgroups.iter().flat_map(|subgroup| &subgroup.rules) {
            if !checks.contains(&rule.check) {
                note(format!("check `{}`", rule.check));
            }
            for object in &rule.objects {
                if let ValueSource::Accessor { name, .. } = &object.source
                    && !accessors.has_getter(name)
                {
                    note(format!("getter `{name}`"));
                }
            }
        }
        for action in &group.actions {
            let key = action.key();
            if !actions.contains(&key) {
                note(format!("action `{key}`"));
            }
            for getter in &action.getters {
                if !accessors.has_getter(&getter.accessor) {
                    note(format!("getter `{}`", getter.accessor));
                }
            }
            if let Some(setter) = &action.setter
                && !accessors.has_setter(&setter.accessor)
            {
                note(format!("setter `{}`", setter.accessor));
            }
        }
    }
    missing
}
