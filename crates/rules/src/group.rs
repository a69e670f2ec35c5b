//! Groups: subgroups chained into one verdict, followed by actions.
//!
//! ```text
//! RuleGroup
//!  ├── RuleSubGroup 0 ── rules ── intra fold ─┐
//!  ├── RuleSubGroup 1 ── rules ── intra fold ─┼── inter fold ── verdict ── actions
//!  └── RuleSubGroup n ── rules ── intra fold ─┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::accessor::Accessors;
use crate::action::{ActionDefinition, ActionRegistry, ActionReport, execute_actions};
use crate::check::CheckRegistry;
use crate::error::ValidityParseError;
use crate::logic::{Verdict, fold_chain};
use crate::subgroup::{RuleCounters, RuleSubGroup, SubGroupRun};
use crate::validity::ValidityWindow;

/// Runs a group only when another group reached a given verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDependency {
    /// Id of the referenced group.
    pub group_id: String,
    /// Verdict the referenced group must have reached.
    pub execute_if: Verdict,
}

const fn preserve_by_default() -> bool {
    true
}

/// Top-level rule scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleGroup {
    /// Identifier, unique within the rule set.
    pub id: String,
    /// Free text.
    #[serde(default)]
    pub description: String,
    /// Subgroups in chain order.
    #[serde(default)]
    pub subgroups: Vec<RuleSubGroup>,
    /// Actions in execution order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionDefinition>,
    /// First valid day, `yyyy-MM-dd`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    /// Last valid day, `yyyy-MM-dd`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    /// Gate on another group's verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<GroupDependency>,
    /// Report operands as they are after the actions ran.
    #[serde(default)]
    pub output_after_actions: bool,
    /// Keep per-rule results; when off only counters are collected.
    #[serde(default = "preserve_by_default")]
    pub preserve_results: bool,
}

/// Outcome of one group evaluation.
#[derive(Debug, Clone)]
pub struct GroupRun {
    /// Chained verdict.
    pub verdict: Verdict,
    /// One entry per subgroup, in order.
    pub subgroups: Vec<SubGroupRun>,
    /// Rule counters summed over all subgroups.
    pub counters: RuleCounters,
    /// What happened to the actions.
    pub actions: ActionReport,
}

impl RuleGroup {
    /// Create an empty, always-valid group.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            subgroups: Vec::new(),
            actions: Vec::new(),
            valid_from: None,
            valid_until: None,
            dependency: None,
            output_after_actions: false,
            preserve_results: true,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a subgroup.
    #[must_use]
    pub fn with_subgroup(mut self, subgroup: RuleSubGroup) -> Self {
        self.subgroups.push(subgroup);
        self
    }

    /// Appends an action.
    #[must_use]
    pub fn with_action(mut self, action: ActionDefinition) -> Self {
        self.actions.push(action);
        self
    }

    /// Sets the validity window bounds.
    #[must_use]
    pub fn with_validity(mut self, from: Option<&str>, until: Option<&str>) -> Self {
        self.valid_from = from.map(str::to_owned);
        self.valid_until = until.map(str::to_owned);
        self
    }

    /// Runs this group only if `group_id` reached `execute_if`.
    #[must_use]
    pub fn with_dependency(mut self, group_id: impl Into<String>, execute_if: Verdict) -> Self {
        self.dependency = Some(GroupDependency {
            group_id: group_id.into(),
            execute_if,
        });
        self
    }

    /// Reports operands as they are after the actions ran.
    #[must_use]
    pub const fn with_output_after_actions(mut self, enabled: bool) -> Self {
        self.output_after_actions = enabled;
        self
    }

    /// Keeps or drops per-rule results.
    #[must_use]
    pub const fn with_preserve_results(mut self, enabled: bool) -> Self {
        self.preserve_results = enabled;
        self
    }

    /// Parsed validity window.
    pub fn validity(&self) -> Result<ValidityWindow, ValidityParseError> {
        ValidityWindow::parse(
            &self.id,
            self.valid_from.as_deref(),
            self.valid_until.as_deref(),
        )
    }

    /// Whether the group is eligible on `today`.
    pub fn is_valid_on(&self, today: NaiveDate) -> Result<bool, ValidityParseError> {
        Ok(self.validity()?.contains(today))
    }

    /// Chains already-known subgroup verdicts, one per subgroup.
    ///
    /// The operator of subgroup `i ≥ 1` joins its verdict to the running
    /// result; subgroup 0's operator is ignored.
    pub fn combine(&self, verdicts: &[Verdict]) -> Verdict {
        fold_chain(
            self.subgroups
                .iter()
                .zip(verdicts)
                .map(|(subgroup, verdict)| (subgroup.inter_operator, *verdict)),
        )
    }

    /// Parenthesised expression mirroring the fold, e.g.
    /// `(((r1 and r2) or (r3)) and (r4 or r5))`.
    pub fn rule_logic(&self) -> String {
        let mut subgroups = self.subgroups.iter();
        let Some(first) = subgroups.next() else {
            return "()".to_owned();
        };
        subgroups.fold(first.rule_logic(), |logic, subgroup| {
            format!("({logic} {} {})", subgroup.inter_operator, subgroup.rule_logic())
        })
    }

    /// Number of rules over all subgroups.
    pub fn rule_count(&self) -> usize {
        self.subgroups.iter().map(|subgroup| subgroup.rules.len()).sum()
    }

    /// Evaluates every subgroup, chains the verdicts and runs the admitted
    /// actions.
    ///
    /// Dependency and validity gates are applied by the caller.
    pub fn run<T>(
        &self,
        target: &mut T,
        checks: &CheckRegistry,
        actions: &ActionRegistry,
        accessors: &Accessors<T>,
    ) -> GroupRun {
        let span = tracing::debug_span!("group", id = %self.id);
        let _entered = span.enter();

        let mut subgroups: Vec<SubGroupRun> = self
            .subgroups
            .iter()
            .map(|subgroup| subgroup.run(&*target, checks, accessors))
            .collect();
        let verdict = fold_chain(
            subgroups
                .iter()
                .map(|run| (run.inter_operator, run.verdict)),
        );
        let mut counters = RuleCounters::default();
        for run in &subgroups {
            counters.merge(run.counters);
        }

        let report = execute_actions(&self.actions, verdict, target, actions, accessors);

        if self.output_after_actions && report.executed > 0 {
            for (rule, run) in subgroups.iter_mut().flat_map(|subgroup| subgroup.rules.iter_mut()) {
                (run.operand1, run.operand2) = rule.operands(&*target, accessors);
            }
        }

        tracing::debug!(
            %verdict,
            rules = counters.run,
            failed = counters.failed,
            actions = report.executed,
            "group evaluated"
        );
        GroupRun {
            verdict,
            subgroups,
            counters,
            actions: report,
        }
    }
}
