use smallvec::SmallVec;

use super::{ActionDefinition, ActionRegistry};
use crate::accessor::Accessors;
use crate::error::ActionInvocationError;
use crate::logic::Verdict;
use crate::value::Value;

/// One action that was eligible but did not complete.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionFailure {
    /// Id of the action.
    pub action_id: String,
    /// What went wrong.
    pub error: ActionInvocationError,
}

/// What happened to a group's actions in one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionReport {
    /// Actions that ran to completion (including the write-back).
    pub executed: usize,
    /// Actions whose condition did not admit the verdict.
    pub skipped: usize,
    /// Eligible actions that failed, in declaration order.
    pub failures: Vec<ActionFailure>,
}

impl ActionReport {
    /// Adds another report.
    pub fn merge(&mut self, other: &Self) {
        self.executed += other.executed;
        self.skipped += other.skipped;
        self.failures.extend(other.failures.iter().cloned());
    }
}

/// Runs every action admitted by `verdict`, in declaration order.
///
/// A failing action is logged and recorded; the remaining actions still run.
pub fn execute_actions<T>(
    actions: &[ActionDefinition],
    verdict: Verdict,
    target: &mut T,
    registry: &ActionRegistry,
    accessors: &Accessors<T>,
) -> ActionReport {
    let mut report = ActionReport::default();
    for action in actions {
        if !action.execute_if.admits(verdict) {
            tracing::trace!(action = %action.id, %verdict, "action not admitted");
            report.skipped += 1;
            continue;
        }
        match execute_one(action, target, registry, accessors) {
            Ok(()) => {
                tracing::debug!(action = %action.id, key = %action.key(), "action executed");
                report.executed += 1;
            }
            Err(error) => {
                tracing::warn!(action = %action.id, %error, "action failed");
                report.failures.push(ActionFailure {
                    action_id: action.id.clone(),
                    error,
                });
            }
        }
    }
    report
}

fn execute_one<T>(
    action: &ActionDefinition,
    target: &mut T,
    registry: &ActionRegistry,
    accessors: &Accessors<T>,
) -> Result<(), ActionInvocationError> {
    let key = action.key();
    let mut arguments: SmallVec<[Value; 4]> = SmallVec::new();
    for getter in &action.getters {
        let value = getter
            .read(target, accessors)
            .map_err(|source| ActionInvocationError::Read {
                action: key.clone(),
                source,
            })?;
        arguments.push(value);
    }
    arguments.extend(action.parameters.iter().map(|parameter| parameter.value.clone()));

    let result = registry.invoke(&key, &arguments)?;

    if let Some(setter) = &action.setter {
        setter
            .write(target, accessors, &result)
            .map_err(|source| ActionInvocationError::Write { action: key, source })?;
    }
    Ok(())
}
