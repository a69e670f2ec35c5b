//! Rule sets: the unit a loader produces.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::group::RuleGroup;

/// Describes a field rule authors may refer to. Not used in evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceField {
    /// Technical name.
    pub name: String,
    /// Display name.
    #[serde(default)]
    pub name_descriptive: String,
    /// Free text.
    #[serde(default)]
    pub description: String,
    /// Declared type identifier.
    #[serde(default)]
    pub type_id: String,
}

/// Groups plus reference-field metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    /// Groups in evaluation order.
    #[serde(default)]
    pub groups: Vec<RuleGroup>,
    /// Field metadata.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_fields: Vec<ReferenceField>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a group.
    #[must_use]
    pub fn with_group(mut self, group: RuleGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Group with the given id.
    pub fn group(&self, id: &str) -> Option<&RuleGroup> {
        self.groups.iter().find(|group| group.id == id)
    }

    /// Number of rules over all groups.
    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(RuleGroup::rule_count).sum()
    }

    /// Rejects duplicate group ids and structurally invalid rules.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        let mut seen = HashSet::new();
        for group in &self.groups {
            if !seen.insert(group.id.as_str()) {
                return Err(DefinitionError::DuplicateGroup(group.id.clone()));
            }
            for rule in group.subgroups.iter().flat_map(|subgroup| &subgroup.rules) {
                rule.validate().map_err(|reason| DefinitionError::InvalidRule {
                    group: group.id.clone(),
                    rule: rule.id.clone(),
                    reason,
                })?;
            }
        }
        Ok(())
    }

    /// Drops every group whose id repeats an earlier group's id. Returns the
    /// ids of dropped groups.
    pub fn remove_duplicate_groups(&mut self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        self.groups.retain(|group| {
            let first = seen.insert(group.id.clone());
            if !first {
                duplicates.push(group.id.clone());
            }
            first
        });
        duplicates
    }

    /// Drops every group that is not valid on `today`, including groups
    /// whose window cannot be parsed. Returns the ids of dropped groups.
    pub fn retain_active(&mut self, today: NaiveDate) -> Vec<String> {
        let mut excluded = Vec::new();
        self.groups.retain(|group| {
            let active = match group.is_valid_on(today) {
                Ok(active) => active,
                Err(error) => {
                    tracing::warn!(%error, "excluding group with malformed validity window");
                    false
                }
            };
            if !active {
                excluded.push(group.id.clone());
            }
            active
        });
        excluded
    }
}
