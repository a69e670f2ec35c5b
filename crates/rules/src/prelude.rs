//! Convenience re-exports for rule-set authors and embedders.
//!
//! ```rust
//! use tessera_rules::prelude::*;
//! ```

pub use crate::accessor::Accessors;
pub use crate::action::{ActionDefinition, ActionFn, ActionObject, ActionRegistry, ExecuteIf};
pub use crate::check::{CheckFn, CheckRegistry};
pub use crate::config::{EngineConfig, OutputFilter};
pub use crate::engine::RuleEngine;
pub use crate::error::FunctionError;
pub use crate::evaluation::Evaluation;
pub use crate::extract::RuleObject;
pub use crate::group::RuleGroup;
pub use crate::logic::{LogicalOperator, Verdict};
pub use crate::record::Record;
pub use crate::result::{RuleExecutionCollection, RuleExecutionResult};
pub use crate::rule::{Parameter, Rule};
pub use crate::ruleset::RuleSet;
pub use crate::subgroup::RuleSubGroup;
pub use crate::value::{Value, ValueType};
