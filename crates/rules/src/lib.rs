//! # Tessera Rules
//!
//! Declarative validation engine. Business rules are organised in groups of
//! subgroups of rules; each rule applies a named check to operands read from
//! a target object, the boolean outcomes are combined with `and`/`or`, and
//! follow-on actions may rewrite the object depending on the result.
//!
//! ## Core Types
//!
//! - [`RuleSet`] — groups plus reference-field metadata, as loaded
//! - [`RuleGroup`] / [`RuleSubGroup`] / [`Rule`] — the immutable rule tree
//! - [`Accessors`] — named getters and setters for a target type
//! - [`CheckRegistry`] / [`ActionRegistry`] — named, overloaded functions
//! - [`RuleEngine`] — evaluates a rule set against objects
//! - [`Evaluation`] — everything one pass over one object produced
//! - [`RuleExecutionResult`] — one rule's verdict, operands and message
//! - [`RuleExecutionCollection`] — results aggregated over many objects
//!
//! ## Evaluation order
//!
//! ```text
//! Rule ──(extract, check)──▶ verdict
//!   └─▶ Subgroup fold (intra operator)
//!         └─▶ Group fold (inter operator of each following subgroup)
//!               └─▶ Actions admitted by the verdict
//! ```
//!
//! Nothing in a pass aborts it: unreadable operands, unknown checks and
//! failing actions are logged and turn into failed rules or skipped
//! actions.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Named getters and setters over a target type.
pub mod accessor;
/// Follow-on actions and the built-in string actions.
pub mod action;
/// Named boolean checks and the built-in check library.
pub mod check;
/// Engine configuration.
pub mod config;
/// JSON rule-set loading.
pub mod definition;
/// Overload resolution shared by checks and actions.
pub mod dispatch;
/// Engine orchestration.
pub mod engine;
/// Error types.
pub mod error;
/// Per-pass evaluation state.
pub mod evaluation;
/// Operand descriptors and extraction.
pub mod extract;
/// Groups and the group combinator.
pub mod group;
/// Verdicts and logical operators.
pub mod logic;
/// Message rendering.
pub mod message;
/// Common imports.
pub mod prelude;
/// Field-map target type.
pub mod record;
/// Results and result collections.
pub mod result;
/// Rules.
pub mod rule;
/// Rule sets.
pub mod ruleset;
/// Subgroups and the subgroup combinator.
pub mod subgroup;
/// Validity windows.
pub mod validity;
/// Typed operand values.
pub mod value;

pub use accessor::Accessors;
pub use action::{
    ActionDefinition, ActionFailure, ActionFn, ActionObject, ActionRegistry, ActionReport,
    ExecuteIf, execute_actions,
};
pub use check::{CheckFn, CheckRegistry};
pub use config::{EngineConfig, OutputFilter};
pub use dispatch::{FromValue, Overload};
pub use engine::{RuleEngine, RuleEngineBuilder};
pub use error::{
    ActionInvocationError, CheckInvocationError, DefinitionError, ExtractionError, FunctionError,
    RuleEvaluationError, TemplateError, ValidityParseError, ValueError,
};
pub use evaluation::{Evaluation, GroupOutcome, GroupStatus};
pub use extract::{Operand, RuleObject, ValueSource, extract};
pub use group::{GroupDependency, GroupRun, RuleGroup};
pub use logic::{LogicalOperator, Verdict, fold_chain};
pub use message::{UNDEFINED_MESSAGE, render};
pub use record::Record;
pub use result::{ExecutionCounters, RuleExecutionCollection, RuleExecutionResult};
pub use rule::{Parameter, Rule, RuleMessage, RuleRun};
pub use ruleset::{ReferenceField, RuleSet};
pub use subgroup::{RuleCounters, RuleSubGroup, SubGroupRun};
pub use validity::ValidityWindow;
pub use value::{DATE_FORMAT, Value, ValueType};
