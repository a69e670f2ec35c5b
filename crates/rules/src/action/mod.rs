//! Follow-on actions.
//!
//! Actions are side-effecting functions registered under a
//! `Namespace.method` key. A group runs its eligible actions once its verdict
//! is known; each action reads operands through getters, calls the function
//! and optionally writes the returned value back through a setter.

mod definition;
mod executor;
mod string;

use std::fmt;

pub use definition::{ActionDefinition, ActionObject, ExecuteIf};
pub use executor::{ActionFailure, ActionReport, execute_actions};

use crate::dispatch::{FunctionTable, Overload, Unresolved, argument_types};
use crate::error::{ActionInvocationError, FunctionError};
use crate::value::Value;

/// A typed action overload returning the value to write back.
pub type ActionFn = Overload<Result<Value, FunctionError>>;

/// Registry of named, overloaded actions.
///
/// Read-only once the engine is built; share it through an `Arc`.
#[derive(Default)]
pub struct ActionRegistry {
    actions: FunctionTable<Result<Value, FunctionError>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the `StringAction.*` functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        string::register_all(&mut registry);
        registry
    }

    /// Register an overload under `key`. An overload with the same
    /// signature replaces the previous one.
    pub fn register(&mut self, key: impl Into<String>, action: ActionFn) -> &mut Self {
        self.actions.insert(key.into(), action);
        self
    }

    /// Resolve `key` against the argument types and run the action.
    pub fn invoke(&self, key: &str, arguments: &[Value]) -> Result<Value, ActionInvocationError> {
        let overload = self
            .actions
            .resolve(key, arguments)
            .map_err(|reason| match reason {
                Unresolved::UnknownName => ActionInvocationError::UnknownAction(key.to_owned()),
                Unresolved::NoMatchingSignature => ActionInvocationError::NoMatchingSignature {
                    action: key.to_owned(),
                    arguments: argument_types(arguments),
                },
            })?;
        overload
            .call(arguments)
            .map_err(|position| ActionInvocationError::ArgumentConversion {
                action: key.to_owned(),
                position,
            })?
            .map_err(|source| ActionInvocationError::Failed {
                action: key.to_owned(),
                source,
            })
    }

    /// Check whether any overload is registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.actions.contains(key)
    }

    /// Registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.actions.names()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.actions.len() == 0
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.actions)
            .finish()
    }
}
