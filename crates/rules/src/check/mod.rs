//! Named boolean checks.
//!
//! A check is a pure function from typed operands to `bool`. Rules refer to
//! checks by name; the [`CheckRegistry`] resolves the name and the runtime
//! argument types to one registered overload.
//!
//! ```rust
//! use tessera_rules::{CheckFn, CheckRegistry, Value};
//!
//! let mut registry = CheckRegistry::with_builtins();
//! registry.register("IsAdult", CheckFn::unary(|age: i64| age >= 18));
//!
//! assert_eq!(registry.invoke("IsAdult", &[Value::Integer(21)]), Ok(true));
//! assert_eq!(registry.invoke("Equals", &[Value::from("a"), Value::from("a")]), Ok(true));
//! ```

mod builtin;

use std::fmt;

use crate::dispatch::{FunctionTable, Overload, Unresolved, argument_types};
use crate::error::CheckInvocationError;
use crate::value::Value;

/// A typed check overload.
pub type CheckFn = Overload<bool>;

/// Registry of named, overloaded checks.
///
/// Read-only once the engine is built; share it through an `Arc`.
#[derive(Default)]
pub struct CheckRegistry {
    checks: FunctionTable<bool>,
}

impl CheckRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in checks.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Register an overload under `name`. An overload with the same
    /// signature replaces the previous one.
    pub fn register(&mut self, name: impl Into<String>, check: CheckFn) -> &mut Self {
        self.checks.insert(name.into(), check);
        self
    }

    /// Resolve `name` against the argument types and run the check.
    pub fn invoke(&self, name: &str, arguments: &[Value]) -> Result<bool, CheckInvocationError> {
        let overload = self
            .checks
            .resolve(name, arguments)
            .map_err(|reason| match reason {
                Unresolved::UnknownName => CheckInvocationError::UnknownCheck(name.to_owned()),
                Unresolved::NoMatchingSignature => CheckInvocationError::NoMatchingSignature {
                    check: name.to_owned(),
                    arguments: argument_types(arguments),
                },
            })?;
        overload
            .call(arguments)
            .map_err(|position| CheckInvocationError::ArgumentConversion {
                check: name.to_owned(),
                position,
            })
    }

    /// Check whether any overload is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.checks.contains(name)
    }

    /// Overloads registered under `name`.
    pub fn overloads(&self, name: &str) -> &[CheckFn] {
        self.checks.overloads(name)
    }

    /// Registered check names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.names()
    }

    /// Number of distinct check names.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns `true` if no checks are registered.
    pub fn is_empty(&self) -> bool {
        self.checks.len() == 0
    }
}

impl fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("checks", &self.checks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueType;

    #[test]
    fn empty_registry() {
        let registry = CheckRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn unknown_check() {
        let registry = CheckRegistry::new();
        assert_eq!(
            registry.invoke("Nope", &[]),
            Err(CheckInvocationError::UnknownCheck("Nope".into()))
        );
    }

    #[test]
    fn no_matching_signature_reports_argument_types() {
        let registry = CheckRegistry::with_builtins();
        let error = registry
            .invoke("IsEven", &[Value::from("four")])
            .unwrap_err();
        assert_eq!(
            error,
            CheckInvocationError::NoMatchingSignature {
                check: "IsEven".into(),
                arguments: vec![Some(ValueType::String)],
            }
        );
    }

    #[test]
    fn custom_overloads_coexist() {
        let mut registry = CheckRegistry::new();
        registry
            .register("Positive", CheckFn::unary(|v: i64| v > 0))
            .register("Positive", CheckFn::unary(|v: f64| v > 0.0));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.overloads("Positive").len(), 2);
        assert_eq!(registry.invoke("Positive", &[Value::Integer(3)]), Ok(true));
        assert_eq!(registry.invoke("Positive", &[Value::Float(-0.5)]), Ok(false));
    }

    #[test]
    fn debug_lists_names() {
        let mut registry = CheckRegistry::new();
        registry.register("A", CheckFn::unary(|v: bool| v));
        let debug = format!("{registry:?}");
        assert!(debug.contains("CheckRegistry"));
        assert!(debug.contains("\"A\""));
    }
}
