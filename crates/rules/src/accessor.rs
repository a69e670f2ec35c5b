//! Named getters and setters over a target type.
//!
//! Rule and action definitions never touch a target object directly. They
//! name an accessor (`getFieldValue`, `getAge`, ...) and optionally pass it
//! one argument, typically a field selector. [`Accessors<T>`] maps those
//! names to closures registered for `T`.
//!
//! ```rust
//! use tessera_rules::{Accessors, Value, ValueType};
//!
//! struct Person { age: i32, name: String }
//!
//! let accessors = Accessors::<Person>::new()
//!     .getter("getAge", |p| Value::Integer(p.age))
//!     .setter("setName", |p, value| {
//!         p.name = value.to_string();
//!         Ok(())
//!     });
//!
//! let mut person = Person { age: 30, name: "Ada".into() };
//! assert_eq!(accessors.get(&person, "getAge", None).unwrap(), Value::Integer(30));
//!
//! accessors.set(&mut person, "setName", None, Value::from("Grace")).unwrap();
//! assert_eq!(person.name, "Grace");
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::error::{ExtractionError, FunctionError};
use crate::value::{Value, ValueType};

type GetFn<T> = Box<dyn Fn(&T, Option<&Value>) -> Result<Value, FunctionError> + Send + Sync>;
type SetFn<T> =
    Box<dyn Fn(&mut T, Option<&Value>, Value) -> Result<(), FunctionError> + Send + Sync>;

struct Getter<T> {
    argument: Option<ValueType>,
    call: GetFn<T>,
}

struct Setter<T> {
    argument: Option<ValueType>,
    call: SetFn<T>,
}

/// Accessor table for target type `T`.
pub struct Accessors<T> {
    getters: HashMap<String, Getter<T>>,
    setters: HashMap<String, Setter<T>>,
}

impl<T> Default for Accessors<T> {
    fn default() -> Self {
        Self {
            getters: HashMap::new(),
            setters: HashMap::new(),
        }
    }
}

impl<T> Accessors<T> {
    /// Create an empty accessor table.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    /// Register an infallible zero-argument getter.
    #[must_use]
    pub fn getter<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.try_getter(name, move |target| Ok(f(target)))
    }

    /// Register a fallible zero-argument getter.
    #[must_use]
    pub fn try_getter<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        self.getters.insert(
            name.into(),
            Getter {
                argument: None,
                call: Box::new(move |target, _| f(target)),
            },
        );
        self
    }

    /// Register a getter taking one argument of type `argument`.
    #[must_use]
    pub fn getter_with<F>(mut self, name: impl Into<String>, argument: ValueType, f: F) -> Self
    where
        F: Fn(&T, &Value) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        self.getters.insert(
            name.into(),
            Getter {
                argument: Some(argument),
                call: Box::new(move |target, arg| match arg {
                    Some(arg) => f(target, arg),
                    None => Err(FunctionError::new("missing argument")),
                }),
            },
        );
        self
    }

    /// Register a zero-argument setter.
    #[must_use]
    pub fn setter<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut T, Value) -> Result<(), FunctionError> + Send + Sync + 'static,
    {
        self.setters.insert(
            name.into(),
            Setter {
                argument: None,
                call: Box::new(move |target, _, value| f(target, value)),
            },
        );
        self
    }

    /// Register a setter taking one selector argument of type `argument`
    /// before the value to write.
    #[must_use]
    pub fn setter_with<F>(mut self, name: impl Into<String>, argument: ValueType, f: F) -> Self
    where
        F: Fn(&mut T, &Value, Value) -> Result<(), FunctionError> + Send + Sync + 'static,
    {
        self.setters.insert(
            name.into(),
            Setter {
                argument: Some(argument),
                call: Box::new(move |target, arg, value| match arg {
                    Some(arg) => f(target, arg, value),
                    None => Err(FunctionError::new("missing argument")),
                }),
            },
        );
        self
    }

    // ========================================================================
    // ACCESS
    // ========================================================================

    /// Read through the getter `name`.
    pub fn get(
        &self,
        target: &T,
        name: &str,
        argument: Option<&Value>,
    ) -> Result<Value, ExtractionError> {
        let getter = self
            .getters
            .get(name)
            .ok_or_else(|| ExtractionError::UnknownAccessor(name.to_owned()))?;
        let argument = accept_argument(name, getter.argument, argument)?;
        (getter.call)(target, argument.as_ref()).map_err(|source| ExtractionError::Accessor {
            accessor: name.to_owned(),
            source,
        })
    }

    /// Write `value` through the setter `name`.
    pub fn set(
        &self,
        target: &mut T,
        name: &str,
        argument: Option<&Value>,
        value: Value,
    ) -> Result<(), ExtractionError> {
        let setter = self
            .setters
            .get(name)
            .ok_or_else(|| ExtractionError::UnknownAccessor(name.to_owned()))?;
        let argument = accept_argument(name, setter.argument, argument)?;
        (setter.call)(target, argument.as_ref(), value).map_err(|source| ExtractionError::Accessor {
            accessor: name.to_owned(),
            source,
        })
    }

    /// Check whether a getter named `name` is registered.
    pub fn has_getter(&self, name: &str) -> bool {
        self.getters.contains_key(name)
    }

    /// Check whether a setter named `name` is registered.
    pub fn has_setter(&self, name: &str) -> bool {
        self.setters.contains_key(name)
    }

    /// Argument type the getter `name` declares, if it is registered.
    pub fn getter_argument(&self, name: &str) -> Option<Option<ValueType>> {
        self.getters.get(name).map(|getter| getter.argument)
    }
}

/// Matches the supplied argument against the declared one. Numeric
/// arguments widen; nulls only satisfy a zero-argument accessor.
fn accept_argument(
    accessor: &str,
    declared: Option<ValueType>,
    supplied: Option<&Value>,
) -> Result<Option<Value>, ExtractionError> {
    let supplied = supplied.filter(|value| !value.is_null());
    match (declared, supplied) {
        (None, None) => Ok(None),
        (Some(kind), Some(value)) => value.widen(kind).map(Some).ok_or_else(|| {
            ExtractionError::ArgumentMismatch {
                accessor: accessor.to_owned(),
                expected: declared,
                actual: value.value_type(),
            }
        }),
        (_, supplied) => Err(ExtractionError::ArgumentMismatch {
            accessor: accessor.to_owned(),
            expected: declared,
            actual: supplied.and_then(Value::value_type),
        }),
    }
}

impl<T> fmt::Debug for Accessors<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut getters: Vec<_> = self.getters.keys().collect();
        let mut setters: Vec<_> = self.setters.keys().collect();
        getters.sort();
        setters.sort();
        f.debug_struct("Accessors")
            .field("getters", &getters)
            .field("setters", &setters)
            .finish()
    }
}
