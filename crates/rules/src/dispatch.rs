//! Overloaded, name-addressed function tables.
//!
//! Checks and actions are registered as typed closures under a name. One
//! name may carry several overloads that differ in arity or parameter
//! types; [`FunctionTable::resolve`] picks the overload whose signature
//! accepts the supplied arguments with the fewest numeric widenings.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use smallvec::{SmallVec, smallvec};

use crate::value::{Value, ValueType};

/// Parameter types of one overload.
pub type Signature = SmallVec<[ValueType; 4]>;

/// Argument list handed to an overload.
pub(crate) type Arguments = SmallVec<[Value; 4]>;

// ============================================================================
// PARAMETER CONVERSION
// ============================================================================

/// A Rust type that can be used as a check or action parameter.
pub trait FromValue: Sized + 'static {
    /// The operand kind this parameter accepts.
    const TYPE: ValueType;

    /// Extracts the parameter from a value already widened to [`Self::TYPE`].
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ($rust:ty, $kind:ident, $variant:ident) => {
        impl FromValue for $rust {
            const TYPE: ValueType = ValueType::$kind;

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(inner) => Some(inner.clone()),
                    _ => None,
                }
            }
        }
    };
}

impl_from_value!(String, String, String);
impl_from_value!(i32, Integer, Integer);
impl_from_value!(i64, Long, Long);
impl_from_value!(f32, Float, Float);
impl_from_value!(f64, Double, Double);
impl_from_value!(bool, Boolean, Boolean);
impl_from_value!(NaiveDate, Date, Date);

// ============================================================================
// OVERLOAD
// ============================================================================

type Callable<R> = Box<dyn Fn(&[Value]) -> Option<R> + Send + Sync>;

/// One typed implementation of a named function.
pub struct Overload<R> {
    signature: Signature,
    call: Callable<R>,
}

impl<R: 'static> Overload<R> {
    /// One-parameter overload.
    pub fn unary<A>(f: impl Fn(A) -> R + Send + Sync + 'static) -> Self
    where
        A: FromValue,
    {
        Self {
            signature: smallvec![A::TYPE],
            call: Box::new(move |args: &[Value]| Some(f(A::from_value(args.first()?)?))),
        }
    }

    /// Two-parameter overload.
    pub fn binary<A, B>(f: impl Fn(A, B) -> R + Send + Sync + 'static) -> Self
    where
        A: FromValue,
        B: FromValue,
    {
        Self {
            signature: smallvec![A::TYPE, B::TYPE],
            call: Box::new(move |args: &[Value]| {
                Some(f(A::from_value(args.first()?)?, B::from_value(args.get(1)?)?))
            }),
        }
    }

    /// Three-parameter overload.
    pub fn ternary<A, B, C>(f: impl Fn(A, B, C) -> R + Send + Sync + 'static) -> Self
    where
        A: FromValue,
        B: FromValue,
        C: FromValue,
    {
        Self {
            signature: smallvec![A::TYPE, B::TYPE, C::TYPE],
            call: Box::new(move |args: &[Value]| {
                Some(f(
                    A::from_value(args.first()?)?,
                    B::from_value(args.get(1)?)?,
                    C::from_value(args.get(2)?)?,
                ))
            }),
        }
    }
}

impl<R> Overload<R> {
    /// The parameter types.
    pub fn signature(&self) -> &[ValueType] {
        &self.signature
    }

    /// Total widening distance needed to accept `args`, or `None` if the
    /// overload cannot accept them. Nulls match no parameter.
    fn distance(&self, args: &[Value]) -> Option<u32> {
        if args.len() != self.signature.len() {
            return None;
        }
        args.iter()
            .zip(&self.signature)
            .map(|(arg, param)| arg.value_type()?.widening_distance(*param))
            .sum()
    }

    /// Widens `args` to the signature and calls the implementation.
    ///
    /// On a conversion failure returns the position of the rejected
    /// argument.
    pub(crate) fn call(&self, args: &[Value]) -> Result<R, usize> {
        let mut widened = Arguments::new();
        for (position, (arg, param)) in args.iter().zip(&self.signature).enumerate() {
            widened.push(arg.widen(*param).ok_or(position)?);
        }
        (self.call)(widened.as_slice()).ok_or(0)
    }
}

impl<R> fmt::Debug for Overload<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overload")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// Why a name could not be resolved to an overload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unresolved {
    UnknownName,
    NoMatchingSignature,
}

/// Named overload sets.
pub(crate) struct FunctionTable<R> {
    entries: HashMap<String, Vec<Overload<R>>>,
}

impl<R> Default for FunctionTable<R> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<R> FunctionTable<R> {
    /// Adds an overload. Overloads with an identical signature replace the
    /// earlier registration.
    pub(crate) fn insert(&mut self, name: String, overload: Overload<R>) {
        let overloads = self.entries.entry(name).or_default();
        match overloads
            .iter_mut()
            .find(|existing| existing.signature == overload.signature)
        {
            Some(existing) => *existing = overload,
            None => overloads.push(overload),
        }
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub(crate) fn overloads(&self, name: &str) -> &[Overload<R>] {
        self.entries.get(name).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Selects the best overload for `args`: lowest total widening
    /// distance, earliest registration on ties.
    pub(crate) fn resolve(&self, name: &str, args: &[Value]) -> Result<&Overload<R>, Unresolved> {
        let overloads = self.entries.get(name).ok_or(Unresolved::UnknownName)?;
        overloads
            .iter()
            .filter_map(|overload| overload.distance(args).map(|cost| (cost, overload)))
            .min_by_key(|(cost, _)| *cost)
            .map(|(_, overload)| overload)
            .ok_or(Unresolved::NoMatchingSignature)
    }
}

impl<R> fmt::Debug for FunctionTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("FunctionTable")
            .field("count", &self.entries.len())
            .field("names", &names)
            .finish()
    }
}

/// Argument types for error reporting.
pub(crate) fn argument_types(args: &[Value]) -> Vec<Option<ValueType>> {
    args.iter().map(Value::value_type).collect()
}
