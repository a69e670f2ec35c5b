//! Checks available in every [`CheckRegistry::with_builtins`] registry.
//!
//! Integer operands resolve to the `long` overloads and floats to the
//! `double` ones, so each check only needs one overload per family.

use chrono::NaiveDate;
use regex::Regex;

use super::{CheckFn, CheckRegistry};

pub(super) fn register_all(registry: &mut CheckRegistry) {
    register_equality(registry);
    register_ordering(registry);
    register_numeric(registry);
    register_text(registry);
}

fn register_equality(registry: &mut CheckRegistry) {
    for (name, expected) in [("Equals", true), ("NotEquals", false)] {
        registry
            .register(name, CheckFn::binary(move |a: String, b: String| (a == b) == expected))
            .register(
                name,
                CheckFn::ternary(move |a: String, b: String, ignore_case: bool| {
                    let equal = if ignore_case {
                        a.to_lowercase() == b.to_lowercase()
                    } else {
                        a == b
                    };
                    equal == expected
                }),
            )
            .register(name, CheckFn::binary(move |a: i64, b: i64| (a == b) == expected))
            .register(
                name,
                CheckFn::binary(move |a: f64, b: f64| a.total_cmp(&b).is_eq() == expected),
            )
            .register(name, CheckFn::binary(move |a: bool, b: bool| (a == b) == expected))
            .register(
                name,
                CheckFn::binary(move |a: NaiveDate, b: NaiveDate| (a == b) == expected),
            );
    }
}

fn register_ordering(registry: &mut CheckRegistry) {
    registry
        .register("GreaterThan", CheckFn::binary(|a: i64, b: i64| a > b))
        .register("GreaterThan", CheckFn::binary(|a: f64, b: f64| a > b))
        .register("GreaterThan", CheckFn::binary(|a: NaiveDate, b: NaiveDate| a > b))
        .register("GreaterThan", CheckFn::binary(|a: String, b: String| a > b))
        .register("LessThan", CheckFn::binary(|a: i64, b: i64| a < b))
        .register("LessThan", CheckFn::binary(|a: f64, b: f64| a < b))
        .register("LessThan", CheckFn::binary(|a: NaiveDate, b: NaiveDate| a < b))
        .register("LessThan", CheckFn::binary(|a: String, b: String| a < b))
        // Inclusive on both ends.
        .register(
            "IsBetween",
            CheckFn::ternary(|v: i64, low: i64, high: i64| (low..=high).contains(&v)),
        )
        .register(
            "IsBetween",
            CheckFn::ternary(|v: f64, low: f64, high: f64| low <= v && v <= high),
        )
        .register(
            "IsBetween",
            CheckFn::ternary(|v: NaiveDate, low: NaiveDate, high: NaiveDate| {
                (low..=high).contains(&v)
            }),
        );
}

fn register_numeric(registry: &mut CheckRegistry) {
    registry
        .register("IsEven", CheckFn::unary(|v: i64| v % 2 == 0))
        .register("IsOdd", CheckFn::unary(|v: i64| v % 2 != 0));
}

fn register_text(registry: &mut CheckRegistry) {
    registry
        .register("StartsWith", CheckFn::binary(|v: String, p: String| v.starts_with(&p)))
        .register(
            "StartsWith",
            CheckFn::ternary(|v: String, p: String, ignore_case: bool| {
                fold(&v, ignore_case).starts_with(&fold(&p, ignore_case))
            }),
        )
        .register("EndsWith", CheckFn::binary(|v: String, s: String| v.ends_with(&s)))
        .register(
            "EndsWith",
            CheckFn::ternary(|v: String, s: String, ignore_case: bool| {
                fold(&v, ignore_case).ends_with(&fold(&s, ignore_case))
            }),
        )
        .register("NotEndsWith", CheckFn::binary(|v: String, s: String| !v.ends_with(&s)))
        .register(
            "NotEndsWith",
            CheckFn::ternary(|v: String, s: String, ignore_case: bool| {
                !fold(&v, ignore_case).ends_with(&fold(&s, ignore_case))
            }),
        )
        .register("Contains", CheckFn::binary(|v: String, n: String| v.contains(&n)))
        .register(
            "Contains",
            CheckFn::ternary(|v: String, n: String, ignore_case: bool| {
                fold(&v, ignore_case).contains(&fold(&n, ignore_case))
            }),
        )
        .register("IsEmpty", CheckFn::unary(|v: String| v.trim().is_empty()))
        .register("IsNotEmpty", CheckFn::unary(|v: String| !v.trim().is_empty()))
        .register(
            "LengthEquals",
            CheckFn::binary(|v: String, length: i64| {
                i64::try_from(v.chars().count()).is_ok_and(|count| count == length)
            }),
        )
        // An invalid pattern never matches.
        .register(
            "MatchesRegex",
            CheckFn::binary(|v: String, pattern: String| {
                Regex::new(&pattern).is_ok_and(|regex| regex.is_match(&v))
            }),
        );
}

fn fold(text: &str, ignore_case: bool) -> String {
    if ignore_case {
        text.to_lowercase()
    } else {
        text.to_owned()
    }
}
