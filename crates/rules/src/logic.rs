//! Verdicts and the logical operators that chain them.
//!
//! Both combinators (rules inside a subgroup, subgroups inside a group) are
//! the same left fold: start with the first verdict and combine each
//! following verdict into the running result with the operator attached to
//! the element being folded in. The first element's operator is never
//! consulted.
//!
//! ```text
//! v0 ──┐
//!      ├─ op1 ── r1 ──┐
//! v1 ──┘              ├─ op2 ── r2
//!                v2 ──┘
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of a rule, subgroup or group.
///
/// The numeric encoding (`Passed = 0`, `Failed = 1`) is what reports and
/// older tooling exchange; use [`Verdict::code`] to obtain it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Verdict {
    /// The check held.
    Passed = 0,
    /// The check did not hold, or could not be evaluated.
    Failed = 1,
}

impl Verdict {
    /// Maps a check's boolean outcome to a verdict.
    pub const fn from_passed(passed: bool) -> Self {
        if passed { Self::Passed } else { Self::Failed }
    }

    /// Numeric encoding: `0` passed, `1` failed.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Verdict::code`].
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Passed),
            1 => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns `true` for [`Verdict::Passed`].
    pub const fn is_passed(self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns `true` for [`Verdict::Failed`].
    pub const fn is_failed(self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Combines `self` (the running result) with `next` using `operator`.
    pub const fn combine(self, next: Verdict, operator: LogicalOperator) -> Self {
        operator.apply(self, next)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
        })
    }
}

/// Logical connective between two verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    /// Passed only if both sides passed.
    #[default]
    And,
    /// Passed if either side passed.
    Or,
}

impl LogicalOperator {
    /// Applies the operator.
    pub const fn apply(self, left: Verdict, right: Verdict) -> Verdict {
        match self {
            Self::And => Verdict::from_passed(left.is_passed() && right.is_passed()),
            Self::Or => Verdict::from_passed(left.is_passed() || right.is_passed()),
        }
    }

    /// Lowercase keyword used in rule-logic strings.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for LogicalOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            other => Err(format!("unknown logical operator `{other}`")),
        }
    }
}

/// Left-folds a chain of `(operator, verdict)` pairs.
///
/// The operator of the first pair is ignored. An empty chain is vacuously
/// [`Verdict::Passed`].
pub fn fold_chain<I>(chain: I) -> Verdict
where
    I: IntoIterator<Item = (LogicalOperator, Verdict)>,
{
    let mut chain = chain.into_iter();
    let Some((_, first)) = chain.next() else {
        return Verdict::Passed;
    };
    chain.fold(first, |running, (operator, next)| {
        running.combine(next, operator)
    })
}
