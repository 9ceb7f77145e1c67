// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Value types shared by every stage of a checkpoint.
//!
//! A checkpoint moves a [`Metric`] and a resolved [`Scalar`] bound through a
//! [`Predicate`] and gets back a [`Verdict`]. The [`Category`] tag rides along
//! so the diagnostic can name the bottleneck class.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GuardError;

// ============================================================================
// SCALARS AND METRICS
// ============================================================================

/// A plain number: an exact integer or a float.
///
/// Integers stay exact all the way through comparison. Mixing an integer with
/// a float is compared exactly too (no lossy `as f64` on large integers).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
}

impl Scalar {
    /// Lossy view used for display and float fallbacks.
    pub fn as_f64(self) -> f64 {
        match self {
            Scalar::Int(v) => v as f64,
            Scalar::Float(v) => v,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
        }
    }
}

impl FromStr for Scalar {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(v) = trimmed.replace('_', "").parse::<i64>() {
            return Ok(Scalar::Int(v));
        }
        trimmed
            .parse::<f64>()
            .map(Scalar::Float)
            .map_err(|_| GuardError::InvalidNumber {
                input: s.to_string(),
            })
    }
}

macro_rules! scalar_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Scalar {
            fn from(v: $t) -> Self {
                Scalar::Int(i64::from(v))
            }
        })*
    };
}

macro_rules! scalar_from_wide {
    ($($t:ty),*) => {
        $(impl From<$t> for Scalar {
            fn from(v: $t) -> Self {
                Scalar::Int(i64::try_from(v).unwrap_or(i64::MAX))
            }
        })*
    };
}

scalar_from_signed!(i8, i16, i32, i64, u8, u16, u32);
scalar_from_wide!(u64, usize, u128);

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Float(f64::from(v))
    }
}

/// A value sampled from host state at a checkpoint.
///
/// `Ratio` keeps the two counts apart so that ratio-exceeds checks compare by
/// cross-multiplication. A ratio over an empty whole reads as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Ratio { part: u64, whole: u64 },
    Scalar(Scalar),
}

impl Metric {
    pub fn as_f64(self) -> f64 {
        match self {
            Metric::Scalar(s) => s.as_f64(),
            Metric::Ratio { whole: 0, .. } => 0.0,
            Metric::Ratio { part, whole } => part as f64 / whole as f64,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Scalar(s) => write!(f, "{}", s),
            Metric::Ratio { part, whole } => {
                write!(f, "{}/{} ({:.3})", part, whole, self.as_f64())
            }
        }
    }
}

impl From<Scalar> for Metric {
    fn from(v: Scalar) -> Self {
        Metric::Scalar(v)
    }
}

macro_rules! metric_from_number {
    ($($t:ty),*) => {
        $(impl From<$t> for Metric {
            fn from(v: $t) -> Self {
                Metric::Scalar(Scalar::from(v))
            }
        })*
    };
}

metric_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, u128, f32, f64);

// ============================================================================
// CATEGORIES
// ============================================================================

/// Performance-bottleneck class a violation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Too many like-valued items concentrated in one bucket or residue class.
    Density,
    /// An input or derived quantity left its safe numeric range.
    Magnitude,
    /// A loop or binary search ran more rounds than reasonable inputs need.
    IterationCount,
    /// A recursive call chain went deeper than expected.
    RecursionDepth,
    /// An exponential or factorial search space grew past a safe bound.
    CombinatorialBlowup,
    /// A structure's size or shape diverged from its expected distribution.
    StructuralImbalance,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Self::Density,
            Self::Magnitude,
            Self::IterationCount,
            Self::RecursionDepth,
            Self::CombinatorialBlowup,
            Self::StructuralImbalance,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Density => "density",
            Self::Magnitude => "magnitude",
            Self::IterationCount => "iteration-count",
            Self::RecursionDepth => "recursion-depth",
            Self::CombinatorialBlowup => "combinatorial-blowup",
            Self::StructuralImbalance => "structural-imbalance",
        }
    }

    /// Default bottleneck text used when an invariant carries no description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Density => "Performance bottleneck - too many items share one bucket",
            Self::Magnitude => "Performance bottleneck - value outside the safe numeric range",
            Self::IterationCount => "Performance bottleneck - loop ran too many iterations",
            Self::RecursionDepth => "Performance bottleneck - recursion depth too large",
            Self::CombinatorialBlowup => "Performance bottleneck - search space grew too large",
            Self::StructuralImbalance => {
                "Performance bottleneck - data structure shape is heavily skewed"
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Category::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| GuardError::UnknownCategory {
                name: s.to_string(),
            })
    }
}

// ============================================================================
// PREDICATES
// ============================================================================

/// Whether landing exactly on the bound counts as a violation.
///
/// Chosen per invariant. Nothing in the evaluator infers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// `>` / `<`: equality passes.
    Exclusive,
    /// `>=` / `<=`: equality fails.
    Inclusive,
}

/// The failure condition of an invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// Fails when `metric > bound` (or `>=` when inclusive).
    Exceeds { boundary: Boundary },
    /// Fails when `metric < bound` (or `<=` when inclusive).
    FallsBelow { boundary: Boundary },
    /// Fails when `2 * metric > bound`, i.e. the metric is a strict majority.
    MoreThanHalfOf,
}

impl Predicate {
    pub const GT: Predicate = Predicate::Exceeds {
        boundary: Boundary::Exclusive,
    };
    pub const GE: Predicate = Predicate::Exceeds {
        boundary: Boundary::Inclusive,
    };
    pub const LT: Predicate = Predicate::FallsBelow {
        boundary: Boundary::Exclusive,
    };
    pub const LE: Predicate = Predicate::FallsBelow {
        boundary: Boundary::Inclusive,
    };

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Exceeds {
                boundary: Boundary::Exclusive,
            } => ">",
            Self::Exceeds {
                boundary: Boundary::Inclusive,
            } => ">=",
            Self::FallsBelow {
                boundary: Boundary::Exclusive,
            } => "<",
            Self::FallsBelow {
                boundary: Boundary::Inclusive,
            } => "<=",
            Self::MoreThanHalfOf => "> half of",
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Predicate {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            ">" | "gt" => Ok(Self::GT),
            ">=" | "ge" => Ok(Self::GE),
            "<" | "lt" => Ok(Self::LT),
            "<=" | "le" => Ok(Self::LE),
            "majority" | "more-than-half" | "half" => Ok(Self::MoreThanHalfOf),
            _ => Err(GuardError::UnknownPredicate {
                symbol: s.to_string(),
            }),
        }
    }
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_fail(self) -> bool {
        self == Verdict::Fail
    }

    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }
}
