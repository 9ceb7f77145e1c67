// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Reference threshold table: one checkpoint per bottleneck category.
//!
//! The numbers are configuration, not derived truths. They are the values the
//! bundled demo hosts run against, and a starting point for a host writing its
//! own table. Boundary choice is recorded per entry and is deliberately not
//! uniform.
//!
//! | Checkpoint             | Category              | Fails when                      |
//! |------------------------|-----------------------|---------------------------------|
//! | `bucket-density`       | density               | fullest bucket `>= max(n/10, 2)`|
//! | `value-magnitude`      | magnitude             | largest `|value| > 1e9`         |
//! | `close-to-limit-ratio` | magnitude             | near-limit share `> 0.8`        |
//! | `search-iterations`    | iteration-count       | rounds `> 2 * log2(n) + 8`      |
//! | `recursion-depth`      | recursion-depth       | depth `> 50`                    |
//! | `subset-blowup`        | combinatorial-blowup  | subsets `>= 1 << 20`            |
//! | `dominant-value`       | structural-imbalance  | one value holds `> max(n, 2) / 2`|

use crate::invariant::Invariant;
use crate::registry::ThresholdTable;
use crate::threshold::{Formula, Threshold};
use crate::types::{Category, Predicate};

pub const BUCKET_DENSITY: &str = "bucket-density";
pub const VALUE_MAGNITUDE: &str = "value-magnitude";
pub const CLOSE_TO_LIMIT_RATIO: &str = "close-to-limit-ratio";
pub const SEARCH_ITERATIONS: &str = "search-iterations";
pub const RECURSION_DEPTH: &str = "recursion-depth";
pub const SUBSET_BLOWUP: &str = "subset-blowup";
pub const DOMINANT_VALUE: &str = "dominant-value";

/// Bound used by the `recursion-depth` checkpoint.
pub const MAX_RECURSION_DEPTH: i64 = 50;

/// Bound used by the `subset-blowup` checkpoint.
pub const MAX_SUBSETS: i64 = 1 << 20;

fn param(name: &str) -> Box<Formula> {
    Box::new(Formula::Param(name.to_string()))
}

fn lit(v: i64) -> Box<Formula> {
    Box::new(Formula::Lit(v))
}

pub fn reference_table() -> ThresholdTable {
    ThresholdTable::builder()
        .entry(
            Invariant::new(
                BUCKET_DENSITY,
                Category::Density,
                Predicate::GE,
                Threshold::derived(Formula::Div(param("n"), lit(10))).with_floor(2),
            )
            .describe("Performance bottleneck - too many values share one residue class"),
        )
        .entry(
            Invariant::new(
                VALUE_MAGNITUDE,
                Category::Magnitude,
                Predicate::GT,
                Threshold::constant(1_000_000_000),
            )
            .describe("Performance bottleneck - input value too large for the fast path"),
        )
        .entry(
            Invariant::new(
                CLOSE_TO_LIMIT_RATIO,
                Category::Magnitude,
                Predicate::GT,
                Threshold::constant(0.8),
            )
            .describe("Performance bottleneck - most elements sit close to the limit"),
        )
        .entry(
            Invariant::new(
                SEARCH_ITERATIONS,
                Category::IterationCount,
                Predicate::GT,
                Threshold::derived(Formula::Add(
                    Box::new(Formula::Mul(lit(2), Box::new(Formula::Log2(param("n"))))),
                    lit(8),
                )),
            )
            .describe("Performance bottleneck - binary search ran too many rounds"),
        )
        .entry(
            Invariant::new(
                RECURSION_DEPTH,
                Category::RecursionDepth,
                Predicate::GT,
                Threshold::constant(MAX_RECURSION_DEPTH),
            )
            .describe("Performance bottleneck - recursion depth too large"),
        )
        .entry(
            Invariant::new(
                SUBSET_BLOWUP,
                Category::CombinatorialBlowup,
                Predicate::GE,
                Threshold::constant(MAX_SUBSETS),
            )
            .describe("Performance bottleneck - too many subsets to enumerate"),
        )
        .entry(
            Invariant::new(
                DOMINANT_VALUE,
                Category::StructuralImbalance,
                Predicate::MoreThanHalfOf,
                Threshold::derived(Formula::Param("n".to_string())).with_floor(2),
            )
            .describe("Performance bottleneck - a single value dominates the input"),
        )
        .build()
}
