// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Pass/fail decision for one invariant.
//!
//! Everything here is straight-line code: no loops, no recursion, no heap.
//! The evaluator is total over its numeric domain. Zero, negative and extreme
//! values all get a verdict, and so does NaN.
//!
//! # Comparison rules
//!
//! | Metric        | Bound   | How it is compared                          |
//! |---------------|---------|---------------------------------------------|
//! | `Int`         | `Int`   | exact                                       |
//! | `Int`/`Float` | mixed   | exact (float split into floor + fraction)   |
//! | `Float`       | `Float` | IEEE `partial_cmp`                          |
//! | `Ratio`       | `Int`   | cross-multiplied in `i128`                  |
//! | `Ratio`       | `Float` | `part / whole` as `f64`                     |
//!
//! A comparison that has no ordering (NaN on either side) counts as a
//! violation. A guard that cannot read its metric has no evidence the run is
//! safe.

use std::cmp::Ordering;

use crate::types::{Boundary, Metric, Predicate, Scalar, Verdict};

/// 2^63 as an `f64`, the first float above every `i64`.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// Apply `predicate` to `metric` and `bound`.
#[inline]
pub fn evaluate(metric: Metric, predicate: Predicate, bound: Scalar) -> Verdict {
    let triggered = match predicate {
        Predicate::Exceeds { boundary } => match compare(metric, bound) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => boundary == Boundary::Inclusive,
            Some(Ordering::Less) => false,
            None => true,
        },
        Predicate::FallsBelow { boundary } => match compare(metric, bound) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => boundary == Boundary::Inclusive,
            Some(Ordering::Greater) => false,
            None => true,
        },
        Predicate::MoreThanHalfOf => more_than_half(metric, bound),
    };

    if triggered {
        Verdict::Fail
    } else {
        Verdict::Pass
    }
}

/// Order `metric` against `bound`. `None` means NaN was involved.
pub fn compare(metric: Metric, bound: Scalar) -> Option<Ordering> {
    match metric {
        Metric::Scalar(value) => compare_scalars(value, bound),
        Metric::Ratio { whole: 0, .. } => compare_scalars(Scalar::Int(0), bound),
        Metric::Ratio { part, whole } => match bound {
            Scalar::Int(b) => {
                let lhs = i128::from(part);
                let rhs = i128::from(b) * i128::from(whole);
                Some(lhs.cmp(&rhs))
            }
            Scalar::Float(b) => (part as f64 / whole as f64).partial_cmp(&b),
        },
    }
}

/// Order two scalars, exactly whenever an integer is involved.
pub fn compare_scalars(a: Scalar, b: Scalar) -> Option<Ordering> {
    match (a, b) {
        (Scalar::Int(x), Scalar::Int(y)) => Some(x.cmp(&y)),
        (Scalar::Float(x), Scalar::Float(y)) => x.partial_cmp(&y),
        (Scalar::Int(x), Scalar::Float(y)) => cmp_int_float(x, y),
        (Scalar::Float(x), Scalar::Int(y)) => cmp_int_float(y, x).map(Ordering::reverse),
    }
}

fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f >= TWO_POW_63 {
        return Some(Ordering::Less);
    }
    if f < -TWO_POW_63 {
        return Some(Ordering::Greater);
    }

    // f is now finite and floor(f) fits in i64
    let floor = f.floor();
    match i.cmp(&(floor as i64)) {
        Ordering::Equal if f > floor => Some(Ordering::Less),
        ord => Some(ord),
    }
}

fn more_than_half(metric: Metric, total: Scalar) -> bool {
    match (metric, total) {
        (Metric::Scalar(Scalar::Int(count)), Scalar::Int(t)) => {
            2 * i128::from(count) > i128::from(t)
        }
        (Metric::Ratio { part, whole }, Scalar::Int(t)) if whole > 0 => {
            2 * i128::from(part) > i128::from(t) * i128::from(whole)
        }
        _ => match (2.0 * metric.as_f64()).partial_cmp(&total.as_f64()) {
            Some(ord) => ord == Ordering::Greater,
            None => true,
        },
    }
}
