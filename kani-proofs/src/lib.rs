// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Kani model checking proofs for perfguard's comparison arithmetic.
//!
//! This standalone crate extracts the integer paths of the evaluator and the
//! threshold clamp, and proves them over every input using Kani.
//!
//! Run with: `cargo kani`
//!
//! ## Verified Properties
//!
//! 1. **No panics**: ratio and majority comparisons never overflow
//! 2. **Exactness**: ratio vs integer bound agrees with true rational order
//! 3. **Clamp**: a resolved derived threshold is never below its floor
//! 4. **Division**: threshold division is total (zero divisor, MIN / -1)

use std::cmp::Ordering;

// ============================================================================
// EVALUATOR ARITHMETIC (copied from src/evaluator.rs)
// ============================================================================

/// Order `part / whole` against an integer bound without division.
pub fn cmp_ratio_int(part: u64, whole: u64, bound: i64) -> Ordering {
    if whole == 0 {
        return 0i64.cmp(&bound);
    }
    let lhs = i128::from(part);
    let rhs = i128::from(bound) * i128::from(whole);
    lhs.cmp(&rhs)
}

/// `2 * count > total`, with no overflow.
pub fn more_than_half(count: i64, total: i64) -> bool {
    2 * i128::from(count) > i128::from(total)
}

// ============================================================================
// THRESHOLD ARITHMETIC (copied from src/threshold.rs)
// ============================================================================

/// Division as thresholds do it: zero divisor gives zero, overflow saturates.
pub fn div_total(a: i64, b: i64) -> i64 {
    if b == 0 {
        0
    } else {
        a.checked_div(b).unwrap_or(i64::MAX)
    }
}

/// Clamp a formula value to its floor.
pub fn clamp_to_floor(value: i64, floor: i64) -> i64 {
    value.max(floor)
}

// ============================================================================
// KANI MODEL CHECKING PROOFS
// ============================================================================

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Ratio comparison never overflows and matches the true order.
    #[kani::proof]
    fn verify_ratio_comparison_exact() {
        let part: u64 = kani::any();
        let whole: u64 = kani::any_where(|&w| w > 0);
        let bound: i64 = kani::any();

        let ord = cmp_ratio_int(part, whole, bound);

        // part / whole > bound  <=>  part > bound * whole  (whole > 0)
        let exact = (part as i128).cmp(&((bound as i128) * (whole as i128)));
        kani::assert(ord == exact, "ratio order must match cross-multiplication");

        if bound < 0 {
            kani::assert(
                ord == Ordering::Greater,
                "a non-negative ratio exceeds any negative bound",
            );
        }
    }

    /// An empty ratio reads as zero.
    #[kani::proof]
    fn verify_empty_ratio_is_zero() {
        let part: u64 = kani::any();
        let bound: i64 = kani::any();
        kani::assert(
            cmp_ratio_int(part, 0, bound) == 0i64.cmp(&bound),
            "whole == 0 must compare as zero",
        );
    }

    /// Majority check never overflows, even at the extremes.
    #[kani::proof]
    fn verify_majority_no_overflow() {
        let count: i64 = kani::any();
        let total: i64 = kani::any();
        let result = more_than_half(count, total);

        if count >= 0 && total >= 0 && count <= total / 2 {
            kani::assert(!result, "at most half is not a majority");
        }
        if count > 0 && total >= 0 && count > total / 2 + total % 2 {
            kani::assert(result, "more than half is a majority");
        }
    }

    /// Division is total and saturates only at MIN / -1.
    #[kani::proof]
    fn verify_division_total() {
        let a: i64 = kani::any();
        let b: i64 = kani::any();
        let q = div_total(a, b);

        if b == 0 {
            kani::assert(q == 0, "division by zero gives zero");
        } else if a == i64::MIN && b == -1 {
            kani::assert(q == i64::MAX, "MIN / -1 saturates");
        } else {
            kani::assert(q == a / b, "ordinary division is unchanged");
        }
    }

    /// A resolved derived threshold is never below its floor.
    #[kani::proof]
    fn verify_clamp_respects_floor() {
        let value: i64 = kani::any();
        let floor: i64 = kani::any_where(|&f| f >= 1);
        let bound = clamp_to_floor(value, floor);

        kani::assert(bound >= floor, "bound must respect the floor");
        kani::assert(bound >= value, "clamping never lowers a value");
        kani::assert(bound == value || bound == floor, "bound is value or floor");
    }
}
