//! Runtime contracts for the guard's own internals.
//!
//! These are debug-mode assertions on properties the guard promises to its
//! hosts. They:
//!
//! 1. Are **zero-cost in release builds** (use `debug_assert!`)
//! 2. Provide **early failure detection** during development
//! 3. Never observe or touch host state beyond what they are handed
//!
//! They check the guard, not the host. A host whose metric crosses a
//! threshold gets a [`crate::Violation`]; a guard that breaks one of these
//! panics in debug builds.
//!
//! | Contract Function              | Property                                   |
//! |--------------------------------|--------------------------------------------|
//! | `check_bound_respects_floor`   | derived bounds never drop below their floor|
//! | `check_ratio_well_formed`      | `part <= whole` for counted ratios         |
//! | `check_histogram_accounts`     | bucket counts sum to the input length      |
//! | `check_depth_balanced`         | `leave` never runs without a matching `enter` |

use std::collections::BTreeMap;

// ============================================================================
// COMPILE-TIME ASSERTIONS (evaluated at build time)
// ============================================================================

const _: () = {
    // Derived thresholds never resolve below 1 unless a table asks for it.
    assert!(crate::threshold::DEFAULT_FLOOR >= 1);
};

// ============================================================================
// THRESHOLD CONTRACTS
// ============================================================================

/// Check that a resolved derived bound honours its floor.
///
/// # Panics (debug builds only)
/// Panics if `bound < floor`.
#[inline]
pub fn check_bound_respects_floor(bound: i64, floor: i64) {
    debug_assert!(
        bound >= floor,
        "Contract violation: derived threshold {} resolved below its floor {}",
        bound,
        floor
    );
}

// ============================================================================
// METRIC CONTRACTS
// ============================================================================

/// Check that a ratio produced by counting a subset is well formed.
#[inline]
pub fn check_ratio_well_formed(part: u64, whole: u64) {
    debug_assert!(
        part <= whole,
        "Contract violation: ratio part {} exceeds whole {}",
        part,
        whole
    );
}

/// Check that every input item landed in exactly one bucket.
#[inline]
pub fn check_histogram_accounts(buckets: &BTreeMap<u64, usize>, input_len: usize) {
    debug_assert_eq!(
        buckets.values().sum::<usize>(),
        input_len,
        "Contract violation: histogram over {} buckets lost items",
        buckets.len()
    );
}

/// Check that a depth decrement had a matching increment.
#[inline]
pub fn check_depth_balanced(depth: u32) {
    debug_assert!(
        depth > 0,
        "Contract violation: leave() called at depth 0"
    );
}
