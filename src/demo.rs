// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Small host computations instrumented with the reference checkpoints.
//!
//! They exist to exercise the guard end to end (the CLI's `demo` command and
//! the process-level tests run them). Each one threads a [`Counters`] through
//! its work and bumps `operations` once per checkpoint passed, so a caller can
//! see exactly how far a run got.

use std::collections::HashSet;

use crate::catalog::{
    BUCKET_DENSITY, CLOSE_TO_LIMIT_RATIO, DOMINANT_VALUE, RECURSION_DEPTH, SEARCH_ITERATIONS,
    SUBSET_BLOWUP, VALUE_MAGNITUDE,
};
use crate::context::Counters;
use crate::guard::{Checkpoint, Guard};
use crate::invariant::GuardResult;
use crate::metric;
use crate::registry::ThresholdTable;
use crate::threshold::SizeParams;
use crate::types::Metric;
use crate::GuardError;

/// Run a checkpoint and count it if it passes.
fn pass(cp: &Checkpoint<'_>, metric: impl Into<Metric>, ctx: &mut Counters) -> GuardResult {
    cp.check(metric)?;
    ctx.tick();
    Ok(())
}

fn sizes_for(values: &[i64]) -> SizeParams {
    SizeParams::new()
        .with("n", values.len())
        .with("sum", metric::sum_of(values))
}

// ============================================================================
// RESIDUE BUCKETS (density, magnitude)
// ============================================================================

/// Group values by residue and report the fullest class.
pub fn bucket_density(
    table: &ThresholdTable,
    values: &[i64],
    modulus: u64,
    ctx: &mut Counters,
) -> Result<GuardResult<usize>, GuardError> {
    let guard = Guard::new(table, sizes_for(values));
    let magnitude = guard.checkpoint(VALUE_MAGNITUDE)?;
    let density = guard.checkpoint(BUCKET_DENSITY)?;
    Ok(fullest_bucket(&magnitude, &density, values, modulus, ctx))
}

fn fullest_bucket(
    magnitude: &Checkpoint<'_>,
    density: &Checkpoint<'_>,
    values: &[i64],
    modulus: u64,
    ctx: &mut Counters,
) -> GuardResult<usize> {
    pass(magnitude, metric::max_magnitude(values), ctx)?;
    let fullest = metric::max_bucket(values, modulus);
    pass(density, fullest, ctx)?;
    Ok(fullest)
}

// ============================================================================
// RECURSION (recursion-depth)
// ============================================================================

/// Sum `1..=n` recursively, checking depth on every call.
pub fn recursive_sum(
    table: &ThresholdTable,
    n: u64,
    ctx: &mut Counters,
) -> Result<GuardResult<u64>, GuardError> {
    let guard = Guard::new(table, SizeParams::new().with("n", n));
    let depth = guard.checkpoint(RECURSION_DEPTH)?;
    Ok(sum_to(n, &depth, ctx))
}

fn sum_to(n: u64, depth: &Checkpoint<'_>, ctx: &mut Counters) -> GuardResult<u64> {
    let mut scope = ctx.scope();
    let level = scope.depth();
    pass(depth, level, &mut scope)?;
    if n == 0 {
        return Ok(0);
    }
    Ok(n + sum_to(n - 1, depth, &mut scope)?)
}

// ============================================================================
// NEAR-LIMIT SHARE (ratio)
// ============================================================================

/// Count values within 10% of `limit`, after checking they are not the bulk.
pub fn close_to_limit(
    table: &ThresholdTable,
    values: &[i64],
    limit: i64,
    ctx: &mut Counters,
) -> Result<GuardResult<usize>, GuardError> {
    let guard = Guard::new(table, sizes_for(values).with("limit", limit));
    let share = guard.checkpoint(CLOSE_TO_LIMIT_RATIO)?;
    Ok(count_near_limit(&share, values, limit, ctx))
}

fn count_near_limit(
    share: &Checkpoint<'_>,
    values: &[i64],
    limit: i64,
    ctx: &mut Counters,
) -> GuardResult<usize> {
    let near = limit.saturating_sub(limit / 10);
    pass(share, metric::ratio_where(values, |&v| v >= near), ctx)?;
    Ok(metric::count_where(values, |&v| v >= near && v <= limit))
}

// ============================================================================
// SUBSET SUMS (combinatorial-blowup, structural-imbalance)
// ============================================================================

/// Count distinct subset sums by full enumeration.
pub fn subset_sums(
    table: &ThresholdTable,
    values: &[i64],
    ctx: &mut Counters,
) -> Result<GuardResult<usize>, GuardError> {
    let guard = Guard::new(table, sizes_for(values));
    let dominant = guard.checkpoint(DOMINANT_VALUE)?;
    let blowup = guard.checkpoint(SUBSET_BLOWUP)?;
    Ok(enumerate_sums(&dominant, &blowup, values, ctx))
}

fn enumerate_sums(
    dominant: &Checkpoint<'_>,
    blowup: &Checkpoint<'_>,
    values: &[i64],
    ctx: &mut Counters,
) -> GuardResult<usize> {
    pass(dominant, metric::max_frequency(values), ctx)?;
    let subsets = 1u64.checked_shl(values.len() as u32).unwrap_or(u64::MAX);
    pass(blowup, subsets, ctx)?;

    let mut sums = HashSet::new();
    for mask in 0..subsets {
        let sum = values
            .iter()
            .enumerate()
            .filter(|(i, _)| (mask >> i) & 1 == 1)
            .fold(0i64, |acc, (_, &v)| acc.saturating_add(v));
        sums.insert(sum);
    }
    Ok(sums.len())
}

// ============================================================================
// ANSWER BISECTION (iteration-count)
// ============================================================================

/// Smallest capacity that splits `values` into at most `groups` contiguous
/// runs, found by bisection over the answer range.
pub fn split_capacity(
    table: &ThresholdTable,
    values: &[i64],
    groups: usize,
    ctx: &mut Counters,
) -> Result<GuardResult<i64>, GuardError> {
    let guard = Guard::new(table, sizes_for(values));
    let rounds = guard.checkpoint(SEARCH_ITERATIONS)?;
    let values: Vec<i64> = values.iter().map(|&v| v.max(0)).collect();
    Ok(bisect_capacity(&rounds, &values, groups.max(1), ctx))
}

fn bisect_capacity(
    rounds: &Checkpoint<'_>,
    values: &[i64],
    groups: usize,
    ctx: &mut Counters,
) -> GuardResult<i64> {
    ctx.reset_iterations();
    let mut lo = metric::max_of(values);
    let mut hi = metric::sum_of(values);
    while lo < hi {
        let round = ctx.iterate();
        pass(rounds, round, ctx)?;
        let mid = lo + (hi - lo) / 2;
        if runs_needed(values, mid) <= groups {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Ok(lo)
}

fn runs_needed(values: &[i64], capacity: i64) -> usize {
    let mut runs = 1;
    let mut current = 0i64;
    for &v in values {
        if current.saturating_add(v) > capacity {
            runs += 1;
            current = v;
        } else {
            current += v;
        }
    }
    runs
}
