// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Metric extraction: cheap, read-only summaries of host state.
//!
//! Every function here takes a shared borrow and returns a fresh value. None
//! of them cache, so calling one inside a loop always reflects the state at
//! that moment. Empty inputs give zero (or an empty ratio, which reads as
//! zero), never an error.
//!
//! Costs are O(1) or one pass over the slice handed in. If computing a metric
//! would cost as much as the work being guarded, the checkpoint is in the
//! wrong place.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

use crate::context::Counters;
use crate::contracts::{check_histogram_accounts, check_ratio_well_formed};
use crate::types::Metric;

// ============================================================================
// COUNTS AND EXTREMA
// ============================================================================

#[inline]
pub fn count<T>(items: &[T]) -> usize {
    items.len()
}

/// Size of any collection that knows its length (`&Vec`, `&HashMap`, ...).
#[inline]
pub fn len<C>(collection: C) -> usize
where
    C: IntoIterator,
    C::IntoIter: ExactSizeIterator,
{
    collection.into_iter().len()
}

pub fn count_where<T>(items: &[T], pred: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| pred(item)).count()
}

/// Largest item, or `T::default()` when empty.
pub fn max_of<T: Ord + Copy + Default>(items: &[T]) -> T {
    items.iter().copied().max().unwrap_or_default()
}

/// Smallest item, or `T::default()` when empty.
pub fn min_of<T: Ord + Copy + Default>(items: &[T]) -> T {
    items.iter().copied().min().unwrap_or_default()
}

/// Largest float, skipping NaN. 0.0 when empty.
pub fn max_of_f64(items: &[f64]) -> f64 {
    items
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or(0.0)
}

/// Saturating sum.
pub fn sum_of(items: &[i64]) -> i64 {
    items.iter().fold(0i64, |acc, &v| acc.saturating_add(v))
}

/// Largest absolute value, saturating at `i64::MAX`.
pub fn max_magnitude(items: &[i64]) -> i64 {
    items
        .iter()
        .map(|v| v.checked_abs().unwrap_or(i64::MAX))
        .max()
        .unwrap_or(0)
}

// ============================================================================
// RATIOS
// ============================================================================

/// A ratio of two host-supplied counts.
pub fn ratio(part: usize, whole: usize) -> Metric {
    Metric::Ratio {
        part: part as u64,
        whole: whole as u64,
    }
}

/// Fraction of `items` matching `pred`.
pub fn ratio_where<T>(items: &[T], pred: impl Fn(&T) -> bool) -> Metric {
    let part = count_where(items, pred);
    check_ratio_well_formed(part as u64, items.len() as u64);
    ratio(part, items.len())
}

// ============================================================================
// DISTRIBUTIONS
// ============================================================================

/// Bucket each value by `value mod modulus` (Euclidean, so negatives land in
/// `0..modulus`). A modulus of 0 is treated as 1. Only occupied buckets are
/// present, so the cost follows the input and never the modulus.
pub fn histogram(values: &[i64], modulus: u64) -> BTreeMap<u64, usize> {
    let modulus = i128::from(modulus.max(1));
    let mut buckets = BTreeMap::new();
    for &v in values {
        let residue = i128::from(v).rem_euclid(modulus);
        // residue < modulus <= u64::MAX
        let bucket = u64::try_from(residue).unwrap_or(u64::MAX);
        *buckets.entry(bucket).or_insert(0) += 1;
    }
    check_histogram_accounts(&buckets, values.len());
    buckets
}

/// Size of the fullest residue class.
pub fn max_bucket(values: &[i64], modulus: u64) -> usize {
    histogram(values, modulus).into_values().max().unwrap_or(0)
}

/// How often the most common item appears.
pub fn max_frequency<T: Hash + Eq>(items: &[T]) -> usize {
    let mut freq: HashMap<&T, usize> = HashMap::with_capacity(items.len());
    for item in items {
        *freq.entry(item).or_insert(0) += 1;
    }
    freq.into_values().max().unwrap_or(0)
}

/// Number of distinct items.
pub fn distinct<T: Hash + Eq>(items: &[T]) -> usize {
    items.iter().collect::<HashSet<_>>().len()
}

// ============================================================================
// CONTEXT READERS
// ============================================================================

#[inline]
pub fn operations(ctx: &Counters) -> u64 {
    ctx.operations()
}

#[inline]
pub fn iterations(ctx: &Counters) -> u64 {
    ctx.iterations()
}

#[inline]
pub fn depth(ctx: &Counters) -> u32 {
    ctx.depth()
}

#[inline]
pub fn peak_depth(ctx: &Counters) -> u32 {
    ctx.peak_depth()
}
