// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Invariants: a metric, a predicate, a threshold and a category tag.
//!
//! An invariant holds no state between calls. Each [`Invariant::check`]
//! resolves its threshold, evaluates the metric it is handed, and either
//! returns `Ok(())` or a [`Violation`] describing what tripped.

use serde::{Deserialize, Serialize};

use crate::evaluator::evaluate;
use crate::report::Violation;
use crate::threshold::{SizeParams, Threshold};
use crate::types::{Category, Metric, Predicate, Scalar, Verdict};

/// Result of a checkpoint. `Err` is fatal and must reach a termination point.
pub type GuardResult<T = ()> = Result<T, Violation>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invariant {
    /// Checkpoint name, unique within a table.
    pub name: String,
    pub category: Category,
    pub predicate: Predicate,
    pub threshold: Threshold,
    /// Human-readable bottleneck text for the diagnostic line.
    #[serde(default)]
    pub description: String,
}

impl Invariant {
    /// New invariant using the category's default description.
    pub fn new(
        name: impl Into<String>,
        category: Category,
        predicate: Predicate,
        threshold: Threshold,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            predicate,
            threshold,
            description: category.description().to_string(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Text used in diagnostics; falls back to the category default.
    pub fn description(&self) -> &str {
        if self.description.trim().is_empty() {
            self.category.description()
        } else {
            &self.description
        }
    }

    /// Resolve the threshold and evaluate, returning the verdict and bound.
    #[inline]
    pub fn evaluate(&self, metric: impl Into<Metric>, sizes: &SizeParams) -> (Verdict, Scalar) {
        let bound = self.threshold.resolve(sizes);
        (evaluate(metric.into(), self.predicate, bound), bound)
    }

    /// Run this invariant as a checkpoint.
    #[inline]
    pub fn check(&self, metric: impl Into<Metric>, sizes: &SizeParams) -> GuardResult {
        let metric = metric.into();
        match self.evaluate(metric, sizes) {
            (Verdict::Pass, _) => Ok(()),
            (Verdict::Fail, bound) => Err(Violation::new(self, metric, bound)),
        }
    }
}
