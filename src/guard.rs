// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binding a threshold table to one run's size parameters.
//!
//! Checkpoint names are resolved once, up front, so a misspelled name is a
//! setup error rather than something discovered in a hot loop:
//!
//! ```ignore
//! let guard = Guard::new(&table, SizeParams::new().with("n", n));
//! let depth = guard.checkpoint("recursion-depth")?;
//! // ... later, inside the recursion
//! depth.check(ctx.depth())?;
//! ```

use crate::error::GuardError;
use crate::invariant::{GuardResult, Invariant};
use crate::registry::ThresholdTable;
use crate::threshold::SizeParams;
use crate::types::{Metric, Scalar, Verdict};

#[derive(Debug, Clone)]
pub struct Guard<'t> {
    table: &'t ThresholdTable,
    sizes: SizeParams,
}

impl<'t> Guard<'t> {
    pub fn new(table: &'t ThresholdTable, sizes: SizeParams) -> Self {
        Self { table, sizes }
    }

    pub fn sizes(&self) -> &SizeParams {
        &self.sizes
    }

    /// Look up a checkpoint by name.
    pub fn checkpoint(&self, name: &str) -> Result<Checkpoint<'_>, GuardError> {
        Ok(Checkpoint {
            invariant: self.table.invariant(name)?,
            sizes: &self.sizes,
        })
    }
}

/// One call site's invariant, ready to evaluate.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint<'g> {
    invariant: &'g Invariant,
    sizes: &'g SizeParams,
}

impl Checkpoint<'_> {
    pub fn invariant(&self) -> &Invariant {
        self.invariant
    }

    /// Current bound, resolved fresh.
    pub fn bound(&self) -> Scalar {
        self.invariant.threshold.resolve(self.sizes)
    }

    pub fn verdict(&self, metric: impl Into<Metric>) -> Verdict {
        self.invariant.evaluate(metric, self.sizes).0
    }

    #[inline]
    pub fn check(&self, metric: impl Into<Metric>) -> GuardResult {
        self.invariant.check(metric, self.sizes)
    }
}
