// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Host-owned running counters.
//!
//! Hosts often thread an "operations so far" count or a recursion depth through
//! their hot paths so a checkpoint can look at it. [`Counters`] is that state
//! made explicit: the host owns it and updates it, the guard only reads it.
//! There is no process-wide counter anywhere in this crate.

use std::ops::{Deref, DerefMut};

use crate::contracts::check_depth_balanced;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counters {
    operations: u64,
    iterations: u64,
    depth: u32,
    peak_depth: u32,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one unit of work.
    #[inline]
    pub fn tick(&mut self) {
        self.operations = self.operations.saturating_add(1);
    }

    #[inline]
    pub fn tick_by(&mut self, n: u64) {
        self.operations = self.operations.saturating_add(n);
    }

    /// Count one loop round and return the running total.
    #[inline]
    pub fn iterate(&mut self) -> u64 {
        self.iterations = self.iterations.saturating_add(1);
        self.iterations
    }

    /// Start a fresh loop (binary search, relaxation pass, ...).
    pub fn reset_iterations(&mut self) {
        self.iterations = 0;
    }

    /// Record entry into a recursive call and return the new depth.
    #[inline]
    pub fn enter(&mut self) -> u32 {
        self.depth = self.depth.saturating_add(1);
        self.peak_depth = self.peak_depth.max(self.depth);
        self.depth
    }

    #[inline]
    pub fn leave(&mut self) {
        check_depth_balanced(self.depth);
        self.depth = self.depth.saturating_sub(1);
    }

    /// Enter one level and leave it again when the scope drops.
    ///
    /// The scope derefs to the counters, so it can be handed straight to the
    /// next recursive call.
    pub fn scope(&mut self) -> DepthScope<'_> {
        self.enter();
        DepthScope { counters: self }
    }

    pub fn operations(&self) -> u64 {
        self.operations
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn peak_depth(&self) -> u32 {
        self.peak_depth
    }
}

/// One level of recursion, released on drop.
pub struct DepthScope<'a> {
    counters: &'a mut Counters,
}

impl Deref for DepthScope<'_> {
    type Target = Counters;

    fn deref(&self) -> &Counters {
        self.counters
    }
}

impl DerefMut for DepthScope<'_> {
    fn deref_mut(&mut self) -> &mut Counters {
        self.counters
    }
}

impl Drop for DepthScope<'_> {
    fn drop(&mut self) {
        self.counters.leave();
    }
}
