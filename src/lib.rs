// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime performance-invariant guards.
//!
//! A host computation calls a checkpoint inline at a chosen point. The
//! checkpoint samples a cheap metric from host state, compares it with a
//! threshold, and either returns silently or reports a categorized violation
//! that ends the process. Every violation is fatal: the guard exists to stop a
//! known-slow path from running to completion, not to warn about it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  metric.rs  │────▶│ threshold.rs │────▶│ evaluator.rs │────▶│   sink.rs   │
//! │ (read host  │     │ (constant or │     │ (predicate → │     │ (Warning:   │
//! │   state)    │     │  n / 10 ...) │     │   Verdict)   │     │  + abort)   │
//! └─────────────┘     └──────────────┘     └──────────────┘     └─────────────┘
//!        ▲                   ▲                    ▲                    ▲
//!        │            ┌──────┴───────┐     ┌──────┴───────┐     ┌──────┴──────┐
//!  context.rs         │ registry.rs  │────▶│ invariant.rs │────▶│  report.rs  │
//!  (Counters)         │ (table, JSON)│     │  guard.rs    │     │ (Violation) │
//!                     └──────────────┘     └──────────────┘     └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use perfguard::{sink, Category, Guard, Invariant, Predicate, SizeParams, Threshold,
//!                 ThresholdTable};
//!
//! let table = ThresholdTable::builder()
//!     .entry(Invariant::new(
//!         "bucket-density",
//!         Category::Density,
//!         Predicate::GE,
//!         Threshold::parse("n / 2").unwrap(),
//!     ))
//!     .build();
//!
//! let values = vec![3_i64, 14, 15, 92, 65];
//! let guard = Guard::new(&table, SizeParams::new().with("n", values.len()));
//! let density = guard.checkpoint("bucket-density").unwrap();
//!
//! let fullest = sink::run_guarded(|| {
//!     let fullest = perfguard::metric::max_bucket(&values, 1000);
//!     density.check(fullest)?;
//!     Ok(fullest)
//! });
//! assert_eq!(fullest, 1);
//! ```
//!
//! Tests and harnesses keep the `GuardResult` instead of handing it to
//! [`sink::terminate_on`], and inspect the [`Violation`] directly.

pub mod catalog;
pub mod contracts;
mod context;
pub mod demo;
mod error;
pub mod evaluator;
mod guard;
mod invariant;
pub mod metric;
mod registry;
mod report;
pub mod sink;
pub mod testing;
mod threshold;
mod types;

// Re-exports for public API
pub use context::{Counters, DepthScope};
pub use error::GuardError;
pub use evaluator::evaluate;
pub use guard::{Checkpoint, Guard};
pub use invariant::{GuardResult, Invariant};
pub use registry::{TableBuilder, ThresholdTable};
pub use report::{DiagnosticFormat, Violation, DIAGNOSTIC_PREFIX};
pub use threshold::{
    parse_assignment, Formula, SizeParams, Threshold, DEFAULT_FLOOR, MAX_FORMULA_DEPTH,
};
pub use types::{Boundary, Category, Metric, Predicate, Scalar, Verdict};
