//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use crate::invariant::Invariant;
use crate::report::{DiagnosticFormat, Violation};
use crate::sink::emit;
use crate::threshold::{Formula, SizeParams, Threshold};
use crate::types::{Category, Predicate};

/// Size parameters from `(name, value)` pairs.
pub fn sizes(pairs: &[(&str, i64)]) -> SizeParams {
    pairs.iter().copied().collect()
}

/// `count of items sharing a bucket >= n / 10`.
pub fn density_invariant() -> Invariant {
    Invariant::new(
        "bucket-density",
        Category::Density,
        Predicate::GE,
        Threshold::derived(Formula::Div(
            Box::new(Formula::Param("n".to_string())),
            Box::new(Formula::Lit(10)),
        )),
    )
}

/// `depth > limit`.
pub fn depth_invariant(limit: i64) -> Invariant {
    Invariant::new(
        "recursion-depth",
        Category::RecursionDepth,
        Predicate::GT,
        Threshold::constant(limit),
    )
}

/// `ratio > limit`.
pub fn ratio_invariant(limit: f64) -> Invariant {
    Invariant::new(
        "close-to-limit-ratio",
        Category::Magnitude,
        Predicate::GT,
        Threshold::constant(limit),
    )
}

/// What the sink would write for `violation`, captured instead of printed.
pub fn captured_diagnostic(violation: &Violation, format: DiagnosticFormat) -> String {
    let mut out = Vec::new();
    // writing into a Vec cannot fail
    let _ = emit(&mut out, violation, format);
    String::from_utf8_lossy(&out).into_owned()
}
