// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for evaluator totality.
//!
//! Every metric, predicate and bound gets a verdict: no panics, the same
//! verdict twice, and NaN on either side always fails.

#![no_main]

use libfuzzer_sys::fuzz_target;
use perfguard::{evaluate, Boundary, Metric, Predicate, Scalar, Verdict};

#[derive(Debug)]
struct EvalInput {
    metric: Metric,
    predicate: Predicate,
    bound: Scalar,
}

fn scalar(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Scalar> {
    Ok(if u.arbitrary()? {
        Scalar::Int(u.arbitrary()?)
    } else {
        Scalar::Float(u.arbitrary()?)
    })
}

impl<'a> arbitrary::Arbitrary<'a> for EvalInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let metric = if u.arbitrary()? {
            Metric::Ratio {
                part: u.arbitrary()?,
                whole: u.arbitrary()?,
            }
        } else {
            Metric::Scalar(scalar(u)?)
        };
        let boundary = if u.arbitrary()? {
            Boundary::Inclusive
        } else {
            Boundary::Exclusive
        };
        let predicate = match u.int_in_range(0..=2)? {
            0 => Predicate::Exceeds { boundary },
            1 => Predicate::FallsBelow { boundary },
            _ => Predicate::MoreThanHalfOf,
        };
        Ok(EvalInput {
            metric,
            predicate,
            bound: scalar(u)?,
        })
    }
}

fuzz_target!(|input: EvalInput| {
    let first = evaluate(input.metric, input.predicate, input.bound);
    let second = evaluate(input.metric, input.predicate, input.bound);
    assert_eq!(first, second);

    if input.metric.as_f64().is_nan() || input.bound.as_f64().is_nan() {
        assert_eq!(first, Verdict::Fail, "{:?}", input);
    }
});
