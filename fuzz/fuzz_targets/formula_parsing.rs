// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for threshold formula parsing.
//!
//! Any text either parses or returns an error; it never panics. Anything that
//! parses must evaluate without panicking for any sizes, and its display form
//! must parse back to the same formula.

#![no_main]

use libfuzzer_sys::fuzz_target;
use perfguard::{Formula, SizeParams};

#[derive(Debug, arbitrary::Arbitrary)]
struct FormulaInput<'a> {
    text: &'a str,
    n: i64,
    m: i64,
}

fuzz_target!(|input: FormulaInput<'_>| {
    let Ok(formula) = Formula::parse(input.text) else {
        return;
    };

    let sizes = SizeParams::new().with("n", input.n).with("m", input.m);
    let value = formula.eval(&sizes);

    let shown = formula.to_string();
    let reparsed = Formula::parse(&shown)
        .unwrap_or_else(|e| panic!("display form {:?} failed to parse: {}", shown, e));
    assert_eq!(reparsed.eval(&sizes), value, "{:?} vs {:?}", input.text, shown);
});
