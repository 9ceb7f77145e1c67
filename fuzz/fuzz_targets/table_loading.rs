// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for threshold table loading.
//!
//! Arbitrary bytes either load or are rejected cleanly. A table that loads
//! must serialize back to JSON that loads with the same checkpoints.

#![no_main]

use libfuzzer_sys::fuzz_target;
use perfguard::ThresholdTable;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(table) = ThresholdTable::from_json(text) else {
        return;
    };

    let json = table.to_json().expect("loaded table must serialize");
    let again = ThresholdTable::from_json(&json).expect("serialized table must load");
    let names: Vec<&str> = table.iter().map(|inv| inv.name.as_str()).collect();
    let reloaded: Vec<&str> = again.iter().map(|inv| inv.name.as_str()).collect();
    assert_eq!(names, reloaded);
});
