// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Configuration-time errors.
//!
//! These cover everything that can go wrong while *setting up* guards: bad
//! formulas, unknown checkpoint names, malformed tables. A failed invariant at
//! runtime is not an error in this sense; it is a [`crate::Violation`].

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// A threshold formula could not be parsed.
    Formula {
        input: String,
        position: usize,
        reason: String,
    },
    /// A number literal could not be parsed.
    InvalidNumber { input: String },
    /// A `name=value` size assignment was malformed.
    InvalidAssignment { input: String },
    /// Category text matched no known category.
    UnknownCategory { name: String },
    /// Predicate text matched no known comparison.
    UnknownPredicate { symbol: String },
    /// Diagnostic format text matched neither `text` nor `json`.
    UnknownFormat { name: String },
    /// A checkpoint name was not present in the threshold table.
    UnknownCheckpoint { name: String },
    /// Two table entries share a checkpoint name.
    DuplicateCheckpoint { name: String },
    /// Table JSON could not be read or written.
    Table { reason: String },
    /// Reading a table file failed.
    Io { path: String, reason: String },
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardError::Formula {
                input,
                position,
                reason,
            } => {
                write!(
                    f,
                    "invalid threshold formula '{}' at byte {}: {}",
                    input, position, reason
                )
            }
            GuardError::InvalidNumber { input } => write!(f, "invalid number '{}'", input),
            GuardError::InvalidAssignment { input } => {
                write!(f, "expected name=value, got '{}'", input)
            }
            GuardError::UnknownCategory { name } => write!(f, "unknown category '{}'", name),
            GuardError::UnknownPredicate { symbol } => {
                write!(f, "unknown predicate '{}'", symbol)
            }
            GuardError::UnknownFormat { name } => {
                write!(f, "unknown diagnostic format '{}' (expected text or json)", name)
            }
            GuardError::UnknownCheckpoint { name } => {
                write!(f, "no checkpoint named '{}' in threshold table", name)
            }
            GuardError::DuplicateCheckpoint { name } => {
                write!(f, "checkpoint '{}' defined more than once", name)
            }
            GuardError::Table { reason } => write!(f, "threshold table: {}", reason),
            GuardError::Io { path, reason } => write!(f, "failed to read {}: {}", path, reason),
        }
    }
}

impl std::error::Error for GuardError {}

impl From<serde_json::Error> for GuardError {
    fn from(e: serde_json::Error) -> Self {
        GuardError::Table {
            reason: e.to_string(),
        }
    }
}
