// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Violation reports and their one-line rendering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GuardError;
use crate::invariant::Invariant;
use crate::types::{Category, Metric, Predicate, Scalar};

/// Every diagnostic line starts with this.
pub const DIAGNOSTIC_PREFIX: &str = "Warning: ";

/// A failed invariant: what tripped, and the numbers that tripped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub checkpoint: String,
    pub category: Category,
    pub description: String,
    pub metric: Metric,
    pub predicate: Predicate,
    pub threshold: Scalar,
}

impl Violation {
    pub fn new(invariant: &Invariant, metric: Metric, threshold: Scalar) -> Self {
        Self {
            checkpoint: invariant.name.clone(),
            category: invariant.category,
            description: invariant.description().to_string(),
            metric,
            predicate: invariant.predicate,
            threshold,
        }
    }

    /// The diagnostic line, without a trailing newline.
    ///
    /// `Warning: <description> (<checkpoint>: <metric> <op> <threshold>)`
    pub fn line(&self) -> String {
        format!(
            "{}{} ({}: {} {} {})",
            DIAGNOSTIC_PREFIX,
            single_line(&self.description),
            single_line(&self.checkpoint),
            self.metric,
            self.predicate,
            self.threshold
        )
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line())
    }
}

impl std::error::Error for Violation {}

/// How a violation is written to the error stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticFormat {
    /// `Warning: ...` text line.
    #[default]
    Text,
    /// The violation as a single-line JSON object.
    Json,
}

impl DiagnosticFormat {
    pub fn render(self, violation: &Violation) -> String {
        match self {
            DiagnosticFormat::Text => violation.line(),
            // serde_json escapes embedded newlines, so this stays one line
            DiagnosticFormat::Json => {
                serde_json::to_string(violation).unwrap_or_else(|_| violation.line())
            }
        }
    }
}

impl FromStr for DiagnosticFormat {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(DiagnosticFormat::Text),
            "json" => Ok(DiagnosticFormat::Json),
            _ => Err(GuardError::UnknownFormat {
                name: s.to_string(),
            }),
        }
    }
}
