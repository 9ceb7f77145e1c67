// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the perfguard command-line interface.
//!
//! Three subcommands: `table` to print and fingerprint a threshold table,
//! `check` to run one invariant from a shell script (aborting on violation
//! like any other checkpoint), and `demo` to run a bundled host computation
//! against the reference table.

pub mod display;

use clap::{Parser, Subcommand, ValueEnum};
use perfguard::{Category, DiagnosticFormat, Predicate, Scalar};

#[derive(Parser)]
#[command(
    name = "perfguard",
    about = "Runtime performance-invariant guards",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a threshold table and its fingerprint
    Table {
        /// JSON table to load instead of the built-in reference table
        #[arg(short, long)]
        config: Option<String>,

        /// Emit the table as JSON instead of a formatted listing
        #[arg(long)]
        json: bool,
    },

    /// Evaluate one invariant; abort with a diagnostic if it fails
    Check {
        /// Metric value sampled by the caller
        #[arg(short, long, allow_hyphen_values = true)]
        metric: Scalar,

        /// Threshold: a number or a formula over size parameters (e.g. "n / 10")
        #[arg(short, long)]
        threshold: String,

        /// Size parameter as name=value (repeatable)
        #[arg(short, long = "size")]
        sizes: Vec<String>,

        /// Failure condition: >, >=, <, <=, or majority
        #[arg(short, long, default_value = ">")]
        predicate: Predicate,

        /// Bottleneck category
        #[arg(long, default_value = "magnitude")]
        category: Category,

        /// Checkpoint name shown in the diagnostic
        #[arg(long, default_value = "cli")]
        name: String,

        /// Diagnostic text (defaults to the category description)
        #[arg(short, long)]
        description: Option<String>,

        /// Diagnostic format: text or json
        #[arg(long, default_value = "text")]
        format: DiagnosticFormat,

        /// Print the verdict on success instead of staying silent
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run a bundled host computation with the reference checkpoints
    Demo {
        #[arg(value_enum)]
        kind: DemoKind,

        /// Input values (comma separated)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<i64>,

        /// Recursion depth for `recursion`
        #[arg(long, default_value = "10")]
        depth: u64,

        /// Bucket modulus for `buckets`
        #[arg(long, default_value = "10")]
        modulus: u64,

        /// Limit for `near-limit`
        #[arg(long, default_value = "100")]
        limit: i64,

        /// Group count for `split`
        #[arg(long, default_value = "2")]
        groups: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DemoKind {
    /// Residue-class histogram (density, magnitude)
    Buckets,
    /// Recursive sum (recursion-depth)
    Recursion,
    /// Share of values near a limit (ratio)
    NearLimit,
    /// Subset-sum enumeration (combinatorial-blowup, structural-imbalance)
    Subsets,
    /// Bisection over an answer range (iteration-count)
    Split,
}
