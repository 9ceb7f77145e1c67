// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;

use perfguard::{
    catalog, demo, parse_assignment, sink, Category, Counters, DiagnosticFormat, GuardError,
    Invariant, Predicate, Scalar, SizeParams, Threshold, ThresholdTable,
};

mod cli;
use cli::display::{self, dim, row, section_bot, section_top, themed, BOLD, GREEN};
use cli::{Cli, Commands, DemoKind};

/// Sample input used when `demo` is run without `--values`.
const SAMPLE_VALUES: [i64; 5] = [7, 2, 5, 10, 8];

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Table { config, json } => run_table(config.as_deref(), json),
        Commands::Check {
            metric,
            threshold,
            sizes,
            predicate,
            category,
            name,
            description,
            format,
            verbose,
        } => {
            let args = CheckArgs {
                metric,
                threshold,
                sizes,
                predicate,
                category,
                name,
                description,
            };
            run_check(args, format, verbose)
        }
        Commands::Demo {
            kind,
            values,
            depth,
            modulus,
            limit,
            groups,
        } => {
            let values = if values.is_empty() {
                SAMPLE_VALUES.to_vec()
            } else {
                values
            };
            run_demo(kind, &values, depth, modulus, limit, groups)
        }
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// TABLE
// ============================================================================

fn run_table(config: Option<&str>, json: bool) -> Result<(), GuardError> {
    let table = match config {
        Some(path) => ThresholdTable::load(path)?,
        None => catalog::reference_table(),
    };

    if json {
        println!("{}", table.to_json_pretty()?);
        return Ok(());
    }

    section_top("THRESHOLDS");
    for invariant in table.iter() {
        row(&display::invariant_row(invariant));
    }
    row("");
    row(&format!(
        " {} {}",
        dim("fingerprint"),
        themed(GREEN, &[BOLD], &format!("{:08x}", table.fingerprint()))
    ));
    section_bot();
    Ok(())
}

// ============================================================================
// CHECK
// ============================================================================

struct CheckArgs {
    metric: Scalar,
    threshold: String,
    sizes: Vec<String>,
    predicate: Predicate,
    category: Category,
    name: String,
    description: Option<String>,
}

fn run_check(args: CheckArgs, format: DiagnosticFormat, verbose: bool) -> Result<(), GuardError> {
    let mut sizes = SizeParams::new();
    for assignment in &args.sizes {
        let (name, value) = parse_assignment(assignment)?;
        sizes.set(&name, value);
    }

    let mut invariant = Invariant::new(
        args.name,
        args.category,
        args.predicate,
        Threshold::parse(&args.threshold)?,
    );
    if let Some(text) = args.description {
        invariant = invariant.describe(text);
    }

    if let Err(violation) = invariant.check(args.metric, &sizes) {
        sink::abort_with(&violation, format);
    }

    if verbose {
        let (_, bound) = invariant.evaluate(args.metric, &sizes);
        println!(
            "{} {} (metric {}, fails when {} {})",
            themed(GREEN, &[BOLD], "pass"),
            invariant.name,
            args.metric,
            invariant.predicate,
            bound
        );
    }
    Ok(())
}

// ============================================================================
// DEMO
// ============================================================================

fn run_demo(
    kind: DemoKind,
    values: &[i64],
    depth: u64,
    modulus: u64,
    limit: i64,
    groups: usize,
) -> Result<(), GuardError> {
    let table = catalog::reference_table();
    let mut ctx = Counters::new();

    let (label, answer) = match kind {
        DemoKind::Buckets => {
            let fullest = sink::terminate_on(demo::bucket_density(&table, values, modulus, &mut ctx)?);
            ("fullest bucket", fullest.to_string())
        }
        DemoKind::Recursion => {
            let total = sink::terminate_on(demo::recursive_sum(&table, depth, &mut ctx)?);
            ("sum", total.to_string())
        }
        DemoKind::NearLimit => {
            let near = sink::terminate_on(demo::close_to_limit(&table, values, limit, &mut ctx)?);
            ("near limit", near.to_string())
        }
        DemoKind::Subsets => {
            let sums = sink::terminate_on(demo::subset_sums(&table, values, &mut ctx)?);
            ("distinct sums", sums.to_string())
        }
        DemoKind::Split => {
            let capacity = sink::terminate_on(demo::split_capacity(&table, values, groups, &mut ctx)?);
            ("capacity", capacity.to_string())
        }
    };

    println!(
        "{} {}  {}",
        themed(GREEN, &[BOLD], label),
        answer,
        dim(&format!(
            "({} checkpoints passed, peak depth {}, {} iterations)",
            ctx.operations(),
            ctx.peak_depth(),
            ctx.iterations()
        ))
    );
    Ok(())
}
