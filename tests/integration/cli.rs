//! Non-fatal CLI paths: passing checks, table listing, configuration errors.

use super::common::{run, stderr_of, stdout_of, write_raw, write_table};
use perfguard::catalog::reference_table;
use perfguard::ThresholdTable;

#[test]
fn test_passing_check_is_silent() {
    let output = run(&[
        "check",
        "--metric",
        "8",
        "--threshold",
        "n / 10",
        "--size",
        "n=100",
        "--predicate",
        ">=",
    ]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}

#[test]
fn test_verbose_check_reports_bound() {
    let output = run(&[
        "check", "--metric", "50", "--threshold", "50", "--verbose",
    ]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("pass cli"), "{}", stdout);
    assert!(stdout.contains("fails when > 50"), "{}", stdout);
}

#[test]
fn test_table_lists_reference_checkpoints() {
    let output = run(&["table"]);
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    for inv in reference_table().iter() {
        assert!(stdout.contains(&inv.name), "missing {}", inv.name);
    }
    let fingerprint = format!("{:08x}", reference_table().fingerprint());
    assert!(stdout.contains(&fingerprint), "{}", stdout);
}

#[test]
fn test_table_json_reloads() {
    let output = run(&["table", "--json"]);
    assert!(output.status.success());
    let table = ThresholdTable::from_json(&stdout_of(&output)).unwrap();
    assert_eq!(table, reference_table());
}

#[test]
fn test_table_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut table = reference_table();
    table
        .retune(
            perfguard::catalog::RECURSION_DEPTH,
            perfguard::Threshold::constant(7),
        )
        .unwrap();
    let path = write_table(&dir, &table);

    let output = run(&["table", "--json", "--config", path.to_str().unwrap()]);
    assert!(output.status.success());
    let loaded = ThresholdTable::from_json(&stdout_of(&output)).unwrap();
    assert_eq!(loaded.fingerprint(), table.fingerprint());
}

#[test]
fn test_bad_config_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_raw(&dir, "broken.json", "{ not json");

    let output = run(&["table", "--config", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr_of(&output);
    assert!(stderr.starts_with("❌"), "{}", stderr);
    assert!(!stderr.contains("Warning:"));
}

#[test]
fn test_bad_formula_exits_with_error() {
    let output = run(&["check", "--metric", "1", "--threshold", "n / (2"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("invalid threshold formula"));
}

#[test]
fn test_deeply_nested_formula_exits_with_error() {
    let threshold = format!("{}n{}", "(".repeat(50_000), ")".repeat(50_000));
    let output = run(&["check", "--metric", "1", "--threshold", &threshold]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("nesting too deep"), "stderr: {}", stderr);
    assert!(!stderr.contains("Warning:"));
}

#[test]
fn test_bad_size_exits_with_error() {
    let output = run(&["check", "--metric", "1", "--threshold", "n", "--size", "n=1.5"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("expected name=value"));
}
