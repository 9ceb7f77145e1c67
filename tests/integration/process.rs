//! A violation ends the process: one diagnostic line, abnormal exit, and
//! nothing from the host afterwards.

use super::common::{assert_aborted_with_one_diagnostic, run, stderr_of, stdout_of};

#[test]
fn test_deep_recursion_aborts() {
    let output = run(&["demo", "recursion", "--depth", "60"]);
    let line = assert_aborted_with_one_diagnostic(&output);
    assert!(line.contains("recursion depth"), "{}", line);
    assert!(line.contains("(recursion-depth: 51 > 50)"), "{}", line);
}

#[test]
fn test_recursion_at_limit_completes() {
    // depth reaches exactly 50
    let output = run(&["demo", "recursion", "--depth", "49"]);
    assert!(output.status.success(), "{:?}", output.status);
    assert!(stderr_of(&output).is_empty());
    assert!(stdout_of(&output).contains("sum 1225"), "{}", stdout_of(&output));
}

#[test]
fn test_clean_run_exits_normally_without_diagnostics() {
    for kind in ["buckets", "recursion", "near-limit", "subsets", "split"] {
        let output = run(&["demo", kind]);
        assert!(output.status.success(), "{}: {:?}", kind, output.status);
        assert_eq!(output.status.code(), Some(0));
        assert!(
            stderr_of(&output).is_empty(),
            "{}: unexpected stderr {:?}",
            kind,
            stderr_of(&output)
        );
    }
}

#[test]
fn test_dominant_value_aborts_before_enumeration() {
    let output = run(&["demo", "subsets", "--values", "5,5,5,1"]);
    let line = assert_aborted_with_one_diagnostic(&output);
    assert!(line.contains("dominant-value"), "{}", line);
}

#[test]
fn test_single_value_subsets_complete() {
    let output = run(&["demo", "subsets", "--values", "7"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stderr_of(&output).is_empty());
    assert!(stdout_of(&output).contains("distinct sums 2"));
}

#[test]
fn test_subset_blowup_aborts() {
    let values: Vec<String> = (1..=20).map(|v| v.to_string()).collect();
    let output = run(&["demo", "subsets", "--values", &values.join(",")]);
    let line = assert_aborted_with_one_diagnostic(&output);
    assert!(line.contains("(subset-blowup: 1048576 >= 1048576)"), "{}", line);
}

#[test]
fn test_bisection_over_huge_range_aborts() {
    let big = (1i64 << 50).to_string();
    let values = [big.as_str(), big.as_str(), big.as_str()].join(",");
    let output = run(&["demo", "split", "--values", &values]);
    let line = assert_aborted_with_one_diagnostic(&output);
    assert!(line.contains("search-iterations"), "{}", line);
}

#[test]
fn test_crowded_bucket_aborts() {
    let output = run(&["demo", "buckets", "--values", "10,20,30,40,7", "--modulus", "10"]);
    let line = assert_aborted_with_one_diagnostic(&output);
    assert!(line.contains("(bucket-density: 4 >= 2)"), "{}", line);
}

#[test]
fn test_near_limit_share_aborts() {
    let output = run(&[
        "demo",
        "near-limit",
        "--values",
        "95,96,97,98,99,1",
        "--limit",
        "100",
    ]);
    let line = assert_aborted_with_one_diagnostic(&output);
    assert!(line.contains("(close-to-limit-ratio: 5/6 (0.833) > 0.8)"), "{}", line);
}

#[test]
fn test_check_violation_aborts() {
    let output = run(&[
        "check",
        "--metric",
        "12",
        "--threshold",
        "n / 10",
        "--size",
        "n=100",
        "--predicate",
        ">=",
        "--category",
        "density",
        "--name",
        "bucket-density",
    ]);
    let line = assert_aborted_with_one_diagnostic(&output);
    assert!(line.ends_with("(bucket-density: 12 >= 10)"), "{}", line);
}

#[test]
fn test_check_json_diagnostic() {
    let output = run(&[
        "check",
        "--metric",
        "0.81",
        "--threshold",
        "0.8",
        "--format",
        "json",
    ]);
    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 1, "{:?}", lines);

    let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(value["predicate"]["op"], "exceeds");
    assert_eq!(value["threshold"], 0.8);
}
