//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

use perfguard::{ThresholdTable, DIAGNOSTIC_PREFIX};

// Re-export canonical test utilities from perfguard::testing
pub use perfguard::testing::{
    captured_diagnostic, density_invariant, depth_invariant, ratio_invariant, sizes,
};

// ============================================================================
// CHILD PROCESSES
// ============================================================================

/// The `perfguard` binary, with colors off so stdout is plain text.
pub fn perfguard() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_perfguard"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Run `perfguard` with `args` and collect its output.
pub fn run(args: &[&str]) -> Output {
    perfguard()
        .args(args)
        .output()
        .expect("Failed to spawn perfguard")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Stderr lines that are guard diagnostics.
pub fn diagnostic_lines(output: &Output) -> Vec<String> {
    stderr_of(output)
        .lines()
        .filter(|line| line.starts_with(DIAGNOSTIC_PREFIX))
        .map(str::to_string)
        .collect()
}

/// Assert the process died the way a violation kills it: abnormally, with
/// exactly one diagnostic line and nothing else on either stream.
pub fn assert_aborted_with_one_diagnostic(output: &Output) -> String {
    assert!(
        !output.status.success(),
        "process exited normally: {:?}",
        output.status
    );
    assert_ne!(
        output.status.code(),
        Some(1),
        "exit code 1 is the configuration-error path, not a violation"
    );

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(output.status.signal(), Some(6), "expected SIGABRT");
    }

    let stderr = stderr_of(output);
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 1, "expected one stderr line, got {:?}", lines);
    assert!(lines[0].starts_with(DIAGNOSTIC_PREFIX), "got {:?}", lines[0]);
    assert!(
        output.stdout.is_empty(),
        "nothing may run after the violation, stdout: {:?}",
        stdout_of(output)
    );
    lines[0].to_string()
}

// ============================================================================
// TABLE FILES
// ============================================================================

/// Write `table` as JSON into `dir` and return the path.
pub fn write_table(dir: &tempfile::TempDir, table: &ThresholdTable) -> PathBuf {
    let path = dir.path().join("thresholds.json");
    let json = table.to_json_pretty().expect("Failed to serialize table");
    std::fs::write(&path, json).expect("Failed to write table");
    path
}

/// Write raw text into `dir` and return the path.
pub fn write_raw(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write file");
    path
}
