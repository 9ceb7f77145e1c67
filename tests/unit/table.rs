//! Threshold tables on disk: loading, rejection, fingerprints.

use super::common::{sizes, write_raw, write_table};
use perfguard::catalog::{self, reference_table};
use perfguard::{Category, Guard, GuardError, Predicate, Scalar, Threshold, ThresholdTable};

const HAND_WRITTEN: &str = r#"{
  "checkpoints": [
    {
      "name": "dfs-depth",
      "category": "recursion-depth",
      "predicate": { "op": "exceeds", "boundary": "exclusive" },
      "threshold": { "kind": "constant", "value": 50 },
      "description": "Performance bottleneck - DFS recursion too deep"
    },
    {
      "name": "bucket-density",
      "category": "density",
      "predicate": { "op": "exceeds", "boundary": "inclusive" },
      "threshold": { "kind": "derived", "formula": "n / 10" }
    }
  ]
}"#;

#[test]
fn test_load_hand_written_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_raw(&dir, "table.json", HAND_WRITTEN);
    let table = ThresholdTable::load(&path).unwrap();

    assert_eq!(table.len(), 2);
    let dfs = table.invariant("dfs-depth").unwrap();
    assert_eq!(dfs.category, Category::RecursionDepth);
    assert_eq!(dfs.predicate, Predicate::GT);
    assert_eq!(dfs.description, "Performance bottleneck - DFS recursion too deep");

    // floor defaults when omitted
    let density = table.invariant("bucket-density").unwrap();
    assert_eq!(density.threshold, Threshold::parse("n / 10").unwrap());
    assert_eq!(density.threshold.resolve(&sizes(&[("n", 3)])), Scalar::Int(1));
}

#[test]
fn test_missing_description_falls_back_to_category() {
    let table = ThresholdTable::from_json(HAND_WRITTEN).unwrap();
    let density = table.invariant("bucket-density").unwrap();
    assert_eq!(density.description(), Category::Density.description());
}

#[test]
fn test_reference_table_survives_a_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let table = reference_table();
    let path = write_table(&dir, &table);

    let loaded = ThresholdTable::load(&path).unwrap();
    assert_eq!(loaded, table);
    assert_eq!(loaded.fingerprint(), table.fingerprint());
}

#[test]
fn test_fingerprint_ignores_formatting() {
    let compact = ThresholdTable::from_json(HAND_WRITTEN).unwrap();
    let reformatted: String = HAND_WRITTEN.split_whitespace().collect::<Vec<_>>().join(" ");
    let again = ThresholdTable::from_json(&reformatted).unwrap();
    assert_eq!(compact.fingerprint(), again.fingerprint());
}

#[test]
fn test_duplicate_names_rejected_on_load() {
    let json = r#"{"checkpoints": [
        {"name": "a", "category": "density", "predicate": {"op": "more_than_half_of"},
         "threshold": {"kind": "constant", "value": 4}},
        {"name": "a", "category": "density", "predicate": {"op": "more_than_half_of"},
         "threshold": {"kind": "constant", "value": 8}}
    ]}"#;
    let err = ThresholdTable::from_json(json).unwrap_err();
    assert!(err.to_string().contains("'a'"), "{}", err);
}

#[test]
fn test_bad_formula_rejected_on_load() {
    let json = HAND_WRITTEN.replace("n / 10", "n / (10");
    assert!(matches!(
        ThresholdTable::from_json(&json),
        Err(GuardError::Table { .. })
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ThresholdTable::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, GuardError::Io { .. }), "{:?}", err);
}

#[test]
fn test_unknown_checkpoint_is_configuration_error() {
    let table = reference_table();
    let guard = Guard::new(&table, sizes(&[("n", 10)]));
    assert!(matches!(
        guard.checkpoint("no-such-checkpoint"),
        Err(GuardError::UnknownCheckpoint { .. })
    ));
    assert!(guard.checkpoint(catalog::RECURSION_DEPTH).is_ok());
}

#[test]
fn test_retuned_table_changes_verdicts() {
    let mut table = reference_table();
    table
        .retune(catalog::RECURSION_DEPTH, Threshold::constant(5))
        .unwrap();

    let guard = Guard::new(&table, sizes(&[]));
    let depth = guard.checkpoint(catalog::RECURSION_DEPTH).unwrap();
    assert!(depth.check(5u32).is_ok());
    assert!(depth.check(6u32).is_err());
}
