//! Evaluator verdicts for the documented scenarios and the edges around them.

use super::common::{captured_diagnostic, density_invariant, depth_invariant, ratio_invariant, sizes};
use perfguard::metric;
use perfguard::{
    evaluate, Category, DiagnosticFormat, Metric, Predicate, Scalar, Threshold, Verdict,
    DIAGNOSTIC_PREFIX,
};

// ============================================================================
// SCENARIOS
// ============================================================================

/// Fullest bucket of 12 against `n / 10` with n = 100 fails (12 >= 10).
#[test]
fn test_scenario_bucket_density_fails() {
    let inv = density_invariant();
    let violation = inv.check(12, &sizes(&[("n", 100)])).unwrap_err();

    assert_eq!(violation.category, Category::Density);
    assert_eq!(violation.threshold, Scalar::Int(10));

    let line = captured_diagnostic(&violation, DiagnosticFormat::Text);
    assert_eq!(line.lines().count(), 1);
    assert!(line.starts_with(DIAGNOSTIC_PREFIX));
    assert!(line.contains("bucket-density: 12 >= 10"), "got {:?}", line);
}

/// Same count at 8 passes.
#[test]
fn test_scenario_bucket_density_passes() {
    assert!(density_invariant()
        .check(8, &sizes(&[("n", 100)]))
        .is_ok());
}

#[test]
fn test_density_fixture_matches_its_text_form() {
    assert_eq!(
        density_invariant().threshold,
        Threshold::parse("n / 10").unwrap()
    );
}

/// Depth 51 against `depth > 50` fails.
#[test]
fn test_scenario_depth_51_fails() {
    let violation = depth_invariant(50).check(51u32, &sizes(&[])).unwrap_err();
    assert_eq!(violation.category, Category::RecursionDepth);
}

/// Depth 50 against the same strict policy passes.
#[test]
fn test_scenario_depth_50_passes() {
    assert!(depth_invariant(50).check(50u32, &sizes(&[])).is_ok());
}

/// Near-limit share 0.81 against `> 0.8` fails, 0.79 passes.
#[test]
fn test_scenario_ratio() {
    let inv = ratio_invariant(0.8);
    assert!(inv.check(0.81, &sizes(&[])).is_err());
    assert!(inv.check(0.79, &sizes(&[])).is_ok());

    // Same numbers as exact counts
    assert!(inv.check(metric::ratio(81, 100), &sizes(&[])).is_err());
    assert!(inv.check(metric::ratio(79, 100), &sizes(&[])).is_ok());
    assert!(inv.check(metric::ratio(80, 100), &sizes(&[])).is_ok());
}

// ============================================================================
// BOUNDARIES
// ============================================================================

#[test]
fn test_boundary_is_per_predicate() {
    let at = Metric::from(10);
    let bound = Scalar::Int(10);
    assert_eq!(evaluate(at, Predicate::GT, bound), Verdict::Pass);
    assert_eq!(evaluate(at, Predicate::GE, bound), Verdict::Fail);
    assert_eq!(evaluate(at, Predicate::LT, bound), Verdict::Pass);
    assert_eq!(evaluate(at, Predicate::LE, bound), Verdict::Fail);
}

#[test]
fn test_falls_below() {
    assert_eq!(evaluate(Metric::from(3), Predicate::LT, Scalar::Int(4)), Verdict::Fail);
    assert_eq!(evaluate(Metric::from(5), Predicate::LT, Scalar::Int(4)), Verdict::Pass);
}

#[test]
fn test_majority() {
    // 2 * 3 > 5
    assert_eq!(
        evaluate(Metric::from(3), Predicate::MoreThanHalfOf, Scalar::Int(5)),
        Verdict::Fail
    );
    // exactly half is not a majority
    assert_eq!(
        evaluate(Metric::from(2), Predicate::MoreThanHalfOf, Scalar::Int(4)),
        Verdict::Pass
    );
}

#[test]
fn test_int_against_float_is_exact() {
    // 2^53 + 1 is not representable as f64; a lossy cast would call it equal
    let big = (1i64 << 53) + 1;
    assert_eq!(
        evaluate(Metric::from(big), Predicate::GT, Scalar::Float((1i64 << 53) as f64)),
        Verdict::Fail
    );
    assert_eq!(
        evaluate(Metric::from(i64::MAX), Predicate::GE, Scalar::Float(9.3e18)),
        Verdict::Pass
    );
}

#[test]
fn test_nan_fails_closed() {
    for predicate in [Predicate::GT, Predicate::GE, Predicate::LT, Predicate::LE] {
        assert_eq!(
            evaluate(Metric::from(f64::NAN), predicate, Scalar::Int(1)),
            Verdict::Fail
        );
        assert_eq!(
            evaluate(Metric::from(1), predicate, Scalar::Float(f64::NAN)),
            Verdict::Fail
        );
    }
}

#[test]
fn test_empty_ratio_reads_as_zero() {
    let empty: [i64; 0] = [];
    let share = metric::ratio_where(&empty, |&v| v > 0);
    assert_eq!(share.as_f64(), 0.0);
    assert!(ratio_invariant(0.8).check(share, &sizes(&[])).is_ok());
}

#[test]
fn test_json_diagnostic_is_one_line() {
    let violation = density_invariant()
        .check(12, &sizes(&[("n", 100)]))
        .unwrap_err();
    let line = captured_diagnostic(&violation, DiagnosticFormat::Json);
    assert_eq!(line.lines().count(), 1);

    let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(value["checkpoint"], "bucket-density");
    assert_eq!(value["category"], "density");
}
