//! Metric extraction reads host state without changing it.

use perfguard::catalog::reference_table;
use perfguard::metric;
use perfguard::{demo, Counters, Guard, Metric, SizeParams};
use proptest::prelude::*;

fn values() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(any::<i64>(), 0..64)
}

proptest! {
    /// Extractors leave the slice exactly as they found it.
    #[test]
    fn prop_extractors_do_not_mutate(vals in values(), modulus in 0u64..50) {
        let before = vals.clone();
        let _ = metric::max_bucket(&vals, modulus);
        let _ = metric::max_frequency(&vals);
        let _ = metric::distinct(&vals);
        let _ = metric::max_magnitude(&vals);
        let _ = metric::sum_of(&vals);
        let _ = metric::ratio_where(&vals, |&v| v > 0);
        prop_assert_eq!(vals, before);
    }

    /// A pass-path checkpoint leaves the host's counters untouched.
    #[test]
    fn prop_checkpoint_does_not_touch_counters(ops in 0u64..1000, depth in 0u32..40) {
        let mut ctx = Counters::new();
        ctx.tick_by(ops);
        for _ in 0..depth {
            ctx.enter();
        }
        let snapshot = ctx.clone();

        let table = reference_table();
        let guard = Guard::new(&table, SizeParams::new());
        let cp = guard.checkpoint(perfguard::catalog::RECURSION_DEPTH).unwrap();
        prop_assert!(cp.check(metric::depth(&ctx)).is_ok());
        prop_assert_eq!(ctx, snapshot);
    }

    /// Every value lands in exactly one occupied bucket below the modulus.
    #[test]
    fn prop_histogram_accounts_for_every_value(vals in values(), modulus in any::<u64>()) {
        let buckets = metric::histogram(&vals, modulus);
        prop_assert_eq!(buckets.values().sum::<usize>(), vals.len());
        prop_assert!(buckets.values().all(|&c| c > 0));
        prop_assert!(buckets.keys().all(|&b| b < modulus.max(1)));
        prop_assert_eq!(
            metric::max_bucket(&vals, modulus),
            buckets.values().copied().max().unwrap_or(0)
        );
    }

    /// Ratios read between 0 and 1.
    #[test]
    fn prop_ratio_in_unit_interval(vals in values()) {
        let share = metric::ratio_where(&vals, |&v| v % 3 == 0);
        let reading = share.as_f64();
        prop_assert!((0.0..=1.0).contains(&reading));
        if let Metric::Ratio { part, whole } = share {
            prop_assert!(part <= whole);
        }
    }

    /// No checkpoint after the failing one runs: the pass counter stops at
    /// the last depth within the limit.
    #[test]
    fn prop_recursion_counter_stops_at_violation(n in 0u64..120) {
        let table = reference_table();
        let mut ctx = Counters::new();
        let result = demo::recursive_sum(&table, n, &mut ctx).unwrap();

        if n < 50 {
            prop_assert_eq!(result.unwrap(), n * (n + 1) / 2);
            prop_assert_eq!(ctx.operations(), n + 1);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(ctx.operations(), 50);
        }
        prop_assert_eq!(ctx.depth(), 0);
    }
}
