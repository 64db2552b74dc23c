//! Property checks for tolerance laws

use proptest::prelude::*;
use tabregress::comparator::compare;
use tabregress::{Table, ToleranceConfig, ToleranceSpec};

fn single(values: Vec<f64>) -> Table {
    Table::new().with_column("x", values)
}

proptest! {
    #[test]
    fn prop_table_matches_itself(values in prop::collection::vec(-1e6f64..1e6, 0..64)) {
        let table = single(values);
        let report = compare(&table, &table, &ToleranceConfig::default()).unwrap();
        prop_assert!(report.is_empty());
    }

    #[test]
    fn prop_shift_within_atol_passes(
        values in prop::collection::vec(-1e3f64..1e3, 1..64),
        shift in -0.5f64..0.5,
    ) {
        let shifted: Vec<f64> = values.iter().map(|v| v + shift).collect();
        let config = ToleranceConfig::new(ToleranceSpec::closeness(0.5 + 1e-9, 0.0));
        let report = compare(&single(shifted), &single(values), &config).unwrap();
        prop_assert!(report.is_empty());
    }

    #[test]
    fn prop_at_least_flags_exactly_the_low_values(
        obtained in prop::collection::vec(-100i32..100, 1..64),
        expected in -100i32..100,
        bound in -10i32..=0,
    ) {
        let n = obtained.len();
        let obtained_f: Vec<f64> = obtained.iter().map(|v| f64::from(*v)).collect();
        let config = ToleranceConfig::new(
            ToleranceSpec::directional(">=", f64::from(bound)).unwrap(),
        );

        let report = compare(
            &single(obtained_f),
            &single(vec![f64::from(expected); n]),
            &config,
        )
        .unwrap();

        let want: Vec<i64> = obtained
            .iter()
            .enumerate()
            .filter(|(_, v)| **v < expected + bound)
            .map(|(i, _)| i as i64)
            .collect();
        let got = report.get("x").map(|m| m.row_indices.clone()).unwrap_or_default();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn prop_at_most_flags_exactly_the_high_values(
        obtained in prop::collection::vec(-100i32..100, 1..64),
        expected in -100i32..100,
        bound in 0i32..=10,
    ) {
        let n = obtained.len();
        let obtained_f: Vec<f64> = obtained.iter().map(|v| f64::from(*v)).collect();
        let config = ToleranceConfig::new(
            ToleranceSpec::directional("<=", f64::from(bound)).unwrap(),
        );

        let report = compare(
            &single(obtained_f),
            &single(vec![f64::from(expected); n]),
            &config,
        )
        .unwrap();

        let want: Vec<i64> = obtained
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > expected + bound)
            .map(|(i, _)| i as i64)
            .collect();
        let got = report.get("x").map(|m| m.row_indices.clone()).unwrap_or_default();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn prop_bool_columns_match_only_where_equal(
        pairs in prop::collection::vec((any::<bool>(), any::<bool>()), 0..64),
    ) {
        let (obtained, expected): (Vec<bool>, Vec<bool>) = pairs.iter().copied().unzip();
        let report = compare(
            &Table::new().with_column("flag", obtained),
            &Table::new().with_column("flag", expected),
            &ToleranceConfig::new(ToleranceSpec::closeness(1.0, 1.0)),
        )
        .unwrap();

        let want: Vec<i64> = pairs
            .iter()
            .enumerate()
            .filter(|(_, (o, e))| o != e)
            .map(|(i, _)| i as i64)
            .collect();
        let got = report.get("flag").map(|m| m.row_indices.clone()).unwrap_or_default();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn prop_distinct_large_ints_never_match_exactly(
        base in (1i64 << 53)..i64::MAX - 16,
        delta in 1i64..16,
    ) {
        let report = compare(
            &Table::new().with_column("n", vec![base + delta]),
            &Table::new().with_column("n", vec![base]),
            &ToleranceConfig::default(),
        )
        .unwrap();
        prop_assert_eq!(report.total_mismatches(), 1);
    }

    #[test]
    fn prop_wrong_sign_bound_always_rejected(bound in 1e-6f64..1e6) {
        let table = single(vec![1.0]);
        let at_least = ToleranceConfig::new(ToleranceSpec::directional(">=", bound).unwrap());
        let at_most = ToleranceConfig::new(ToleranceSpec::directional("<=", -bound).unwrap());
        prop_assert!(compare(&table, &table, &at_least).is_err());
        prop_assert!(compare(&table, &table, &at_most).is_err());
    }
}
