//! End-to-end comparator behavior on realistic columns

use tabregress::comparator::compare;
use tabregress::report::{MISMATCH_HEADER, OBJECT_DIFF_WARNING};
use tabregress::{
    ColumnKind, MissingRules, RegressionError, Scalar, Table, TabularComparator, ToleranceConfig,
    ToleranceSpec,
};

const ROWS: usize = 5000;

fn constant(value: f64) -> Table {
    Table::new().with_column("x", vec![value; ROWS])
}

fn directional(op: &str, diff: f64) -> ToleranceConfig {
    ToleranceConfig::new(ToleranceSpec::directional(op, diff).unwrap())
}

#[test]
fn test_at_least_within_bound_passes() {
    let report = compare(&constant(2.5), &constant(2.1), &directional(">=", -0.1)).unwrap();
    assert!(report.is_empty());
}

#[test]
fn test_at_least_below_bound_fails_everywhere() {
    let report = compare(&constant(2.5), &constant(3.1), &directional(">=", -0.1)).unwrap();
    let mismatch = report.get("x").unwrap();

    assert_eq!(mismatch.len(), ROWS);
    assert_eq!(mismatch.row_indices[0], 0);
    assert_eq!(mismatch.row_indices[ROWS - 1], (ROWS - 1) as i64);
    match mismatch.diffs[0] {
        Scalar::Float(d) => assert!((d - 0.6).abs() < 1e-12),
        ref other => panic!("unexpected diff {:?}", other),
    }
}

#[test]
fn test_at_most_on_the_boundary_passes() {
    let report = compare(&constant(0.6), &constant(0.1), &directional("<=", 0.5)).unwrap();
    assert!(report.is_empty());
}

#[test]
fn test_wrong_sign_bound_fails_regardless_of_data() {
    let err = compare(&constant(2.5), &constant(2.5), &directional(">=", 0.1)).unwrap_err();
    assert!(matches!(err, RegressionError::InvalidPolicy { .. }));

    let err = compare(&Table::new(), &Table::new(), &directional(">=", 0.1)).unwrap_err();
    assert!(matches!(err, RegressionError::InvalidPolicy { .. }));
}

#[test]
fn test_mixed_table_collects_every_failing_column() {
    let obtained = Table::new()
        .with_column("temperature", vec![20.0, 21.0, 22.5])
        .with_column("count", vec![1i64, 2, 3])
        .with_column("ok", vec![true, true, false])
        .with_column("label", vec!["a", "b", "c"]);
    let expected = Table::new()
        .with_column("temperature", vec![20.0, 21.001, 22.0])
        .with_column("count", vec![1i64, 2, 3])
        .with_column("ok", vec![true, false, false])
        .with_column("label", vec!["a", "b", "z"]);
    let config = ToleranceConfig::new(ToleranceSpec::closeness(0.01, 0.0));

    let report = compare(&obtained, &expected, &config).unwrap();
    assert_eq!(report.column_names(), vec!["temperature", "ok", "label"]);
    assert_eq!(report.get("temperature").unwrap().row_indices, vec![2]);
    assert_eq!(report.get("ok").unwrap().kind, ColumnKind::Bool);
    assert_eq!(report.get("label").unwrap().kind, ColumnKind::Object);

    let message = RegressionError::ValuesMismatch { report }.to_string();
    assert!(message.starts_with(MISMATCH_HEADER));
    assert!(message.contains("obtained_temperature"));
    assert!(message.contains("expected_label"));
    assert!(message.ends_with(OBJECT_DIFF_WARNING));
}

#[test]
fn test_structural_error_stops_before_later_columns() {
    let obtained = Table::new()
        .with_column("a", vec![1.0])
        .with_column("b", vec![true]);
    let expected = Table::new()
        .with_column("a", vec![2.0])
        .with_column("b", vec!["yes"]);

    let err = compare(&obtained, &expected, &ToleranceConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        RegressionError::TypeMismatch {
            obtained: ColumnKind::Bool,
            expected: ColumnKind::Object,
            ..
        }
    ));
    assert!(err.to_string().contains("Data type for data b"));
}

#[test]
fn test_missing_column_message_suggests_regeneration() {
    let obtained = Table::new().with_column("new_col", vec![1.0]);
    let expected = Table::new().with_column("old_col", vec![1.0]);

    let message = compare(&obtained, &expected, &ToleranceConfig::default())
        .unwrap_err()
        .to_string();
    assert!(message.contains("Could not find key 'new_col'"));
    assert!(message.contains("'old_col'"));
    assert!(message.contains("--force-regen"));
}

#[test]
fn test_nan_pairs_follow_missing_rules() {
    let obtained = Table::new().with_column("x", vec![f64::NAN, 1.0]);
    let expected = Table::new().with_column("x", vec![f64::NAN, 1.0]);
    let config = directional("<=", 0.0);

    assert!(compare(&obtained, &expected, &config).unwrap().is_empty());

    let strict = TabularComparator::with_missing_rules(MissingRules {
        float: false,
        object: true,
    });
    let report = strict.compare(&obtained, &expected, &config).unwrap();
    assert_eq!(report.get("x").unwrap().row_indices, vec![0]);
}
