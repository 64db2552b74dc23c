//! Table construction and shape handling

use tabregress::{Column, ColumnKind, RegressionError, Scalar, Table};

#[test]
fn test_columns_keep_insertion_order() {
    let table = Table::new()
        .with_column("zeta", vec![1.0])
        .with_column("alpha", vec![2i64])
        .with_column("mid", vec![true]);

    assert_eq!(table.column_names(), vec!["zeta", "alpha", "mid"]);
    assert_eq!(table.num_columns(), 3);
    assert_eq!(table.num_rows(), 1);
}

#[test]
fn test_kind_compatibility() {
    assert!(ColumnKind::Int.is_comparable_with(ColumnKind::Float));
    assert!(ColumnKind::Float.is_comparable_with(ColumnKind::Int));
    assert!(!ColumnKind::Bool.is_comparable_with(ColumnKind::Int));
    assert!(!ColumnKind::Object.is_comparable_with(ColumnKind::Float));
    assert_eq!(ColumnKind::Float.to_string(), "float64");
}

#[test]
fn test_equalize_pads_with_kind_sentinels() {
    let table = Table::new()
        .with_column("f", vec![1.0, 2.0, 3.0])
        .with_column("i", vec![1i64])
        .with_column("b", vec![true, false])
        .with_column("s", vec!["a"]);

    let padded = table.equalize_lengths(true).unwrap();
    assert!(padded.has_uniform_length());
    assert_eq!(padded.num_rows(), 3);

    assert_eq!(padded.get("i").unwrap().kind(), ColumnKind::Float);
    assert!(padded.get("i").unwrap().get_f64(2).unwrap().is_nan());
    assert_eq!(padded.get("b").unwrap().kind(), ColumnKind::Object);
    assert_eq!(padded.get("b").unwrap().get(2), Some(Scalar::Missing));
    assert_eq!(padded.get("s").unwrap().get(1), Some(Scalar::Missing));
}

#[test]
fn test_equalize_without_fill_rejects_uneven_columns() {
    let table = Table::new()
        .with_column("a", vec![1.0])
        .with_column("b", vec![1.0, 2.0]);

    match table.equalize_lengths(false) {
        Err(RegressionError::ShapeMismatch { message }) => {
            assert!(message.contains("'a': 1"));
            assert!(message.contains("'b': 2"));
        }
        other => panic!("expected ShapeMismatch, got {:?}", other),
    }
}

#[test]
fn test_index_labels_rows() {
    let table = Table::new()
        .with_column("x", vec![1.0, 2.0])
        .with_index(vec![10, 20])
        .unwrap();

    assert_eq!(table.row_label(1), 20);
    assert_eq!(Table::new().with_column("x", vec![1.0]).row_label(0), 0);
}

#[test]
fn test_index_length_must_match() {
    let result = Table::new()
        .with_column("x", vec![1.0, 2.0])
        .with_index(vec![1]);
    assert!(matches!(result, Err(RegressionError::ShapeMismatch { .. })));
}

#[test]
fn test_from_iterator() {
    let table: Table = vec![
        ("a", Column::from(vec![1i64, 2])),
        ("b", Column::from(vec![0.5, 1.5])),
    ]
    .into_iter()
    .collect();
    assert_eq!(table.get("a"), Some(&Column::Int(vec![1, 2])));
    assert!(table.contains("b"));
    assert!(!table.contains("c"));
}

#[test]
fn test_scalar_missing_and_equality() {
    assert!(Scalar::Missing.is_missing());
    assert!(Scalar::Float(f64::NAN).is_missing());
    assert!(Scalar::Int(1).loosely_equals(&Scalar::Float(1.0)));
    assert!(!Scalar::Missing.loosely_equals(&Scalar::Missing));
    assert_eq!(Scalar::Missing.to_string(), "NaN");
}
