//! Column-by-column comparison of obtained data against a snapshot

use crate::error::{RegressionError, Result};
use crate::report::{ColumnMismatch, MismatchReport};
use crate::table::{Column, ColumnKind, Scalar, Table};
use crate::tolerance::{CompareOperator, ToleranceConfig, ToleranceSpec};

/// Placeholder diff for generic columns
pub const OBJECT_DIFF_PLACEHOLDER: &str = "?";

/// Whether a missing/missing pair counts as equal, per column kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingRules {
    /// NaN against NaN in numeric columns
    pub float: bool,
    /// Missing marker (or NaN) against missing marker in generic columns
    pub object: bool,
}

impl Default for MissingRules {
    fn default() -> Self {
        Self {
            float: true,
            object: true,
        }
    }
}

impl MissingRules {
    /// Every missing value counts as a mismatch
    pub fn strict() -> Self {
        Self {
            float: false,
            object: false,
        }
    }
}

/// Numeric acceptance rule derived from a validated [`ToleranceSpec`]
#[derive(Debug, Clone, Copy)]
enum NumericRule {
    Close { atol: f64, rtol: f64 },
    AtLeast { offset: f64 },
    AtMost { offset: f64 },
}

impl NumericRule {
    fn from_spec(spec: &ToleranceSpec) -> Result<Self> {
        spec.validate()?;
        Ok(match *spec {
            ToleranceSpec::Closeness {
                absolute_tolerance,
                relative_tolerance,
            } => Self::Close {
                atol: absolute_tolerance,
                rtol: relative_tolerance,
            },
            ToleranceSpec::Directional {
                max_absolute_diff,
                compare_operator: CompareOperator::GreaterEqual,
            } => Self::AtLeast {
                offset: max_absolute_diff,
            },
            ToleranceSpec::Directional {
                max_absolute_diff,
                compare_operator: CompareOperator::LessEqual,
            } => Self::AtMost {
                offset: max_absolute_diff,
            },
        })
    }

    /// Comparisons involving NaN are false, so a lone NaN is never accepted.
    fn accepts(self, obtained: f64, expected: f64) -> bool {
        match self {
            Self::Close { atol, rtol } => {
                obtained == expected || (obtained - expected).abs() <= atol + rtol * expected.abs()
            }
            Self::AtLeast { offset } => obtained >= expected + offset,
            Self::AtMost { offset } => obtained <= expected + offset,
        }
    }

    /// Integer pairs are judged on their exact difference.
    fn accepts_int(self, obtained: i64, expected: i64) -> bool {
        let diff = i128::from(obtained) - i128::from(expected);
        match self {
            Self::Close { atol, rtol } => {
                diff == 0 || diff.unsigned_abs() as f64 <= atol + rtol * (expected as f64).abs()
            }
            Self::AtLeast { offset } => diff as f64 >= offset,
            Self::AtMost { offset } => diff as f64 <= offset,
        }
    }
}

/// Compares two tables under a tolerance configuration
#[derive(Debug, Clone, Default)]
pub struct TabularComparator {
    missing_rules: MissingRules,
}

impl TabularComparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing_rules(missing_rules: MissingRules) -> Self {
        Self { missing_rules }
    }

    pub fn missing_rules(&self) -> MissingRules {
        self.missing_rules
    }

    /// Compare every column of `obtained` with the same-named column of
    /// `expected`.
    ///
    /// Structural problems (missing column, kind or length disagreement,
    /// invalid policy) abort the whole comparison. Value mismatches are
    /// collected across all columns into the returned report.
    pub fn compare(
        &self,
        obtained: &Table,
        expected: &Table,
        config: &ToleranceConfig,
    ) -> Result<MismatchReport> {
        config.validate()?;
        let mut report = MismatchReport::new();

        for (name, obtained_column) in obtained.columns() {
            let expected_column =
                expected
                    .get(name)
                    .ok_or_else(|| RegressionError::MissingColumn {
                        column: name.clone(),
                        obtained_columns: obtained.column_names(),
                        expected_columns: expected.column_names(),
                    })?;

            Self::check_kinds(name, obtained_column, expected_column)?;
            Self::check_shapes(name, obtained_column, expected_column)?;

            let spec = config.resolve(name);
            let mask = self.not_close_mask(name, obtained_column, expected_column, spec)?;

            let mismatching = mask.iter().filter(|m| **m).count();
            log::debug!(
                "Column '{}' ({}): {} of {} values not close",
                name,
                obtained_column.kind(),
                mismatching,
                mask.len()
            );

            if mismatching > 0 {
                let mismatch =
                    Self::build_mismatch(obtained, obtained_column, expected_column, &mask);
                report.insert(name.clone(), mismatch);
            }
        }

        Ok(report)
    }

    fn check_kinds(name: &str, obtained: &Column, expected: &Column) -> Result<()> {
        if obtained.kind().is_comparable_with(expected.kind()) {
            Ok(())
        } else {
            Err(RegressionError::TypeMismatch {
                column: name.to_string(),
                obtained: obtained.kind(),
                expected: expected.kind(),
            })
        }
    }

    fn check_shapes(name: &str, obtained: &Column, expected: &Column) -> Result<()> {
        if obtained.len() == expected.len() {
            Ok(())
        } else {
            Err(RegressionError::shape_mismatch(format!(
                "Obtained and expected data shape are not the same for '{}': obtained {} rows, expected {} rows.",
                name,
                obtained.len(),
                expected.len()
            )))
        }
    }

    /// Element-wise "not close" flags, dispatched on the column kind.
    fn not_close_mask(
        &self,
        name: &str,
        obtained: &Column,
        expected: &Column,
        spec: &ToleranceSpec,
    ) -> Result<Vec<bool>> {
        match (obtained, expected) {
            (Column::Bool(o), Column::Bool(e)) => {
                Ok(o.iter().zip(e).map(|(a, b)| a != b).collect())
            }
            (Column::Object(o), Column::Object(e)) => Ok(o
                .iter()
                .zip(e)
                .map(|(a, b)| self.object_not_close(a, b))
                .collect()),
            _ => self.numeric_not_close(name, obtained, expected, spec),
        }
    }

    fn numeric_not_close(
        &self,
        name: &str,
        obtained: &Column,
        expected: &Column,
        spec: &ToleranceSpec,
    ) -> Result<Vec<bool>> {
        let rule = NumericRule::from_spec(spec)?;
        let nan_pairs_equal = self.missing_rules.float;

        if let (Column::Int(o), Column::Int(e)) = (obtained, expected) {
            return Ok(o
                .iter()
                .zip(e)
                .map(|(a, b)| !rule.accepts_int(*a, *b))
                .collect());
        }

        (0..obtained.len())
            .map(|i| {
                match (obtained.get_f64(i), expected.get_f64(i)) {
                    (Some(o), Some(e)) => {
                        if o.is_nan() && e.is_nan() {
                            Ok(!nan_pairs_equal)
                        } else {
                            Ok(!rule.accepts(o, e))
                        }
                    }
                    _ => Err(RegressionError::TypeMismatch {
                        column: name.to_string(),
                        obtained: obtained.kind(),
                        expected: expected.kind(),
                    }),
                }
            })
            .collect()
    }

    fn object_not_close(&self, obtained: &Scalar, expected: &Scalar) -> bool {
        if obtained.is_missing() && expected.is_missing() {
            return !self.missing_rules.object;
        }
        !obtained.loosely_equals(expected)
    }

    fn build_mismatch(
        obtained_table: &Table,
        obtained: &Column,
        expected: &Column,
        mask: &[bool],
    ) -> ColumnMismatch {
        let kind = report_kind(obtained.kind(), expected.kind());
        let mut mismatch = ColumnMismatch::new(kind);

        for (row, _) in mask.iter().enumerate().filter(|(_, m)| **m) {
            let o = obtained.get(row).unwrap_or(Scalar::Missing);
            let e = expected.get(row).unwrap_or(Scalar::Missing);
            let diff = element_diff(kind, &o, &e);
            mismatch.push(obtained_table.row_label(row), o, e, diff);
        }

        mismatch
    }
}

/// Compare with the default missing rules
pub fn compare(
    obtained: &Table,
    expected: &Table,
    config: &ToleranceConfig,
) -> Result<MismatchReport> {
    TabularComparator::new().compare(obtained, expected, config)
}

/// Kind a column pair is reported under; mixed int/float pairs are floats.
fn report_kind(obtained: ColumnKind, expected: ColumnKind) -> ColumnKind {
    if obtained == ColumnKind::Int && expected == ColumnKind::Int {
        ColumnKind::Int
    } else if obtained.is_numeric() {
        ColumnKind::Float
    } else {
        obtained
    }
}

fn element_diff(kind: ColumnKind, obtained: &Scalar, expected: &Scalar) -> Scalar {
    match (kind, obtained, expected) {
        (ColumnKind::Bool, Scalar::Bool(a), Scalar::Bool(b)) => Scalar::Bool(a ^ b),
        (ColumnKind::Object, _, _) => Scalar::Text(OBJECT_DIFF_PLACEHOLDER.to_string()),
        (ColumnKind::Int, Scalar::Int(a), Scalar::Int(b)) => match i64::try_from(a.abs_diff(*b)) {
            Ok(d) => Scalar::Int(d),
            Err(_) => Scalar::Float((*a as f64 - *b as f64).abs()),
        },
        _ => match (obtained.as_f64(), expected.as_f64()) {
            (Some(a), Some(b)) => Scalar::Float((a - b).abs()),
            _ => Scalar::Missing,
        },
    }
}
