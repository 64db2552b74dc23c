//! Column-oriented tables compared by the regression fixtures

use crate::error::{RegressionError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element kind shared by every value of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Bool,
    Int,
    Float,
    Object,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Integers and floats compare with each other; every other kind only
    /// compares with itself.
    pub fn is_comparable_with(self, other: ColumnKind) -> bool {
        (self.is_numeric() && other.is_numeric()) || self == other
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int64",
            Self::Float => "float64",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single value of a generic column, or a value pulled out of a typed one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// The missing marker, or a float NaN.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Raw equality with numeric cross-comparison (`1 == 1.0`). Missing
    /// values never equal anything here; callers decide on missing pairs.
    pub fn loosely_equals(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Int(i), Self::Float(f)) | (Self::Float(f), Self::Int(i)) => {
                float_equals_int(*f, *i)
            }
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

/// Exact `f == i`, without rounding `i` through `f64`.
fn float_equals_int(f: f64, i: i64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 && f as i64 == i
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("NaN"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => f.write_str(&format_float(*v)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Shortest representation that parses back to the same float
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:?}", value)
    }
}

/// Homogeneous sequence of values
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    Float(Vec<f64>),
    Object(Vec<Scalar>),
}

impl Column {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Bool(_) => ColumnKind::Bool,
            Self::Int(_) => ColumnKind::Int,
            Self::Float(_) => ColumnKind::Float,
            Self::Object(_) => ColumnKind::Object,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Object(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `row` as a scalar; `None` past the end.
    pub fn get(&self, row: usize) -> Option<Scalar> {
        match self {
            Self::Bool(v) => v.get(row).map(|b| Scalar::Bool(*b)),
            Self::Int(v) => v.get(row).map(|i| Scalar::Int(*i)),
            Self::Float(v) => v.get(row).map(|f| Scalar::Float(*f)),
            Self::Object(v) => v.get(row).cloned(),
        }
    }

    /// Numeric value at `row`; `None` for non-numeric columns.
    pub fn get_f64(&self, row: usize) -> Option<f64> {
        match self {
            Self::Int(v) => v.get(row).map(|i| *i as f64),
            Self::Float(v) => v.get(row).copied(),
            _ => None,
        }
    }

    /// Extend the column to `len` rows with the missing sentinel of its kind.
    ///
    /// Integers have no sentinel of their own and are promoted to floats;
    /// booleans become a generic column.
    pub fn padded_to(self, len: usize) -> Column {
        if self.len() >= len {
            return self;
        }
        match self {
            Self::Float(mut v) => {
                v.resize(len, f64::NAN);
                Self::Float(v)
            }
            Self::Int(v) => {
                let mut floats: Vec<f64> = v.into_iter().map(|i| i as f64).collect();
                floats.resize(len, f64::NAN);
                Self::Float(floats)
            }
            Self::Bool(v) => {
                let mut values: Vec<Scalar> = v.into_iter().map(Scalar::Bool).collect();
                values.resize(len, Scalar::Missing);
                Self::Object(values)
            }
            Self::Object(mut v) => {
                v.resize(len, Scalar::Missing);
                Self::Object(v)
            }
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Self::Float(values)
    }
}

impl From<Vec<i64>> for Column {
    fn from(values: Vec<i64>) -> Self {
        Self::Int(values)
    }
}

impl From<Vec<bool>> for Column {
    fn from(values: Vec<bool>) -> Self {
        Self::Bool(values)
    }
}

impl From<Vec<Scalar>> for Column {
    fn from(values: Vec<Scalar>) -> Self {
        Self::Object(values)
    }
}

impl From<Vec<&str>> for Column {
    fn from(values: Vec<&str>) -> Self {
        Self::Object(values.into_iter().map(Scalar::from).collect())
    }
}

/// Ordered mapping from column name to column, with an optional row index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: IndexMap<String, Column>,
    index: Option<Vec<i64>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Self {
        self.insert(name, column);
        self
    }

    /// Insert or replace a column, keeping the position of a replaced one
    pub fn insert(&mut self, name: impl Into<String>, column: impl Into<Column>) {
        self.columns.insert(name.into(), column.into());
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&String, &Column)> {
        self.columns.iter()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Row count, taken from the longest column
    pub fn num_rows(&self) -> usize {
        self.columns.values().map(Column::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Attach row labels used when reporting mismatching rows
    pub fn with_index(mut self, index: Vec<i64>) -> Result<Self> {
        self.set_index(index)?;
        Ok(self)
    }

    pub fn set_index(&mut self, index: Vec<i64>) -> Result<()> {
        let rows = self.num_rows();
        if !self.columns.is_empty() && index.len() != rows {
            return Err(RegressionError::shape_mismatch(format!(
                "data_index has {} labels but the table has {} rows",
                index.len(),
                rows
            )));
        }
        self.index = Some(index);
        Ok(())
    }

    pub fn index(&self) -> Option<&[i64]> {
        self.index.as_deref()
    }

    /// Label of the row at `position`
    pub fn row_label(&self, position: usize) -> i64 {
        self.index
            .as_ref()
            .and_then(|idx| idx.get(position).copied())
            .unwrap_or(position as i64)
    }

    pub fn has_uniform_length(&self) -> bool {
        let mut lengths = self.columns.values().map(Column::len);
        match lengths.next() {
            Some(first) => lengths.all(|len| len == first),
            None => true,
        }
    }

    /// Make every column the same length.
    ///
    /// With `fill_missing`, shorter columns are padded with the missing
    /// sentinel of their kind; otherwise uneven lengths are rejected.
    pub fn equalize_lengths(self, fill_missing: bool) -> Result<Table> {
        if self.has_uniform_length() {
            return Ok(self);
        }
        if !fill_missing {
            let lengths = self
                .columns
                .iter()
                .map(|(name, col)| format!("'{}': {}", name, col.len()))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(RegressionError::shape_mismatch(format!(
                "Data dict with different array lengths will not be accepted ({}). \
                 Try setting fill_different_shape_with_nan=True.",
                lengths
            )));
        }

        let rows = self.num_rows();
        log::debug!("Padding uneven columns to {} rows", rows);
        let columns = self
            .columns
            .into_iter()
            .map(|(name, col)| (name, col.padded_to(rows)))
            .collect();
        Ok(Table {
            columns,
            index: self.index,
        })
    }
}

impl<S: Into<String>> FromIterator<(S, Column)> for Table {
    fn from_iter<I: IntoIterator<Item = (S, Column)>>(iter: I) -> Self {
        Table {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            index: None,
        }
    }
}
