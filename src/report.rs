//! Mismatch reports produced by the tabular comparator

use crate::table::{ColumnKind, Scalar};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Header placed before every non-empty report
pub const MISMATCH_HEADER: &str =
    "Values are not sufficiently close.\nTo update values, use --force-regen option.";

/// Appended when a reported column holds generic values
pub const OBJECT_DIFF_WARNING: &str =
    "WARNING: diffs for this kind of data type cannot be computed.";

/// Mismatching elements of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMismatch {
    pub kind: ColumnKind,
    pub row_indices: Vec<i64>,
    pub obtained: Vec<Scalar>,
    pub expected: Vec<Scalar>,
    pub diffs: Vec<Scalar>,
}

impl ColumnMismatch {
    pub fn new(kind: ColumnKind) -> Self {
        Self {
            kind,
            row_indices: Vec::new(),
            obtained: Vec::new(),
            expected: Vec::new(),
            diffs: Vec::new(),
        }
    }

    pub fn push(&mut self, row: i64, obtained: Scalar, expected: Scalar, diff: Scalar) {
        self.row_indices.push(row);
        self.obtained.push(obtained);
        self.expected.push(expected);
        self.diffs.push(diff);
    }

    pub fn len(&self) -> usize {
        self.row_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_indices.is_empty()
    }

    /// Aligned block with the row label, obtained, expected and diff columns
    pub fn render_table(&self, column: &str) -> String {
        let header = vec![
            String::new(),
            format!("obtained_{}", column),
            format!("expected_{}", column),
            "diff".to_string(),
        ];
        let mut rows = vec![header];
        for i in 0..self.len() {
            rows.push(vec![
                self.row_indices[i].to_string(),
                self.obtained[i].to_string(),
                self.expected[i].to_string(),
                self.diffs[i].to_string(),
            ]);
        }

        let mut widths = [0usize; 4];
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        rows.iter()
            .map(|row| {
                let mut line = format!("{:<width$}", row[0], width = widths[0]);
                for (cell, width) in row.iter().zip(widths.iter()).skip(1) {
                    line.push_str("  ");
                    line.push_str(&format!("{:>width$}", cell, width = *width));
                }
                line.trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Per-column mismatches, in the obtained table's column order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MismatchReport {
    columns: IndexMap<String, ColumnMismatch>,
}

impl MismatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, mismatch: ColumnMismatch) {
        self.columns.insert(column.into(), mismatch);
    }

    pub fn get(&self, column: &str) -> Option<&ColumnMismatch> {
        self.columns.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ColumnMismatch)> {
        self.columns.iter()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    /// Number of columns with at least one mismatch
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn total_mismatches(&self) -> usize {
        self.columns.values().map(ColumnMismatch::len).sum()
    }

    pub fn has_object_columns(&self) -> bool {
        self.columns.values().any(|m| m.kind == ColumnKind::Object)
    }

    /// Full failure message; empty for a matching report.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut msg = format!("{}\n\n", MISMATCH_HEADER);
        for (name, mismatch) in &self.columns {
            msg.push_str(&format!("{}:\n{}\n\n", name, mismatch.render_table(name)));
        }
        if self.has_object_columns() {
            msg.push_str(OBJECT_DIFF_WARNING);
        }
        msg
    }
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
