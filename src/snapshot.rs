//! Snapshot persistence: CSV writing, loading and fingerprints

use crate::data::DataProcessor;
use crate::error::{RegressionError, Result};
use crate::table::{format_float, Column, ColumnKind, Scalar, Table};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension used for snapshots
pub const SNAPSHOT_EXTENSION: &str = "csv";

/// Suffix inserted before the extension for freshly obtained data
pub const OBTAINED_SUFFIX: &str = ".obtained";

/// Writes tables as CSV snapshots
pub struct SnapshotWriter;

impl SnapshotWriter {
    /// Write `table` to `path`, creating parent directories as needed.
    pub fn save(path: &Path, table: &Table) -> Result<()> {
        let content = Self::to_csv(table)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)?;
        log::debug!("Wrote {} rows to {}", table.num_rows(), path.display());
        Ok(())
    }

    /// Render a table as CSV text with a header row
    pub fn to_csv(table: &Table) -> Result<String> {
        if !table.has_uniform_length() {
            return Err(RegressionError::shape_mismatch(
                "cannot write a table whose columns have different lengths",
            ));
        }
        if table.is_empty() {
            return Ok(String::new());
        }

        let mut content = String::new();

        let headers: Vec<String> = table.columns().map(|(name, _)| escape_cell(name)).collect();
        content.push_str(&headers.join(","));
        content.push('\n');

        let columns: Vec<&Column> = table.columns().map(|(_, col)| col).collect();
        for row in 0..table.num_rows() {
            let cells: Vec<String> = columns.iter().map(|col| format_cell(col, row)).collect();
            content.push_str(&cells.join(","));
            content.push('\n');
        }

        Ok(content)
    }
}

fn format_cell(column: &Column, row: usize) -> String {
    match column.get(row) {
        Some(Scalar::Bool(b)) => b.to_string(),
        Some(Scalar::Int(i)) => i.to_string(),
        Some(Scalar::Float(f)) if f.is_nan() => String::new(),
        Some(Scalar::Float(f)) => format_float(f),
        Some(Scalar::Text(s)) => escape_cell(&s),
        Some(Scalar::Missing) | None => String::new(),
    }
}

fn escape_cell(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Reads CSV snapshots back into tables
pub struct SnapshotLoader;

impl SnapshotLoader {
    pub fn load(path: &Path) -> Result<Table> {
        let processor = DataProcessor::new()?;
        processor.load_csv(path)
    }

    /// Column layout and fingerprint of a snapshot file
    pub fn summary(path: &Path) -> Result<SnapshotSummary> {
        let table = Self::load(path)?;
        Ok(SnapshotSummary {
            path: path.to_path_buf(),
            fingerprint: fingerprint(path)?,
            row_count: table.num_rows(),
            columns: table
                .columns()
                .map(|(name, col)| ColumnSummary {
                    name: name.clone(),
                    kind: col.kind(),
                })
                .collect(),
        })
    }
}

/// Description of a stored snapshot
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotSummary {
    pub path: PathBuf,
    pub fingerprint: String,
    pub row_count: usize,
    pub columns: Vec<ColumnSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
}

/// blake3 digest of a file's bytes, as hex
pub fn fingerprint(path: &Path) -> Result<String> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&fs::read(path)?);
    Ok(hasher.finalize().to_hex().to_string())
}

/// `dir/name.csv` -> `dir/name.obtained.csv`
pub fn obtained_path(snapshot_path: &Path) -> PathBuf {
    let stem = snapshot_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = snapshot_path
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| SNAPSHOT_EXTENSION.to_string());
    snapshot_path.with_file_name(format!("{}{}.{}", stem, OBTAINED_SUFFIX, extension))
}
