//! Error types for tabregress operations

use crate::report::MismatchReport;
use crate::table::ColumnKind;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegressionError>;

#[derive(Error, Debug)]
pub enum RegressionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error(
        "Could not find key '{column}' in the expected results.\n\
         Keys in the obtained data table: [{}]\n\
         Keys in the expected data table: [{}]\n\
         To update values, use --force-regen option.",
        format_keys(.obtained_columns),
        format_keys(.expected_columns)
    )]
    MissingColumn {
        column: String,
        obtained_columns: Vec<String>,
        expected_columns: Vec<String>,
    },

    #[error(
        "Data type for data {column} of obtained and expected are not the same.\n\
         Obtained: {obtained}\n\
         Expected: {expected}"
    )]
    TypeMismatch {
        column: String,
        obtained: ColumnKind,
        expected: ColumnKind,
    },

    #[error("Shape mismatch: {message}")]
    ShapeMismatch { message: String },

    #[error("Invalid tolerance policy: {message}")]
    InvalidPolicy { message: String },

    #[error("{report}")]
    ValuesMismatch { report: MismatchReport },

    #[error("File not found in data directory, created:\n- {}", .path.display())]
    SnapshotCreated { path: PathBuf },

    #[error("Files differ and --force-regen set, regenerating file at:\n- {}", .path.display())]
    SnapshotRegenerated { path: PathBuf },

    #[error("Invalid snapshot '{}': {message}", .path.display())]
    InvalidSnapshot { path: PathBuf, message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl RegressionError {
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            message: msg.into(),
        }
    }

    pub fn invalid_policy(msg: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            message: msg.into(),
        }
    }

    pub fn invalid_snapshot(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    /// Whether this error means the obtained data disagrees with the snapshot,
    /// as opposed to a broken configuration or an I/O failure.
    pub fn is_comparison_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::TypeMismatch { .. }
                | Self::ShapeMismatch { .. }
                | Self::ValuesMismatch { .. }
        )
    }
}

fn format_keys(keys: &[String]) -> String {
    keys.iter()
        .map(|k| format!("'{}'", k))
        .collect::<Vec<_>>()
        .join(", ")
}
