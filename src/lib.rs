//! # tabregress
//!
//! Regression checks for tabular data: obtained tables are compared column by
//! column against CSV snapshots under per-column numeric tolerances, and the
//! snapshots are created or regenerated on request.

pub mod cli;
pub mod error;
pub mod table;
pub mod tolerance;
pub mod comparator;
pub mod report;
pub mod data;
pub mod snapshot;
pub mod workflow;
pub mod commands;
pub mod output;

pub use comparator::{MissingRules, TabularComparator};
pub use error::{RegressionError, Result};
pub use report::{ColumnMismatch, MismatchReport};
pub use table::{Column, ColumnKind, Scalar, Table};
pub use tolerance::{CompareOperator, ToleranceConfig, ToleranceSpec};
pub use workflow::{CheckOptions, RegressionFixture, RegressionSettings, RegressionWorkflow};
