//! Output formatting utilities

use crate::error::Result;
use crate::report::MismatchReport;
use crate::snapshot::SnapshotSummary;
use serde_json::json;

/// Pretty printer for tabregress output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print snapshot layout
    pub fn print_snapshot_summary(summary: &SnapshotSummary) {
        println!("📸 Snapshot: {}", summary.path.display());
        println!("├─ Rows: {}", summary.row_count);
        println!("├─ Fingerprint: {}", summary.fingerprint);
        if summary.columns.is_empty() {
            println!("└─ Columns: none");
            return;
        }
        println!("└─ Columns: {}", summary.columns.len());
        for (i, column) in summary.columns.iter().enumerate() {
            let prefix = if i == summary.columns.len() - 1 { "   └─" } else { "   ├─" };
            println!("{} {} ({})", prefix, column.name, column.kind);
        }
    }

    /// Print a comparison outcome
    pub fn print_report(report: &MismatchReport) {
        if report.is_empty() {
            println!("✅ All values are sufficiently close");
            return;
        }

        println!(
            "❌ {} mismatching values in {} columns: {}",
            report.total_mismatches(),
            report.len(),
            report.column_names().join(", ")
        );
        println!();
        println!("{}", report.render());
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Format a report with its pass/fail status
    pub fn format_report(report: &MismatchReport) -> Result<String> {
        let json = json!({
            "passed": report.is_empty(),
            "mismatching_columns": report.column_names(),
            "mismatching_values": report.total_mismatches(),
            "columns": report,
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }
}
