//! Command implementations for tabregress CLI

use crate::cli::{Commands, OutputFormat, ToleranceArgs};
use crate::comparator::TabularComparator;
use crate::error::{RegressionError, Result};
use crate::output::{JsonFormatter, PrettyPrinter};
use crate::snapshot::SnapshotLoader;
use crate::workflow::RegressionWorkflow;
use std::path::Path;

/// Execute a command
pub fn execute_command(command: Commands) -> Result<()> {
    let settings = command.settings();
    match command {
        Commands::Check {
            obtained,
            snapshot,
            tolerance,
            json,
            ..
        } => check_command(RegressionWorkflow::new(settings), &obtained, &snapshot, &tolerance, json),
        Commands::Compare {
            obtained,
            expected,
            tolerance,
            json,
        } => compare_command(&obtained, &expected, &tolerance, json),
        Commands::Show { snapshot, format } => show_command(&snapshot, &format),
    }
}

/// Check an obtained CSV against its snapshot
fn check_command(
    workflow: RegressionWorkflow,
    obtained: &Path,
    snapshot: &Path,
    tolerance: &ToleranceArgs,
    json: bool,
) -> Result<()> {
    let options = tolerance.to_check_options()?;
    let data = SnapshotLoader::load(obtained)?;

    log::debug!(
        "Checking {} ({} rows) against {}",
        obtained.display(),
        data.num_rows(),
        snapshot.display()
    );

    match workflow.check(data, snapshot, &options) {
        Ok(()) => {
            if json {
                println!("{}", JsonFormatter::format(&serde_json::json!({ "passed": true }))?);
            } else {
                println!("✅ {} matches its snapshot", obtained.display());
            }
            Ok(())
        }
        Err(RegressionError::ValuesMismatch { report }) if json => {
            println!("{}", JsonFormatter::format_report(&report)?);
            Err(RegressionError::ValuesMismatch { report })
        }
        Err(err) => Err(err),
    }
}

/// Compare two CSV files directly, leaving both untouched
fn compare_command(obtained: &Path, expected: &Path, tolerance: &ToleranceArgs, json: bool) -> Result<()> {
    let options = tolerance.to_check_options()?;
    let config = options.tolerance_config()?;

    let obtained_table = SnapshotLoader::load(obtained)?;
    let expected_table = SnapshotLoader::load(expected)?;

    let comparator = TabularComparator::with_missing_rules(options.missing_rules);
    let report = comparator.compare(&obtained_table, &expected_table, &config)?;

    if json {
        println!("{}", JsonFormatter::format_report(&report)?);
    } else {
        PrettyPrinter::print_report(&report);
    }

    if report.is_empty() {
        Ok(())
    } else {
        Err(RegressionError::ValuesMismatch { report })
    }
}

/// Show snapshot information
fn show_command(snapshot: &Path, format: &str) -> Result<()> {
    let output_format = OutputFormat::parse(format).map_err(RegressionError::invalid_input)?;
    let summary = SnapshotLoader::summary(snapshot)?;

    match output_format {
        OutputFormat::Pretty => PrettyPrinter::print_snapshot_summary(&summary),
        OutputFormat::Json => println!("{}", JsonFormatter::format(&summary)?),
    }

    Ok(())
}
