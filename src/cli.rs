//! Command-line interface for tabregress

use crate::error::Result;
use crate::tolerance::{ToleranceConfig, ToleranceSpec};
use crate::workflow::{CheckOptions, RegressionSettings};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tabregress")]
#[command(about = "Regression checks of tabular data against CSV snapshots")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check obtained data against a snapshot, creating it when missing
    Check {
        /// CSV file with the freshly obtained data
        obtained: PathBuf,

        /// Snapshot file to compare against
        #[arg(long)]
        snapshot: PathBuf,

        #[command(flatten)]
        tolerance: ToleranceArgs,

        /// Regenerate the snapshot when it differs, still failing the check
        #[arg(long)]
        force_regen: bool,

        /// Regenerate the snapshot unconditionally and pass
        #[arg(long)]
        regen_all: bool,

        /// Print mismatches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two CSV files without touching either
    Compare {
        /// CSV file with the obtained data
        obtained: PathBuf,

        /// CSV file with the expected data
        expected: PathBuf,

        #[command(flatten)]
        tolerance: ToleranceArgs,

        /// Print mismatches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show snapshot columns, kinds and fingerprint
    Show {
        /// Snapshot file to display
        snapshot: PathBuf,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },
}

impl Cli {
    /// Logger filter: Info, or Debug with `--verbose`
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}

/// Tolerance flags shared by `check` and `compare`
#[derive(Args, Debug, Clone, Default)]
pub struct ToleranceArgs {
    /// JSON file with per-column tolerances and an optional default
    #[arg(long)]
    pub tolerances: Option<PathBuf>,

    /// Default absolute tolerance
    #[arg(long, allow_hyphen_values = true)]
    pub atol: Option<f64>,

    /// Default relative tolerance
    #[arg(long, allow_hyphen_values = true)]
    pub rtol: Option<f64>,

    /// Directional comparison: "<=" or ">="
    #[arg(long)]
    pub compare_operator: Option<String>,

    /// Signed bound for the directional comparison
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pub max_absolute_diff: f64,
}

impl ToleranceArgs {
    /// Merge the tolerance file with the flags; flags win for the default.
    pub fn to_check_options(&self) -> Result<CheckOptions> {
        let file_config = match &self.tolerances {
            Some(path) => Some(ToleranceConfig::from_path(path)?),
            None => None,
        };

        let mut options = CheckOptions::new();
        if let Some(config) = &file_config {
            options.tolerances = config.columns.clone();
            options.default_tolerance = Some(config.default);
        }
        if self.atol.is_some() || self.rtol.is_some() {
            options.default_tolerance = Some(ToleranceSpec::closeness(
                self.atol.unwrap_or(0.0),
                self.rtol.unwrap_or(0.0),
            ));
        }
        options.compare_operator = self.compare_operator.clone();
        options.max_absolute_diff = self.max_absolute_diff;
        Ok(options)
    }
}

impl Commands {
    pub fn settings(&self) -> RegressionSettings {
        match self {
            Commands::Check {
                force_regen,
                regen_all,
                ..
            } => RegressionSettings {
                force_regen: *force_regen,
                regen_all: *regen_all,
            },
            _ => RegressionSettings::default(),
        }
    }
}

/// Parse output format string
#[derive(Debug, Clone)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}
