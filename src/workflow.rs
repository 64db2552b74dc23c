//! Snapshot regression checks: create, compare, regenerate

use crate::comparator::{MissingRules, TabularComparator};
use crate::error::{RegressionError, Result};
use crate::snapshot::{fingerprint, obtained_path, SnapshotLoader, SnapshotWriter, SNAPSHOT_EXTENSION};
use crate::table::Table;
use crate::tolerance::{ToleranceConfig, ToleranceSpec};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Run-wide switches, the equivalent of command-line flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegressionSettings {
    /// Overwrite snapshots that differ, still failing the check
    pub force_regen: bool,
    /// Overwrite every snapshot and let the check pass
    pub regen_all: bool,
}

/// Per-check options
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub tolerances: IndexMap<String, ToleranceSpec>,
    pub default_tolerance: Option<ToleranceSpec>,
    /// Makes the default policy directional (`"<="` or `">="`)
    pub compare_operator: Option<String>,
    pub max_absolute_diff: f64,
    pub fill_different_shape_with_nan: bool,
    pub data_index: Option<Vec<i64>>,
    pub missing_rules: MissingRules,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            tolerances: IndexMap::new(),
            default_tolerance: None,
            compare_operator: None,
            max_absolute_diff: 0.0,
            fill_different_shape_with_nan: true,
            data_index: None,
            missing_rules: MissingRules::default(),
        }
    }
}

impl CheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directional default policy, as used by relative-numeric checks
    pub fn directional(compare_operator: &str, max_absolute_diff: f64) -> Self {
        Self {
            compare_operator: Some(compare_operator.to_string()),
            max_absolute_diff,
            ..Self::default()
        }
    }

    pub fn with_default_tolerance(mut self, spec: ToleranceSpec) -> Self {
        self.default_tolerance = Some(spec);
        self
    }

    pub fn with_tolerance(mut self, column: impl Into<String>, spec: ToleranceSpec) -> Self {
        self.tolerances.insert(column.into(), spec);
        self
    }

    pub fn with_data_index(mut self, index: Vec<i64>) -> Self {
        self.data_index = Some(index);
        self
    }

    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill_different_shape_with_nan = fill;
        self
    }

    /// Build and validate the tolerance configuration.
    ///
    /// A compare operator takes precedence over `default_tolerance`.
    pub fn tolerance_config(&self) -> Result<ToleranceConfig> {
        let default = match &self.compare_operator {
            Some(op) => {
                if self.default_tolerance.is_some() {
                    log::warn!(
                        "compare_operator '{}' overrides the default tolerance",
                        op
                    );
                }
                ToleranceSpec::directional(op, self.max_absolute_diff)?
            }
            None => self.default_tolerance.unwrap_or_default(),
        };

        let config = ToleranceConfig {
            default,
            columns: self.tolerances.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Compares obtained tables against snapshot files
#[derive(Debug, Clone, Default)]
pub struct RegressionWorkflow {
    settings: RegressionSettings,
}

impl RegressionWorkflow {
    pub fn new(settings: RegressionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> RegressionSettings {
        self.settings
    }

    /// Check `data` against the snapshot at `snapshot_path`.
    ///
    /// A missing snapshot is written and reported as a failure so that the
    /// new file gets reviewed; with `regen_all` it is written and the check
    /// passes.
    pub fn check(&self, data: Table, snapshot_path: &Path, options: &CheckOptions) -> Result<()> {
        let config = options.tolerance_config()?;
        let mut obtained = data.equalize_lengths(options.fill_different_shape_with_nan)?;
        if let Some(index) = &options.data_index {
            obtained.set_index(index.clone())?;
        }

        if self.settings.regen_all || !snapshot_path.is_file() {
            SnapshotWriter::save(snapshot_path, &obtained)?;
            if self.settings.regen_all {
                log::info!("Regenerated snapshot: {}", snapshot_path.display());
                return Ok(());
            }
            log::info!("Created snapshot: {}", snapshot_path.display());
            return Err(RegressionError::SnapshotCreated {
                path: snapshot_path.to_path_buf(),
            });
        }

        let obtained_file = obtained_path(snapshot_path);
        SnapshotWriter::save(&obtained_file, &obtained)?;

        match self.compare_files(&obtained_file, snapshot_path, &obtained, options, &config) {
            Ok(()) => {
                fs::remove_file(&obtained_file)?;
                Ok(())
            }
            Err(err) if err.is_comparison_failure() && self.settings.force_regen => {
                log::info!("Regenerating snapshot after failure: {}", err);
                SnapshotWriter::save(snapshot_path, &obtained)?;
                fs::remove_file(&obtained_file)?;
                Err(RegressionError::SnapshotRegenerated {
                    path: snapshot_path.to_path_buf(),
                })
            }
            Err(err) => Err(err),
        }
    }

    fn compare_files(
        &self,
        obtained_file: &Path,
        snapshot_path: &Path,
        obtained: &Table,
        options: &CheckOptions,
        config: &ToleranceConfig,
    ) -> Result<()> {
        if fingerprint(obtained_file)? == fingerprint(snapshot_path)? {
            log::debug!("{} is byte-identical to the obtained data", snapshot_path.display());
            return Ok(());
        }

        // Both sides go through the same CSV round trip so kinds line up.
        let mut obtained_loaded = SnapshotLoader::load(obtained_file)?;
        if let Some(index) = obtained.index() {
            obtained_loaded.set_index(index.to_vec())?;
        }
        let expected = SnapshotLoader::load(snapshot_path)?;

        let comparator = TabularComparator::with_missing_rules(options.missing_rules);
        let report = comparator.compare(&obtained_loaded, &expected, config)?;
        if report.is_empty() {
            Ok(())
        } else {
            log::debug!(
                "{} values differ across {} columns",
                report.total_mismatches(),
                report.len()
            );
            Err(RegressionError::ValuesMismatch { report })
        }
    }
}

/// Resolves snapshot files by basename inside a data directory
#[derive(Debug, Clone)]
pub struct RegressionFixture {
    datadir: PathBuf,
    workflow: RegressionWorkflow,
}

impl RegressionFixture {
    pub fn new(datadir: impl Into<PathBuf>, settings: RegressionSettings) -> Self {
        Self {
            datadir: datadir.into(),
            workflow: RegressionWorkflow::new(settings),
        }
    }

    pub fn datadir(&self) -> &Path {
        &self.datadir
    }

    pub fn snapshot_path(&self, basename: &str) -> PathBuf {
        self.datadir
            .join(format!("{}.{}", basename, SNAPSHOT_EXTENSION))
    }

    pub fn check(&self, basename: &str, data: Table, options: &CheckOptions) -> Result<()> {
        let path = self.snapshot_path(basename);
        self.workflow.check(data, &path, options)
    }

    /// Check under a directional policy
    pub fn check_relative(
        &self,
        basename: &str,
        data: Table,
        compare_operator: &str,
        max_absolute_diff: f64,
    ) -> Result<()> {
        let options = CheckOptions::directional(compare_operator, max_absolute_diff);
        self.check(basename, data, &options)
    }
}
