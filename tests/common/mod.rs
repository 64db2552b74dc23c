//! Common test utilities and helpers

use std::fs;
use std::path::{Path, PathBuf};
use tabregress::{RegressionFixture, RegressionSettings, Result};
use tempfile::TempDir;

/// Test fixture manager for creating temporary data directories
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Get the root path of the test fixture
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Snapshot path for `basename` inside the fixture
    pub fn snapshot_path(&self, basename: &str) -> PathBuf {
        self.root().join(format!("{}.csv", basename))
    }

    /// Regression fixture rooted at the temp directory
    pub fn regression(&self, settings: RegressionSettings) -> RegressionFixture {
        RegressionFixture::new(self.root(), settings)
    }

    /// Write raw CSV rows to `name`
    pub fn write_csv(&self, name: &str, rows: &[&str]) -> Result<PathBuf> {
        let path = self.root().join(name);
        let mut content = rows.join("\n");
        content.push('\n');
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }
}

/// Settings that neither regenerate nor force
pub fn default_settings() -> RegressionSettings {
    RegressionSettings::default()
}

pub fn force_regen() -> RegressionSettings {
    RegressionSettings {
        force_regen: true,
        regen_all: false,
    }
}

pub fn regen_all() -> RegressionSettings {
    RegressionSettings {
        force_regen: false,
        regen_all: true,
    }
}
