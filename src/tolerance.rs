//! Tolerance policies and per-column resolution

use crate::error::{RegressionError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Direction asserted by a directional policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOperator {
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">=")]
    GreaterEqual,
}

impl CompareOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
        }
    }
}

impl FromStr for CompareOperator {
    type Err = RegressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "<=" => Ok(Self::LessEqual),
            ">=" => Ok(Self::GreaterEqual),
            other => Err(RegressionError::invalid_policy(format!(
                "only allowed values for compare_operator are <= or >=, you used: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How two numeric values are judged close enough
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToleranceSpec {
    /// `|obtained - expected| <= absolute_tolerance + relative_tolerance * |expected|`
    Closeness {
        #[serde(rename = "atol")]
        absolute_tolerance: f64,
        #[serde(rename = "rtol")]
        relative_tolerance: f64,
    },
    /// `obtained <op> expected + max_absolute_diff`
    Directional {
        max_absolute_diff: f64,
        compare_operator: CompareOperator,
    },
}

impl Default for ToleranceSpec {
    fn default() -> Self {
        Self::exact()
    }
}

impl ToleranceSpec {
    /// Zero absolute and relative tolerance
    pub fn exact() -> Self {
        Self::closeness(0.0, 0.0)
    }

    pub fn closeness(absolute_tolerance: f64, relative_tolerance: f64) -> Self {
        Self::Closeness {
            absolute_tolerance,
            relative_tolerance,
        }
    }

    /// Parse the operator string; the sign of the bound is checked later by
    /// [`ToleranceSpec::validate`].
    pub fn directional(compare_operator: &str, max_absolute_diff: f64) -> Result<Self> {
        Ok(Self::Directional {
            max_absolute_diff,
            compare_operator: compare_operator.parse()?,
        })
    }

    pub fn is_directional(&self) -> bool {
        matches!(self, Self::Directional { .. })
    }

    /// Reject self-contradictory policies.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Closeness {
                absolute_tolerance,
                relative_tolerance,
            } => {
                if !(absolute_tolerance >= 0.0) || !(relative_tolerance >= 0.0) {
                    return Err(RegressionError::invalid_policy(format!(
                        "tolerances must be non-negative numbers, got atol={} rtol={}",
                        absolute_tolerance, relative_tolerance
                    )));
                }
                Ok(())
            }
            Self::Directional {
                max_absolute_diff,
                compare_operator,
            } => {
                if max_absolute_diff.is_nan() {
                    return Err(RegressionError::invalid_policy(
                        "max_absolute_diff must be a number, got NaN",
                    ));
                }
                match compare_operator {
                    CompareOperator::LessEqual if max_absolute_diff < 0.0 => {
                        Err(RegressionError::invalid_policy(
                            "it makes no sense to use max_absolute_diff < 0 when using compare_operator <=",
                        ))
                    }
                    CompareOperator::GreaterEqual if max_absolute_diff > 0.0 => {
                        Err(RegressionError::invalid_policy(
                            "it makes no sense to use max_absolute_diff > 0 when using compare_operator >=",
                        ))
                    }
                    _ => Ok(()),
                }
            }
        }
    }
}

impl fmt::Display for ToleranceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closeness {
                absolute_tolerance,
                relative_tolerance,
            } => write!(f, "atol={} rtol={}", absolute_tolerance, relative_tolerance),
            Self::Directional {
                max_absolute_diff,
                compare_operator,
            } => write!(f, "obtained {} expected + ({})", compare_operator, max_absolute_diff),
        }
    }
}

/// Per-column tolerance policies plus a default for unlisted columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToleranceConfig {
    pub default: ToleranceSpec,
    pub columns: IndexMap<String, ToleranceSpec>,
}

impl ToleranceConfig {
    pub fn new(default: ToleranceSpec) -> Self {
        Self {
            default,
            columns: IndexMap::new(),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, spec: ToleranceSpec) -> Self {
        self.columns.insert(name.into(), spec);
        self
    }

    /// Policy for `column`, falling back to the default
    pub fn resolve(&self, column: &str) -> &ToleranceSpec {
        self.columns.get(column).unwrap_or(&self.default)
    }

    /// Validate every policy up front instead of at comparison time.
    pub fn validate(&self) -> Result<()> {
        self.default.validate()?;
        for (name, spec) in &self.columns {
            spec.validate().map_err(|e| match e {
                RegressionError::InvalidPolicy { message } => {
                    RegressionError::invalid_policy(format!("column '{}': {}", name, message))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Parse a JSON document of the form
    /// `{"default": {...}, "columns": {"name": {...}}}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawToleranceConfig = serde_json::from_str(json)?;
        raw.into_config()
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RegressionError::invalid_input(format!(
                "Failed to read tolerance file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }
}

/// Free-function form of [`ToleranceConfig::resolve`]
pub fn resolve<'a>(column: &str, config: &'a ToleranceConfig) -> &'a ToleranceSpec {
    config.resolve(column)
}

/// On-disk form, kept loose so operator errors surface as policy errors
#[derive(Debug, Deserialize)]
struct RawToleranceConfig {
    #[serde(default)]
    default: Option<RawToleranceSpec>,
    #[serde(default)]
    columns: IndexMap<String, RawToleranceSpec>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawToleranceSpec {
    #[serde(default)]
    atol: Option<f64>,
    #[serde(default)]
    rtol: Option<f64>,
    #[serde(default)]
    compare_operator: Option<String>,
    #[serde(default)]
    max_absolute_diff: Option<f64>,
}

impl RawToleranceConfig {
    fn into_config(self) -> Result<ToleranceConfig> {
        let default = match self.default {
            Some(raw) => raw.into_spec()?,
            None => ToleranceSpec::default(),
        };
        let mut columns = IndexMap::new();
        for (name, raw) in self.columns {
            columns.insert(name, raw.into_spec()?);
        }
        Ok(ToleranceConfig { default, columns })
    }
}

impl RawToleranceSpec {
    fn into_spec(self) -> Result<ToleranceSpec> {
        let directional = self.compare_operator.is_some() || self.max_absolute_diff.is_some();
        let closeness = self.atol.is_some() || self.rtol.is_some();

        match (directional, closeness) {
            (true, true) => Err(RegressionError::invalid_policy(
                "atol/rtol cannot be combined with compare_operator/max_absolute_diff",
            )),
            (true, false) => ToleranceSpec::directional(
                self.compare_operator.as_deref().unwrap_or(">="),
                self.max_absolute_diff.unwrap_or(0.0),
            ),
            (false, _) => Ok(ToleranceSpec::closeness(
                self.atol.unwrap_or(0.0),
                self.rtol.unwrap_or(0.0),
            )),
        }
    }
}
