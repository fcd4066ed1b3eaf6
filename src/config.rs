//! Group-by configuration
//!
//! Settings can be built in code or loaded from TOML or YAML.

use std::fmt::{self, Display};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Container shape of an aggregation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputShape {
    /// Flat table: key columns plus one `<target>_<statistic>` column each
    #[default]
    Data,
    /// Group key mapped straight to the aggregate value(s)
    Groups,
}

impl OutputShape {
    pub fn name(&self) -> &'static str {
        match self {
            OutputShape::Data => "data",
            OutputShape::Groups => "groups",
        }
    }
}

impl FromStr for OutputShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "data" => Ok(OutputShape::Data),
            "groups" => Ok(OutputShape::Groups),
            other => Err(Error::InvalidInput(format!(
                "unknown output shape '{}', expected 'data' or 'groups'",
                other
            ))),
        }
    }
}

impl Display for OutputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings for [`GroupedView`](crate::groupby::GroupedView)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupByConfig {
    /// Shape produced by `aggregate_all` and `aggregate_one`
    pub output: OutputShape,
    /// Row count from which columns are aggregated in parallel
    pub parallel_threshold: usize,
    /// Leave out columns the statistic cannot be applied to instead of failing
    pub skip_incompatible_columns: bool,
}

impl Default for GroupByConfig {
    fn default() -> Self {
        Self {
            output: OutputShape::Data,
            parallel_threshold: 10_000,
            skip_incompatible_columns: false,
        }
    }
}

impl GroupByConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output shape
    pub fn with_output(mut self, output: OutputShape) -> Self {
        self.output = output;
        self
    }

    /// Set the row count from which aggregation runs in parallel
    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    /// Set whether incompatible columns are skipped
    pub fn with_skip_incompatible_columns(mut self, skip: bool) -> Self {
        self.skip_incompatible_columns = skip;
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let loader: fn(&str) -> Result<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("yaml") | Some("yml") => Self::from_yaml_str,
            _ => {
                return Err(Error::Config(format!(
                    "unsupported configuration file: {}",
                    path.display()
                )))
            }
        };
        let content = fs::read_to_string(path)?;
        log::debug!("loading group-by configuration from {}", path.display());
        loader(&content)
    }
}
