//! Run configuration.
//!
//! Handles parsing and validation of `probegen.toml` files. Every field has
//! a default, so an empty file (or no file) yields the stock list-family
//! setup. Range checks happen at load time, not at first use.

use crate::eval::EvalOptions;
use crate::list::FillMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Parameters of the list family's random input generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListFamilyConfig {
    /// Inclusive lower bound of list elements.
    pub min_val: i64,
    /// Exclusive upper bound of list elements.
    pub max_val: i64,
    /// Length of every generated list.
    pub list_size: usize,
    /// Inclusive lower bound of scalar operands.
    pub append_min: i64,
    /// Exclusive upper bound of scalar operands.
    pub append_max: i64,
    /// List population strategy.
    pub fill_mode: FillMode,
}

impl Default for ListFamilyConfig {
    fn default() -> Self {
        Self {
            min_val: 0,
            max_val: 10,
            list_size: 5,
            append_min: 0,
            append_max: 20,
            fill_mode: FillMode::Random,
        }
    }
}

impl ListFamilyConfig {
    /// Check value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.min_val >= self.max_val {
            return Err(ConfigError::Invalid(format!(
                "min_val {} must be below max_val {}",
                self.min_val, self.max_val
            )));
        }
        if self.append_min >= self.append_max {
            return Err(ConfigError::Invalid(format!(
                "append_min {} must be below append_max {}",
                self.append_min, self.append_max
            )));
        }
        if self.list_size == 0 {
            return Err(ConfigError::Invalid(
                "list_size must be at least 1".to_string(),
            ));
        }
        // The outlier must be able to differ from the fill value.
        if self.fill_mode == FillMode::SingleOutlier && self.max_val - self.min_val < 2 {
            return Err(ConfigError::Invalid(
                "single_outlier needs at least two distinct values in [min_val, max_val)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Root configuration structure matching probegen.toml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Seed for all random input generation.
    pub seed: Seed,
    /// List-family sampling parameters.
    pub family: ListFamilyConfig,
    /// Evaluation parameters.
    pub eval: EvalOptions,
}

/// Newtype so the seed can default to a fixed value under serde(default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(pub u64);

impl Default for Seed {
    fn default() -> Self {
        Seed(42)
    }
}

impl ProbeConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: ProbeConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        self.family.validate()
    }
}
