//! Configuration Loader
//!
//! Loads and validates run configuration from a TOML file. Defaults
//! carry the fixed study constants so the pipeline runs with no
//! config file at all.

use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::volatility::Distribution;

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataSection,
    #[serde(default)]
    pub models: ModelsSection,
    #[serde(default)]
    pub output: OutputSection,
}

/// Data window and ticker universe
#[derive(Debug, Clone, Deserialize)]
pub struct DataSection {
    /// Inclusive start of the daily price window
    pub start_date: NaiveDate,
    /// Inclusive end of the daily price window
    pub end_date: NaiveDate,
    /// Static ticker universe, processed in order
    pub tickers: Vec<String>,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            tickers: vec!["BTC-USD".to_string(), "ETH-USD".to_string()],
        }
    }
}

/// Model fitting section
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsSection {
    /// Innovation distribution applied to all specs: "normal" or "t"
    pub distribution: Distribution,
}

impl Default for ModelsSection {
    fn default() -> Self {
        Self {
            distribution: Distribution::Normal,
        }
    }
}

/// Output layout section
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    /// Root directory for tables; figures land in <dir>/figs and
    /// model summaries in <dir>/logs
    pub results_dir: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            results_dir: "results".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataSection::default(),
            models: ModelsSection::default(),
            output: OutputSection::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.tickers.is_empty() {
            return Err(ConfigError::Validation(
                "tickers must not be empty".to_string(),
            ));
        }
        if self.data.start_date >= self.data.end_date {
            return Err(ConfigError::Validation(format!(
                "start_date {} must precede end_date {}",
                self.data.start_date, self.data.end_date
            )));
        }
        if self.output.results_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "results_dir must not be empty".to_string(),
            ));
        }
        for ticker in &self.data.tickers {
            if ticker.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "ticker symbols must not be blank".to_string(),
                ));
            }
        }
        Ok(())
    }
}
