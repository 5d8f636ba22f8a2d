//! Risk engine configuration.

use crate::{Error, Result, DEFAULT_RISK_FREE_RATE};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Tunables for the risk report.
///
/// Loaded from TOML; every field is optional and falls back to its default.
///
/// ```toml
/// risk_free_rate = 0.045
/// clamp_diversification = true
/// correlation_tolerance = 1e-9
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskConfig {
    /// Annual risk-free rate for the Sharpe ratio
    pub risk_free_rate: f64,
    /// Clamp the reported diversification score to [0, 1]
    pub clamp_diversification: bool,
    /// Allowed overshoot of |ρ| past 1 before a matrix is rejected
    pub correlation_tolerance: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            clamp_diversification: false,
            correlation_tolerance: 1e-9,
        }
    }
}

impl RiskConfig {
    /// Load the configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    /// Get the default config file path.
    ///
    /// Default path: `<config dir>/folio-risk/config.toml`
    /// Can be overridden with `FOLIO_RISK_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("FOLIO_RISK_CONFIG") {
            return PathBuf::from(path);
        }

        directories::ProjectDirs::from("", "", "folio-risk")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("folio-risk.toml"))
    }

    /// Load the configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` (or the default path) and apply a risk-free rate
    /// override, validating the result.
    pub fn resolve(path: Option<&Path>, risk_free_rate: Option<f64>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load()?,
        };

        let Some(rate) = risk_free_rate else {
            return Ok(config);
        };

        let config = config.with_risk_free_rate(rate);
        config.validate()?;
        Ok(config)
    }

    /// Override the risk-free rate.
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(Error::Config(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }

        if !self.correlation_tolerance.is_finite() || self.correlation_tolerance < 0.0 {
            return Err(Error::Config(format!(
                "correlation_tolerance must be a non-negative number, got {}",
                self.correlation_tolerance
            )));
        }

        Ok(())
    }
}
