//! Portfolio snapshots handed to the engine by the data layer.
//!
//! A snapshot is a JSON document with the price history of every holding,
//! its target weight, and optionally a benchmark and an aggregate portfolio
//! price series:
//!
//! ```json
//! {
//!   "as_of": "2024-06-28",
//!   "holdings": [
//!     { "symbol": "SPY", "weight": 0.6, "prices": [500.1, 502.3, 499.8] },
//!     { "symbol": "TLT", "weight": 0.4, "prices": [92.4, 92.1, 92.9] }
//!   ],
//!   "benchmark": { "symbol": "SPY", "prices": [500.1, 502.3, 499.8] },
//!   "portfolio_prices": [100.0, 100.9, 100.2]
//! }
//! ```

use crate::config::RiskConfig;
use crate::portfolio::{compute_risk_metrics_with, RiskRequest};
use crate::stats::build_return_series;
use crate::types::{AssetReturnSeries, PortfolioRiskMetrics, WeightMap};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// One holding with its chronological closing prices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holding {
    pub symbol: String,
    /// Target weight (fraction of portfolio value)
    pub weight: f64,
    /// Daily closes, oldest first
    pub prices: Vec<f64>,
}

/// Benchmark price history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Benchmark {
    pub symbol: String,
    pub prices: Vec<f64>,
}

/// Price history and weights of a portfolio at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PortfolioSnapshot {
    /// Date of the last observation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    pub holdings: Vec<Holding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<Benchmark>,
    /// Aggregate portfolio value history, if the data layer tracks it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_prices: Option<Vec<f64>>,
}

impl PortfolioSnapshot {
    /// Load and validate a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse and validate a snapshot from JSON.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(content)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reject input the engine would silently misread.
    ///
    /// Holdings must be non-empty with unique symbols (case-insensitive),
    /// finite weights, and finite non-negative prices.
    pub fn validate(&self) -> Result<()> {
        if self.holdings.is_empty() {
            return Err(Error::InvalidSnapshot("snapshot has no holdings".to_string()));
        }

        let mut seen = HashSet::new();
        for holding in &self.holdings {
            let symbol = holding.symbol.trim().to_uppercase();
            if symbol.is_empty() {
                return Err(Error::InvalidSnapshot("holding with empty symbol".to_string()));
            }
            if !seen.insert(symbol.clone()) {
                return Err(Error::InvalidSnapshot(format!("duplicate holding: {}", symbol)));
            }
            if !holding.weight.is_finite() {
                return Err(Error::InvalidSnapshot(format!(
                    "{}: weight must be finite, got {}",
                    symbol, holding.weight
                )));
            }
            check_prices(&symbol, &holding.prices)?;
        }

        if let Some(benchmark) = &self.benchmark {
            check_prices(&benchmark.symbol, &benchmark.prices)?;
        }
        if let Some(prices) = &self.portfolio_prices {
            check_prices("portfolio", prices)?;
        }

        Ok(())
    }

    /// Return series of every holding, in snapshot order.
    pub fn assets(&self) -> Vec<AssetReturnSeries> {
        self.holdings
            .iter()
            .map(|h| AssetReturnSeries::from_prices(h.symbol.trim(), &h.prices))
            .collect()
    }

    /// Weight per (uppercase) symbol.
    pub fn weights(&self) -> WeightMap {
        self.holdings
            .iter()
            .map(|h| (h.symbol.trim().to_uppercase(), h.weight))
            .collect()
    }

    /// Benchmark daily returns, if a benchmark is present.
    pub fn benchmark_returns(&self) -> Option<Vec<f64>> {
        self.benchmark
            .as_ref()
            .map(|b| build_return_series(&b.prices))
    }

    /// Compute the risk report for this snapshot.
    pub fn risk_metrics(&self, config: &RiskConfig) -> PortfolioRiskMetrics {
        let assets = self.assets();
        let weights = self.weights();
        let benchmark = self.benchmark_returns();

        let mut request = RiskRequest::new(&assets, &weights);
        request.benchmark_returns = benchmark.as_deref();
        request.portfolio_prices = self.portfolio_prices.as_deref();

        compute_risk_metrics_with(&request, config)
    }
}

fn check_prices(label: &str, prices: &[f64]) -> Result<()> {
    if let Some((idx, price)) = prices
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p < 0.0)
    {
        return Err(Error::InvalidSnapshot(format!(
            "{}: invalid price {} at index {}",
            label, price, idx
        )));
    }
    Ok(())
}
