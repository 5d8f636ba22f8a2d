//! Core data types for the risk engine.

use crate::stats::{annualized_std_dev, build_return_series, mean};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Target portfolio weight per symbol (fraction of total value).
///
/// Weights are used as given: the engine never normalizes them, and symbols
/// missing from the map carry an implicit weight of zero.
pub type WeightMap = HashMap<String, f64>;

/// Look up the weight of `symbol`.
///
/// An exact key wins. Otherwise keys are compared after `to_uppercase`, the
/// same normalization `AssetReturnSeries` applies to its symbol; when several
/// keys normalize alike, the lexicographically smallest one is used.
/// Returns 0.0 for symbols that are not in the map.
pub fn weight_of(weights: &WeightMap, symbol: &str) -> f64 {
    if let Some(weight) = weights.get(symbol) {
        return *weight;
    }

    let normalized = symbol.to_uppercase();
    if let Some(weight) = weights.get(&normalized) {
        return *weight;
    }

    weights
        .iter()
        .filter(|(key, _)| key.to_uppercase() == normalized)
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, weight)| *weight)
        .unwrap_or(0.0)
}

/// Daily return history of a single holding, with its summary statistics.
///
/// `std_dev` and `avg_return` are computed once when the series is built so
/// that the pairwise loops never recompute them.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssetReturnSeries {
    symbol: String,
    returns: Vec<f64>,
    std_dev: f64,
    avg_return: f64,
}

impl AssetReturnSeries {
    /// Create a series from chronological (oldest first) daily returns.
    pub fn new(symbol: &str, returns: Vec<f64>) -> Self {
        let std_dev = annualized_std_dev(&returns);
        let avg_return = mean(&returns);

        Self {
            symbol: symbol.to_uppercase(),
            returns,
            std_dev,
            avg_return,
        }
    }

    /// Create a series from a chronological price history.
    pub fn from_prices(symbol: &str, prices: &[f64]) -> Self {
        Self::new(symbol, build_return_series(prices))
    }

    /// Ticker symbol (uppercase).
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Daily fractional returns, oldest first.
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Annualized standard deviation of the returns.
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Mean daily return (not annualized).
    pub fn avg_return(&self) -> f64 {
        self.avg_return
    }

    /// Number of return observations.
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }
}

/// Symmetric NxN correlation matrix, ordered like the input assets.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CorrelationMatrix {
    symbols: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub(crate) fn from_parts(symbols: Vec<String>, values: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(symbols.len(), values.len());
        Self { symbols, values }
    }

    /// Symbols in row/column order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Coefficient rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Number of assets (rows).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Coefficient at row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Coefficient between two symbols (case-insensitive).
    pub fn get_by_symbol(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        self.get(i, j)
    }

    fn index_of(&self, symbol: &str) -> Option<usize> {
        let normalized = symbol.to_uppercase();
        self.symbols
            .iter()
            .position(|s| s == symbol || *s == normalized)
    }

    /// Check that every coefficient is finite and within `[-1, 1]` up to `tolerance`.
    ///
    /// Collinear or flat inputs can push a coefficient past the bound by a few
    /// ulps; the builder leaves those alone and callers decide here.
    pub fn validate(&self, tolerance: f64) -> Result<()> {
        for (row, values) in self.values.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if !value.is_finite() || value.abs() > 1.0 + tolerance {
                    return Err(Error::CoefficientOutOfRange { row, col, value });
                }
            }
        }
        Ok(())
    }
}

/// How the reported maximum drawdown was obtained.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", content = "value", rename_all = "snake_case")]
pub enum DrawdownEstimate {
    /// Measured peak-to-trough decline of an actual portfolio price series.
    Observed(f64),
    /// Placeholder of `volatility * 2`, not a measurement.
    Approximate(f64),
}

impl DrawdownEstimate {
    /// The drawdown as a fraction.
    pub fn value(&self) -> f64 {
        match self {
            DrawdownEstimate::Observed(v) | DrawdownEstimate::Approximate(v) => *v,
        }
    }

    pub fn is_approximate(&self) -> bool {
        matches!(self, DrawdownEstimate::Approximate(_))
    }
}

/// Risk report for one portfolio snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioRiskMetrics {
    /// Annualized portfolio volatility (fraction, >= 0)
    pub volatility: f64,
    /// 1 - portfolio volatility / weighted average standalone volatility
    pub diversification_score: f64,
    /// Regression slope against the benchmark (1.0 when unavailable)
    pub beta: f64,
    /// Excess return per unit of volatility
    pub sharpe_ratio: f64,
    /// Linearly annualized mean daily return used for the Sharpe ratio
    pub annualized_return: f64,
    /// Maximum drawdown, tagged as observed or approximate
    pub max_drawdown: DrawdownEstimate,
    /// Pairwise correlations of the holdings
    pub correlation_matrix: CorrelationMatrix,
}

/// API response wrapper used for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
