//! Folio Risk - Portfolio risk analytics library.
//!
//! This crate computes the risk figures shown on a portfolio dashboard from a
//! snapshot of historical prices and target weights:
//!
//! - **Return statistics**: daily return series, annualized standard deviation
//! - **Correlation**: pairwise Pearson coefficients and the full symmetric matrix
//! - **Portfolio risk**: variance-covariance volatility, diversification score, beta
//! - **Performance**: Sharpe ratio, maximum drawdown
//! - **Aggregation**: a single [`PortfolioRiskMetrics`] report per snapshot
//!
//! Every engine function is pure. Degenerate input (empty series, zero
//! variance, too little overlap) produces a neutral value instead of an error.
//!
//! # Example
//!
//! ```rust
//! use folio_risk::{compute_risk_metrics, AssetReturnSeries, WeightMap};
//!
//! let assets = vec![
//!     AssetReturnSeries::from_prices("spy", &[100.0, 101.0, 99.5, 102.0, 103.0]),
//!     AssetReturnSeries::from_prices("tlt", &[100.0, 99.0, 100.5, 99.8, 99.0]),
//! ];
//! let weights: WeightMap = [("SPY".to_string(), 0.6), ("TLT".to_string(), 0.4)]
//!     .into_iter()
//!     .collect();
//!
//! let metrics = compute_risk_metrics(&assets, &weights, None);
//! assert!(metrics.volatility >= 0.0);
//! assert_eq!(metrics.correlation_matrix.len(), 2);
//! ```

pub mod config;
pub mod portfolio;
pub mod snapshot;
pub mod stats;
pub mod summary;
pub mod types;

// Re-export commonly used types
pub use config::RiskConfig;
pub use snapshot::{Benchmark, Holding, PortfolioSnapshot};
pub use summary::{correlation_pairs, CorrelationPair, CorrelationStrength, RiskLevel, RiskSummary};
pub use types::{
    weight_of, ApiResponse, AssetReturnSeries, CorrelationMatrix, DrawdownEstimate,
    PortfolioRiskMetrics, WeightMap,
};

// Re-export main functionality
pub use portfolio::{
    annualized_return, approximate_max_drawdown, composite_returns, compute_risk_metrics,
    compute_risk_metrics_with, diversification_score, max_drawdown, portfolio_beta,
    portfolio_volatility, sharpe_ratio, RiskRequest,
};
pub use stats::{annualized_std_dev, build_return_series, correlation, correlation_matrix};

/// Trading periods per year used for every annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annual risk-free rate used when none is configured.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.04;

/// Error types for folio-risk operations.
///
/// The numeric engine itself never fails; these cover the boundaries
/// (configuration, snapshot input, matrix validation).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Correlation coefficient out of range at ({row}, {col}): {value}")]
    CoefficientOutOfRange { row: usize, col: usize, value: f64 },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for folio-risk operations.
pub type Result<T> = std::result::Result<T, Error>;
