//! Aggregated portfolio risk report.

use super::performance::{annualized_return, approximate_max_drawdown, max_drawdown, sharpe_ratio};
use super::risk::{diversification_from_volatility, portfolio_beta, volatility_from_matrix};
use crate::config::RiskConfig;
use crate::stats::correlation_matrix;
use crate::types::{AssetReturnSeries, DrawdownEstimate, PortfolioRiskMetrics, WeightMap};

/// Inputs for one risk report.
#[derive(Debug, Clone, Copy)]
pub struct RiskRequest<'a> {
    /// Return series of every tracked holding
    pub assets: &'a [AssetReturnSeries],
    /// Target weight per symbol
    pub weights: &'a WeightMap,
    /// Benchmark daily returns, for beta
    pub benchmark_returns: Option<&'a [f64]>,
    /// Actual portfolio-level price history, for a measured drawdown
    pub portfolio_prices: Option<&'a [f64]>,
}

impl<'a> RiskRequest<'a> {
    pub fn new(assets: &'a [AssetReturnSeries], weights: &'a WeightMap) -> Self {
        Self {
            assets,
            weights,
            benchmark_returns: None,
            portfolio_prices: None,
        }
    }

    pub fn with_benchmark(mut self, benchmark_returns: &'a [f64]) -> Self {
        self.benchmark_returns = Some(benchmark_returns);
        self
    }

    pub fn with_portfolio_prices(mut self, prices: &'a [f64]) -> Self {
        self.portfolio_prices = Some(prices);
        self
    }
}

/// Calculate the risk report with the default configuration.
///
/// Beta falls back to 1.0 without a benchmark, and the drawdown is reported
/// as [`DrawdownEstimate::Approximate`] since no portfolio prices are given.
pub fn compute_risk_metrics(
    assets: &[AssetReturnSeries],
    weights: &WeightMap,
    benchmark_returns: Option<&[f64]>,
) -> PortfolioRiskMetrics {
    let mut request = RiskRequest::new(assets, weights);
    request.benchmark_returns = benchmark_returns;
    compute_risk_metrics_with(&request, &RiskConfig::default())
}

/// Calculate the risk report for a request.
///
/// The correlation matrix is built once and reused for the volatility, so
/// each asset pair is correlated at most once.
pub fn compute_risk_metrics_with(request: &RiskRequest<'_>, config: &RiskConfig) -> PortfolioRiskMetrics {
    let assets = request.assets;
    let weights = request.weights;

    let correlation_matrix = correlation_matrix(assets);
    let volatility = volatility_from_matrix(assets, weights, &correlation_matrix);

    let mut diversification_score = diversification_from_volatility(assets, weights, volatility);
    if config.clamp_diversification {
        diversification_score = diversification_score.clamp(0.0, 1.0);
    }

    let annual_return = annualized_return(assets, weights);
    let sharpe = sharpe_ratio(annual_return, volatility, config.risk_free_rate);

    let beta = match request.benchmark_returns {
        Some(benchmark) => portfolio_beta(assets, weights, benchmark),
        None => {
            tracing::debug!("No benchmark supplied, reporting neutral beta");
            1.0
        }
    };

    let max_drawdown = match request.portfolio_prices {
        Some(prices) if !prices.is_empty() => DrawdownEstimate::Observed(max_drawdown(prices)),
        _ => {
            tracing::debug!("No portfolio prices supplied, approximating drawdown from volatility");
            DrawdownEstimate::Approximate(approximate_max_drawdown(volatility))
        }
    };

    tracing::debug!(
        "Risk metrics for {} assets: vol={:.4} div={:.4} beta={:.4} sharpe={:.4}",
        assets.len(),
        volatility,
        diversification_score,
        beta,
        sharpe
    );

    PortfolioRiskMetrics {
        volatility,
        diversification_score,
        beta,
        sharpe_ratio: sharpe,
        annualized_return: annual_return,
        max_drawdown,
        correlation_matrix,
    }
}
