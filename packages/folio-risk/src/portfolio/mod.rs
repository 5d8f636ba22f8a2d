//! Portfolio risk module.
//!
//! Provides correlation-aware volatility, diversification, beta, performance
//! ratios and the aggregated risk report.

mod metrics;
mod performance;
mod risk;

pub use metrics::{compute_risk_metrics, compute_risk_metrics_with, RiskRequest};
pub use performance::{annualized_return, approximate_max_drawdown, max_drawdown, sharpe_ratio};
pub use risk::{composite_returns, diversification_score, portfolio_beta, portfolio_volatility};
