//! Portfolio performance ratios and drawdown.

use crate::types::{weight_of, AssetReturnSeries, WeightMap};
use crate::TRADING_DAYS_PER_YEAR;

/// Annualized portfolio return from mean daily asset returns.
///
/// `Σ w_i * avg_i * 252`: a linear scaling of the weighted mean daily
/// return, not a compounded one.
pub fn annualized_return(assets: &[AssetReturnSeries], weights: &WeightMap) -> f64 {
    assets
        .iter()
        .map(|a| weight_of(weights, a.symbol()) * a.avg_return() * TRADING_DAYS_PER_YEAR)
        .sum()
}

/// Calculate the Sharpe ratio.
///
/// # Arguments
///
/// * `annual_return` - Annualized portfolio return
/// * `volatility` - Annualized portfolio volatility
/// * `risk_free_rate` - Annual risk-free rate (see [`crate::DEFAULT_RISK_FREE_RATE`])
///
/// # Returns
///
/// `(annual_return - risk_free_rate) / volatility`, or 0.0 for zero volatility.
pub fn sharpe_ratio(annual_return: f64, volatility: f64, risk_free_rate: f64) -> f64 {
    if volatility == 0.0 {
        return 0.0;
    }
    (annual_return - risk_free_rate) / volatility
}

/// Calculate maximum drawdown from a raw price series.
///
/// Tracks the running peak in a single forward pass and returns the largest
/// `(peak - price) / peak` as a decimal (e.g., 0.15 for a 15% drawdown).
/// Pass actual prices here, not prices rebuilt from returns.
///
/// Returns 0.0 for an empty series. The result stays within `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use folio_risk::max_drawdown;
///
/// // Peak 120, trough 60; the recovery to 90 does not matter
/// let mdd = max_drawdown(&[100.0, 80.0, 120.0, 60.0, 90.0]);
/// assert!((mdd - 0.5).abs() < 1e-12);
/// ```
pub fn max_drawdown(prices: &[f64]) -> f64 {
    let Some(&first) = prices.first() else {
        return 0.0;
    };

    let mut running_max = first;
    let mut max_drawdown = 0.0_f64;

    for &price in prices {
        if price > running_max {
            running_max = price;
        }
        if running_max > 0.0 {
            let drawdown = (running_max - price) / running_max;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }
    }

    // A price below zero is a total loss
    max_drawdown.min(1.0)
}

/// Placeholder drawdown of `volatility * 2`.
///
/// Used only when no portfolio-level price series is available. This is not
/// a measurement and is reported as [`crate::DrawdownEstimate::Approximate`].
pub fn approximate_max_drawdown(volatility: f64) -> f64 {
    volatility * 2.0
}
