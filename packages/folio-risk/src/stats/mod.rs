//! Return series and dispersion statistics.
//!
//! These are the primitives the portfolio module builds on:
//!
//! - **Return series**: period-over-period fractional price changes
//! - **Moments**: mean, population variance, covariance
//! - **Dispersion**: annualized standard deviation
//! - **Correlation**: Pearson coefficients over the most recent shared window

mod correlation;

pub use correlation::{correlation, correlation_matrix, pearson};

use crate::TRADING_DAYS_PER_YEAR;

/// Convert a chronological price series into daily fractional returns.
///
/// `r[i] = (p[i+1] - p[i]) / p[i]`. A step whose prior price is exactly zero
/// is dropped rather than filled, so the result may be shorter than
/// `prices.len() - 1`.
///
/// # Example
///
/// ```rust
/// use folio_risk::stats::build_return_series;
///
/// let returns = build_return_series(&[100.0, 110.0, 0.0, 50.0]);
///
/// // 100 -> 110 is +10%, 110 -> 0 is -100%, 0 -> 50 is skipped
/// assert_eq!(returns.len(), 2);
/// assert!((returns[0] - 0.10).abs() < 1e-12);
/// assert!((returns[1] + 1.0).abs() < 1e-12);
/// ```
pub fn build_return_series(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .filter_map(|w| {
            if w[0] != 0.0 {
                Some((w[1] - w[0]) / w[0])
            } else {
                None
            }
        })
        .collect()
}

/// Arithmetic mean. Empty input yields 0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by `n`). Empty input yields 0.
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population covariance of two equally long slices.
///
/// Only the common prefix is used if the lengths differ; callers align first.
pub fn covariance(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }

    let (x, y) = (&x[..n], &y[..n]);
    let mean_x = mean(x);
    let mean_y = mean(y);

    x.iter()
        .zip(y)
        .map(|(a, b)| (a - mean_x) * (b - mean_y))
        .sum::<f64>()
        / n as f64
}

/// Annualized standard deviation of daily returns.
///
/// Population standard deviation scaled by `sqrt(252)`; do not expect
/// sample-variance (`n - 1`) semantics. Empty input yields 0.
pub fn annualized_std_dev(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    population_variance(returns).sqrt() * TRADING_DAYS_PER_YEAR.sqrt()
}

/// The last `n` observations of `values` (all of them if shorter).
pub fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len() - n.min(values.len())..]
}
