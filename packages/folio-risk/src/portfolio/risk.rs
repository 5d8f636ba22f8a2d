//! Portfolio risk calculation.
//!
//! Provides variance-covariance volatility, the diversification score and
//! portfolio beta against a benchmark.

use crate::stats::{correlation, covariance, population_variance, tail};
use crate::types::{weight_of, AssetReturnSeries, CorrelationMatrix, WeightMap};
use std::iter;

/// Calculate annualized portfolio volatility with the variance-covariance method.
///
/// `variance = Σ_i Σ_j w_i * w_j * ρ_ij * σ_i * σ_j` over every ordered pair,
/// where `σ` is each asset's annualized standard deviation and `ρ_ii = 1`.
/// Pairs with a zero weight on either side are skipped before any
/// correlation is computed.
///
/// # Arguments
///
/// * `assets` - Return series of every tracked holding
/// * `weights` - Target weight per symbol (unlisted symbols weigh 0, negative weights are shorts)
///
/// # Returns
///
/// `sqrt(max(0, variance))`, so the result is never negative or NaN from rounding.
pub fn portfolio_volatility(assets: &[AssetReturnSeries], weights: &WeightMap) -> f64 {
    weighted_volatility(assets, weights, |i, j| correlation(&assets[i], &assets[j]))
}

/// Same as [`portfolio_volatility`], reading coefficients from a prebuilt matrix.
pub(crate) fn volatility_from_matrix(
    assets: &[AssetReturnSeries],
    weights: &WeightMap,
    matrix: &CorrelationMatrix,
) -> f64 {
    weighted_volatility(assets, weights, |i, j| matrix.get(i, j).unwrap_or(0.0))
}

fn weighted_volatility<F>(assets: &[AssetReturnSeries], weights: &WeightMap, rho: F) -> f64
where
    F: Fn(usize, usize) -> f64,
{
    let exposures: Vec<f64> = assets.iter().map(|a| weight_of(weights, a.symbol())).collect();

    let mut variance = 0.0;
    for (i, asset_i) in assets.iter().enumerate() {
        let w_i = exposures[i];
        if w_i == 0.0 {
            continue;
        }

        // Diagonal term: ρ_ii = 1
        variance += w_i * w_i * asset_i.std_dev() * asset_i.std_dev();

        // (i, j) and (j, i) contribute the same amount
        for (j, asset_j) in assets.iter().enumerate().skip(i + 1) {
            let w_j = exposures[j];
            if w_j == 0.0 {
                continue;
            }
            variance += 2.0 * w_i * w_j * rho(i, j) * asset_i.std_dev() * asset_j.std_dev();
        }
    }

    if variance < 0.0 {
        tracing::trace!("Clamping negative portfolio variance {:e} to 0", variance);
    }

    variance.max(0.0).sqrt()
}

/// Calculate the diversification score of a portfolio.
///
/// `1 - portfolio_volatility / Σ w_i * σ_i`. A score of 0 means holding the
/// basket is no less volatile than its parts (perfect correlation); values
/// towards 1 mean correlations offset each other.
///
/// Returns 0.0 when the weighted average standalone volatility is exactly 0.
/// The score is not clamped: short positions can push it outside `[0, 1]`.
pub fn diversification_score(assets: &[AssetReturnSeries], weights: &WeightMap) -> f64 {
    let volatility = portfolio_volatility(assets, weights);
    diversification_from_volatility(assets, weights, volatility)
}

pub(crate) fn diversification_from_volatility(
    assets: &[AssetReturnSeries],
    weights: &WeightMap,
    volatility: f64,
) -> f64 {
    let weighted_average: f64 = assets
        .iter()
        .map(|a| weight_of(weights, a.symbol()) * a.std_dev())
        .sum();

    if weighted_average == 0.0 {
        return 0.0;
    }

    1.0 - volatility / weighted_average
}

/// Build the weighted portfolio return series over the last `len` periods.
///
/// `p[k] = Σ w_a * a.returns[a.len() - len + k]`. Assets with fewer than
/// `len` observations are aligned to the end and contribute nothing to the
/// earlier periods; zero-weight assets are not read at all.
pub fn composite_returns(assets: &[AssetReturnSeries], weights: &WeightMap, len: usize) -> Vec<f64> {
    let mut composite = vec![0.0; len];

    for asset in assets {
        let weight = weight_of(weights, asset.symbol());
        if weight == 0.0 {
            continue;
        }

        let window = tail(asset.returns(), len);
        let offset = len - window.len();
        for (k, r) in window.iter().enumerate() {
            composite[offset + k] += weight * r;
        }
    }

    composite
}

/// Calculate portfolio beta against a benchmark.
///
/// The weighted composite return series is regressed on the benchmark over
/// the last `min_len` periods, where `min_len` is the shortest of all asset
/// series and the benchmark. Alignment is positional from the end.
///
/// # Returns
///
/// `cov(portfolio, benchmark) / var(benchmark)`, or the neutral 1.0 when
/// fewer than two aligned periods exist or the benchmark is flat.
///
/// # Example
///
/// ```rust
/// use folio_risk::{portfolio_beta, AssetReturnSeries, WeightMap};
///
/// let benchmark = vec![0.01, -0.02, 0.015, 0.005];
/// let levered: Vec<f64> = benchmark.iter().map(|r| r * 2.0).collect();
/// let assets = vec![AssetReturnSeries::new("LEV", levered)];
/// let weights: WeightMap = [("LEV".to_string(), 1.0)].into_iter().collect();
///
/// let beta = portfolio_beta(&assets, &weights, &benchmark);
/// assert!((beta - 2.0).abs() < 1e-9);
/// ```
pub fn portfolio_beta(
    assets: &[AssetReturnSeries],
    weights: &WeightMap,
    benchmark_returns: &[f64],
) -> f64 {
    let min_len = assets
        .iter()
        .map(|a| a.len())
        .chain(iter::once(benchmark_returns.len()))
        .min()
        .unwrap_or(0);

    if min_len < 2 {
        tracing::debug!("Beta: only {} aligned periods, using neutral beta", min_len);
        return 1.0;
    }

    let portfolio = composite_returns(assets, weights, min_len);
    let benchmark = tail(benchmark_returns, min_len);

    let benchmark_variance = population_variance(benchmark);
    if benchmark_variance == 0.0 {
        tracing::debug!("Beta: benchmark has zero variance, using neutral beta");
        return 1.0;
    }

    covariance(&portfolio, benchmark) / benchmark_variance
}
