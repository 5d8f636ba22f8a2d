//! Pearson correlation between holdings.

use super::{mean, tail};
use crate::types::{AssetReturnSeries, CorrelationMatrix};

/// Pearson correlation of two return series over their overlapping tail.
///
/// Both series are aligned by position from the end: the last
/// `min(a.len(), b.len())` observations of each are compared. This assumes
/// both series share the same sampling calendar.
///
/// Returns 0.0 when the overlap is shorter than two observations or when
/// either window has zero variance.
pub fn correlation(a: &AssetReturnSeries, b: &AssetReturnSeries) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        tracing::trace!(
            "Correlation {}/{}: overlap of {} observations, returning 0",
            a.symbol(),
            b.symbol(),
            n
        );
        return 0.0;
    }

    pearson(tail(a.returns(), n), tail(b.returns(), n))
}

/// Pearson coefficient of two equally long windows.
///
/// A flat window yields 0.0. A window counts as flat when its squared
/// deviations are at or below `f64::EPSILON` times its sum of squares, so a
/// constant series that picked up rounding noise is still flat.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }

    let (x, y) = (&x[..n], &y[..n]);
    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut cross = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    let mut scale_x = 0.0;
    let mut scale_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cross += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
        scale_x += a * a;
        scale_y += b * b;
    }

    if is_flat(sum_sq_x, scale_x) || is_flat(sum_sq_y, scale_y) {
        return 0.0;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    cross / denominator
}

fn is_flat(sum_sq_dev: f64, sum_sq: f64) -> bool {
    sum_sq_dev <= f64::EPSILON * sum_sq
}

/// Build the NxN correlation matrix for `assets`, in input order.
///
/// Only pairs with `j > i` are computed; each result is written to both
/// `[i][j]` and `[j][i]`, and the diagonal is set to exactly 1.
///
/// # Example
///
/// ```rust
/// use folio_risk::{correlation_matrix, AssetReturnSeries};
///
/// let assets = vec![
///     AssetReturnSeries::new("A", vec![0.01, 0.02, -0.01]),
///     AssetReturnSeries::new("B", vec![0.02, 0.04, -0.02]),
/// ];
/// let matrix = correlation_matrix(&assets);
///
/// assert_eq!(matrix.get(0, 0), Some(1.0));
/// assert_eq!(matrix.get(0, 1), matrix.get(1, 0));
/// ```
pub fn correlation_matrix(assets: &[AssetReturnSeries]) -> CorrelationMatrix {
    let n = assets.len();
    let mut values = vec![vec![0.0; n]; n];

    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let rho = correlation(&assets[i], &assets[j]);
            values[i][j] = rho;
            values[j][i] = rho;
        }
    }

    let symbols = assets.iter().map(|a| a.symbol().to_string()).collect();
    CorrelationMatrix::from_parts(symbols, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::build_return_series;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn basket() -> Vec<AssetReturnSeries> {
        vec![
            AssetReturnSeries::new("SPY", vec![0.010, -0.004, 0.007, 0.002, -0.011, 0.006]),
            AssetReturnSeries::new("QQQ", vec![0.014, -0.006, 0.009, 0.001, -0.015, 0.008]),
            AssetReturnSeries::new("TLT", vec![-0.004, 0.003, -0.002, 0.001, 0.006, -0.003]),
            AssetReturnSeries::new("GLD", vec![0.002, 0.001, -0.003, 0.004]),
        ]
    }

    #[test]
    fn test_self_correlation_is_one() {
        let a = AssetReturnSeries::new("A", vec![0.01, -0.02, 0.015, 0.003]);
        assert_relative_eq!(correlation(&a, &a), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_perfect_negative_correlation() {
        let a = AssetReturnSeries::new("A", vec![0.01, 0.02, 0.03]);
        let b = AssetReturnSeries::new("B", vec![0.03, 0.02, 0.01]);
        assert_relative_eq!(correlation(&a, &b), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_correlation_reference_value() {
        let a = AssetReturnSeries::new("A", vec![1.0, 2.0, 3.0, 4.0]);
        let b = AssetReturnSeries::new("B", vec![1.0, 3.0, 2.0, 4.0]);
        // Σdxdy = 4, Σdx² = 5, Σdy² = 5
        assert_relative_eq!(correlation(&a, &b), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_correlation_uses_overlapping_tail() {
        // Only the last three observations of `long` overlap with `short`
        let long = AssetReturnSeries::new("LONG", vec![0.5, -0.7, 0.01, 0.02, 0.03]);
        let short = AssetReturnSeries::new("SHORT", vec![0.01, 0.02, 0.03]);

        assert_relative_eq!(correlation(&long, &short), 1.0, epsilon = 1e-12);
        assert_relative_eq!(correlation(&short, &long), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_correlation_short_overlap_is_zero() {
        let a = AssetReturnSeries::new("A", vec![0.01]);
        let b = AssetReturnSeries::new("B", vec![0.02, 0.03, 0.04]);
        assert_eq!(correlation(&a, &b), 0.0);

        let empty = AssetReturnSeries::new("E", Vec::new());
        assert_eq!(correlation(&empty, &empty), 0.0);
    }

    #[test]
    fn test_correlation_flat_series_is_zero() {
        let flat = AssetReturnSeries::new("FLAT", vec![0.0, 0.0, 0.0]);
        let moving = AssetReturnSeries::new("MOVE", vec![0.01, -0.02, 0.03]);

        let rho = correlation(&flat, &moving);
        assert_eq!(rho, 0.0);
        assert!(!rho.is_nan());
    }

    #[test]
    fn test_constant_growth_path_is_flat() {
        // 10% a day; the returns differ only by rounding
        let geo = AssetReturnSeries::from_prices("GEO", &[100.0, 110.0, 121.0, 133.1, 146.41]);
        let moving = AssetReturnSeries::new("MOVE", vec![0.01, -0.02, 0.03]);

        assert_eq!(correlation(&geo, &moving), 0.0);
        assert_eq!(correlation(&moving, &geo), 0.0);

        let constant = AssetReturnSeries::new("CONST", vec![0.1, 0.1, 0.1]);
        assert_eq!(correlation(&constant, &moving), 0.0);
    }

    #[test]
    fn test_small_genuine_moves_are_not_flat() {
        let quiet = AssetReturnSeries::new("QUIET", vec![0.1, 0.1 + 1e-6, 0.1 - 1e-6, 0.1]);
        let loud = AssetReturnSeries::new("LOUD", vec![0.0, 0.02, -0.02, 0.0]);
        assert_relative_eq!(correlation(&quiet, &loud), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_inverse_price_paths() {
        let a = AssetReturnSeries::from_prices("A", &[100.0, 110.0, 121.0]);
        let b = AssetReturnSeries::from_prices("B", &[100.0, 121.0, 110.0]);

        assert_eq!(a.returns(), build_return_series(&[100.0, 110.0, 121.0]).as_slice());
        assert_relative_eq!(a.returns()[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(a.returns()[1], 0.10, epsilon = 1e-12);
        assert_relative_eq!(b.returns()[0], 0.21, epsilon = 1e-12);
        assert_relative_eq!(b.returns()[1], -1.0 / 11.0, epsilon = 1e-12);

        // A's two returns are identical, so its window is flat and the
        // coefficient falls back to 0 despite the opposing moves.
        assert_eq!(correlation(&a, &b), 0.0);
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let matrix = correlation_matrix(&basket());

        for i in 0..matrix.len() {
            for j in 0..matrix.len() {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
    }

    #[test]
    fn test_matrix_diagonal_is_exactly_one() {
        let mut assets = basket();
        // Degenerate rows still get a unit diagonal
        assets.push(AssetReturnSeries::new("FLAT", vec![0.0, 0.0, 0.0]));
        assets.push(AssetReturnSeries::new("EMPTY", Vec::new()));

        let matrix = correlation_matrix(&assets);
        for i in 0..matrix.len() {
            assert_eq!(matrix.get(i, i), Some(1.0));
        }
    }

    #[test]
    fn test_matrix_matches_pairwise_correlation() {
        let assets = basket();
        let matrix = correlation_matrix(&assets);

        assert_eq!(matrix.symbols(), &["SPY", "QQQ", "TLT", "GLD"]);
        for i in 0..assets.len() {
            for j in (i + 1)..assets.len() {
                assert_eq!(matrix.get(i, j), Some(correlation(&assets[i], &assets[j])));
            }
        }

        // SPY and QQQ move together, TLT against them
        assert!(matrix.get_by_symbol("SPY", "QQQ").unwrap() > 0.9);
        assert!(matrix.get_by_symbol("SPY", "TLT").unwrap() < -0.5);
    }

    #[test]
    fn test_matrix_coefficients_in_bounds() {
        let matrix = correlation_matrix(&basket());
        assert!(matrix.validate(1e-12).is_ok());
        for row in matrix.rows() {
            for &value in row {
                assert_abs_diff_eq!(value.clamp(-1.0, 1.0), value, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = correlation_matrix(&[]);
        assert!(matrix.is_empty());
        assert!(matrix.rows().is_empty());
    }
}
