//! Display-ready summaries of a risk report.
//!
//! The dashboard renders these strings directly on its risk cards and in the
//! correlation heatmap legend.

use crate::types::{CorrelationMatrix, PortfolioRiskMetrics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse volatility bucket for a risk card badge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl RiskLevel {
    /// Bucket an annualized volatility (fraction).
    ///
    /// Below 10% is low, below 20% moderate, below 35% high, else severe.
    pub fn from_volatility(volatility: f64) -> Self {
        if volatility < 0.10 {
            RiskLevel::Low
        } else if volatility < 0.20 {
            RiskLevel::Moderate
        } else if volatility < 0.35 {
            RiskLevel::High
        } else {
            RiskLevel::Severe
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Severe => "Severe",
        };
        f.write_str(label)
    }
}

/// Formatted risk card values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskSummary {
    pub volatility: String,
    pub diversification: String,
    pub beta: String,
    pub sharpe_ratio: String,
    pub annualized_return: String,
    /// Suffixed with "(est.)" when the drawdown is approximate
    pub max_drawdown: String,
    pub risk_level: RiskLevel,
}

impl RiskSummary {
    pub fn from_metrics(metrics: &PortfolioRiskMetrics) -> Self {
        let drawdown = format_percent(metrics.max_drawdown.value());
        let max_drawdown = if metrics.max_drawdown.is_approximate() {
            format!("{} (est.)", drawdown)
        } else {
            drawdown
        };

        Self {
            volatility: format_percent(metrics.volatility),
            diversification: format_percent(metrics.diversification_score),
            beta: format_ratio(metrics.beta),
            sharpe_ratio: format_ratio(metrics.sharpe_ratio),
            annualized_return: format_percent(metrics.annualized_return),
            max_drawdown,
            risk_level: RiskLevel::from_volatility(metrics.volatility),
        }
    }
}

/// Format a fraction as a percentage with two decimals (0.1234 -> "12.34%").
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format a ratio with two decimals.
pub fn format_ratio(value: f64) -> String {
    format!("{:.2}", value)
}

/// Heatmap legend wording for a correlation coefficient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    StrongPositive,
    ModeratePositive,
    Weak,
    ModerateNegative,
    StrongNegative,
}

impl CorrelationStrength {
    /// |ρ| >= 0.7 is strong, >= 0.3 moderate, anything else weak.
    pub fn from_coefficient(rho: f64) -> Self {
        let magnitude = rho.abs();
        if magnitude >= 0.7 {
            if rho > 0.0 {
                CorrelationStrength::StrongPositive
            } else {
                CorrelationStrength::StrongNegative
            }
        } else if magnitude >= 0.3 {
            if rho > 0.0 {
                CorrelationStrength::ModeratePositive
            } else {
                CorrelationStrength::ModerateNegative
            }
        } else {
            CorrelationStrength::Weak
        }
    }
}

/// One off-diagonal cell of the correlation matrix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationPair {
    pub first: String,
    pub second: String,
    pub coefficient: f64,
    pub strength: CorrelationStrength,
}

/// Unique asset pairs of a matrix, strongest relationship first.
pub fn correlation_pairs(matrix: &CorrelationMatrix) -> Vec<CorrelationPair> {
    let symbols = matrix.symbols();
    let mut pairs = Vec::new();

    for (i, row) in matrix.rows().iter().enumerate() {
        for (j, &coefficient) in row.iter().enumerate().skip(i + 1) {
            pairs.push(CorrelationPair {
                first: symbols[i].clone(),
                second: symbols[j].clone(),
                coefficient,
                strength: CorrelationStrength::from_coefficient(coefficient),
            });
        }
    }

    pairs.sort_by(|a, b| {
        b.coefficient
            .abs()
            .partial_cmp(&a.coefficient.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DrawdownEstimate;

    fn sample_metrics(drawdown: DrawdownEstimate) -> PortfolioRiskMetrics {
        PortfolioRiskMetrics {
            volatility: 0.1834,
            diversification_score: 0.2519,
            beta: 1.1049,
            sharpe_ratio: -0.1234,
            annualized_return: 0.01707,
            max_drawdown: drawdown,
            correlation_matrix: CorrelationMatrix::from_parts(
                vec!["SPY".to_string(), "QQQ".to_string(), "TLT".to_string()],
                vec![
                    vec![1.0, 0.92, -0.41],
                    vec![0.92, 1.0, 0.05],
                    vec![-0.41, 0.05, 1.0],
                ],
            ),
        }
    }

    #[test]
    fn test_summary_formatting() {
        let summary = RiskSummary::from_metrics(&sample_metrics(DrawdownEstimate::Observed(0.2)));

        assert_eq!(summary.volatility, "18.34%");
        assert_eq!(summary.diversification, "25.19%");
        assert_eq!(summary.beta, "1.10");
        assert_eq!(summary.sharpe_ratio, "-0.12");
        assert_eq!(summary.annualized_return, "1.71%");
        assert_eq!(summary.max_drawdown, "20.00%");
        assert_eq!(summary.risk_level, RiskLevel::Moderate);
    }

    #[test]
    fn test_summary_labels_approximate_drawdown() {
        let summary =
            RiskSummary::from_metrics(&sample_metrics(DrawdownEstimate::Approximate(0.3668)));
        assert_eq!(summary.max_drawdown, "36.68% (est.)");
    }

    #[test]
    fn test_risk_level_buckets() {
        assert_eq!(RiskLevel::from_volatility(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_volatility(0.099), RiskLevel::Low);
        assert_eq!(RiskLevel::from_volatility(0.10), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_volatility(0.25), RiskLevel::High);
        assert_eq!(RiskLevel::from_volatility(0.80), RiskLevel::Severe);
        assert_eq!(RiskLevel::Severe.to_string(), "Severe");
    }

    #[test]
    fn test_correlation_strength() {
        assert_eq!(
            CorrelationStrength::from_coefficient(1.0),
            CorrelationStrength::StrongPositive
        );
        assert_eq!(
            CorrelationStrength::from_coefficient(-0.75),
            CorrelationStrength::StrongNegative
        );
        assert_eq!(
            CorrelationStrength::from_coefficient(0.3),
            CorrelationStrength::ModeratePositive
        );
        assert_eq!(
            CorrelationStrength::from_coefficient(-0.5),
            CorrelationStrength::ModerateNegative
        );
        assert_eq!(CorrelationStrength::from_coefficient(0.0), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::from_coefficient(-0.29), CorrelationStrength::Weak);
    }

    #[test]
    fn test_correlation_pairs_sorted_by_magnitude() {
        let metrics = sample_metrics(DrawdownEstimate::Observed(0.0));
        let pairs = correlation_pairs(&metrics.correlation_matrix);

        assert_eq!(pairs.len(), 3);
        assert_eq!((pairs[0].first.as_str(), pairs[0].second.as_str()), ("SPY", "QQQ"));
        assert_eq!(pairs[0].strength, CorrelationStrength::StrongPositive);
        assert_eq!(pairs[1].coefficient, -0.41);
        assert_eq!(pairs[1].strength, CorrelationStrength::ModerateNegative);
        assert_eq!(pairs[2].strength, CorrelationStrength::Weak);
    }

    #[test]
    fn test_correlation_pairs_empty() {
        let matrix = CorrelationMatrix::from_parts(vec!["A".to_string()], vec![vec![1.0]]);
        assert!(correlation_pairs(&matrix).is_empty());
    }
}
