//! Performance metrics over the chained out-of-sample equity curve.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::walkforward::EquityPoint;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Summary statistics of an equity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Compound annual growth rate, as a fraction.
    pub cagr: f64,
    /// Annualized volatility of daily returns.
    pub ann_vol: f64,
    /// Annualized Sharpe ratio (zero risk-free rate).
    pub sharpe: f64,
    /// Annualized Sortino ratio (downside deviation denominator).
    pub sortino: f64,
    /// Worst peak-to-trough drawdown, as a negative fraction.
    pub max_drawdown: f64,
}

/// Annualized Sharpe of a series of daily returns.
///
/// Uses the population standard deviation. A flat series has no risk and
/// scores zero rather than dividing by zero.
pub fn annualized_sharpe(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    let std = variance.sqrt();
    if std == 0.0 {
        return 0.0;
    }
    mean / std * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Daily simple returns implied by an equity curve.
pub fn daily_returns_from_equity(equity: &[EquityPoint]) -> Vec<f64> {
    equity
        .windows(2)
        .map(|w| w[1].equity / w[0].equity - 1.0)
        .collect()
}

/// Metrics calculator.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Calculate all metrics from an equity curve.
    ///
    /// Needs at least two points to form one return.
    pub fn calculate(equity: &[EquityPoint]) -> Result<Metrics, EngineError> {
        if equity.len() < 2 {
            return Err(EngineError::DegenerateSeries {
                points: equity.len(),
            });
        }

        let returns = daily_returns_from_equity(equity);
        let mean = returns.iter().sum::<f64>() / returns.len() as f64;
        let variance =
            returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
        let ann_vol = variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt();

        Ok(Metrics {
            cagr: Self::calculate_cagr(equity[0].equity, equity[equity.len() - 1].equity, returns.len()),
            ann_vol,
            sharpe: annualized_sharpe(&returns),
            sortino: Self::calculate_sortino(&returns),
            max_drawdown: Self::calculate_max_drawdown(equity),
        })
    }

    fn calculate_cagr(initial: f64, final_equity: f64, num_returns: usize) -> f64 {
        if initial <= 0.0 || num_returns == 0 {
            return 0.0;
        }
        let years = num_returns as f64 / TRADING_DAYS_PER_YEAR;
        (final_equity / initial).powf(1.0 / years) - 1.0
    }

    /// Sortino ratio: mean return over downside deviation, where the
    /// downside deviation pools squared negative returns over the full
    /// sample size.
    fn calculate_sortino(returns: &[f64]) -> f64 {
        if returns.is_empty() {
            return 0.0;
        }
        let mean = returns.iter().sum::<f64>() / returns.len() as f64;
        let downside_variance = returns
            .iter()
            .filter(|&&r| r < 0.0)
            .map(|r| r.powi(2))
            .sum::<f64>()
            / returns.len() as f64;
        let downside_dev = downside_variance.sqrt();
        if downside_dev == 0.0 {
            return 0.0;
        }
        mean / downside_dev * TRADING_DAYS_PER_YEAR.sqrt()
    }

    fn calculate_max_drawdown(equity: &[EquityPoint]) -> f64 {
        let mut peak = f64::MIN;
        let mut worst = 0.0_f64;
        for point in equity {
            peak = peak.max(point.equity);
            worst = worst.min(point.equity / peak - 1.0);
        }
        worst
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn curve(values: &[f64]) -> Vec<EquityPoint> {
        let start: NaiveDate = "2020-01-01".parse().unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &equity)| EquityPoint {
                date: start + Duration::days(i as i64),
                equity,
            })
            .collect()
    }

    #[test]
    fn test_sharpe_of_flat_series_is_zero() {
        assert_eq!(annualized_sharpe(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(annualized_sharpe(&[0.01, 0.01, 0.01]), 0.0);
        assert_eq!(annualized_sharpe(&[]), 0.0);
    }

    #[test]
    fn test_sharpe_sign_follows_mean() {
        assert!(annualized_sharpe(&[0.01, 0.02, -0.005]) > 0.0);
        assert!(annualized_sharpe(&[-0.01, -0.02, 0.005]) < 0.0);
    }

    #[test]
    fn test_monotone_curve_has_zero_drawdown() {
        let metrics = MetricsCalculator::calculate(&curve(&[1.0, 1.01, 1.02, 1.05])).unwrap();
        assert_eq!(metrics.max_drawdown, 0.0);
        assert!(metrics.cagr > 0.0);
        assert_eq!(metrics.sortino, 0.0);
    }

    #[test]
    fn test_max_drawdown_value() {
        // peak 1.2, trough 0.9 -> -25%
        let metrics =
            MetricsCalculator::calculate(&curve(&[1.0, 1.2, 0.9, 1.3])).unwrap();
        assert!((metrics.max_drawdown + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_cagr() {
        // doubling over 252 returns is a 100% CAGR
        let mut values = vec![1.0; 253];
        values[252] = 2.0;
        let metrics = MetricsCalculator::calculate(&curve(&values)).unwrap();
        assert!((metrics.cagr - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_series() {
        let err = MetricsCalculator::calculate(&curve(&[1.0])).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateSeries { points: 1 }));
    }
}
