//! Run parameters for a walk-forward backtest.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Resolved input parameters for one walk-forward run.
///
/// The restatement of these values is part of the run's artifact set, so
/// the struct serializes exactly as it was resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardParams {
    /// Instruments to rank (uppercase tickers).
    pub tickers: Vec<String>,
    /// First calendar date of the run (inclusive).
    pub start: NaiveDate,
    /// Last calendar date of the run (inclusive).
    pub end: NaiveDate,
    /// Training window length in trading days.
    pub train_days: usize,
    /// Test window length in trading days.
    pub test_days: usize,
    /// Spacing between rebalances, and the roll step between windows.
    pub rebalance_days: usize,
    /// Candidate momentum lookbacks in trading days (duplicates ignored).
    pub lookbacks: Vec<usize>,
    /// Number of instruments held at each rebalance.
    pub top_k: usize,
    /// Fee in basis points applied to turnover at each rebalance.
    pub fee_bps: f64,
}

impl Default for WalkForwardParams {
    fn default() -> Self {
        Self {
            tickers: ["SPY", "QQQ", "IWM", "EFA", "TLT", "GLD"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            start: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            train_days: 504,
            test_days: 63,
            rebalance_days: 5,
            lookbacks: vec![20, 40, 60, 90, 120, 180, 252],
            top_k: 1,
            fee_bps: 5.0,
        }
    }
}

impl WalkForwardParams {
    /// Validate field constraints before a run starts.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.tickers.is_empty() {
            return Err(EngineError::InvalidParams("tickers must be non-empty".into()));
        }
        if self.start > self.end {
            return Err(EngineError::InvalidParams(format!(
                "start {} is after end {}",
                self.start, self.end
            )));
        }
        if self.train_days == 0 || self.test_days == 0 || self.rebalance_days == 0 {
            return Err(EngineError::InvalidParams(
                "train_days, test_days and rebalance_days must be positive".into(),
            ));
        }
        if self.lookbacks.is_empty() || self.lookbacks.contains(&0) {
            return Err(EngineError::InvalidParams(
                "lookbacks must be a non-empty set of positive day counts".into(),
            ));
        }
        if self.top_k == 0 {
            return Err(EngineError::InvalidParams("top_k must be positive".into()));
        }
        if !self.fee_bps.is_finite() || self.fee_bps < 0.0 {
            return Err(EngineError::InvalidParams(format!(
                "fee_bps must be a non-negative number, got {}",
                self.fee_bps
            )));
        }
        Ok(())
    }
}
