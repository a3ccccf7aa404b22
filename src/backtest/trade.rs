//! Trade log types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What happened to a position at a rebalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Enter,
    Exit,
    Rebalance,
}

impl TradeAction {
    /// Classify a weight change.
    pub fn from_weights(before: f64, after: f64) -> Self {
        if before == 0.0 {
            Self::Enter
        } else if after == 0.0 {
            Self::Exit
        } else {
            Self::Rebalance
        }
    }
}

/// One position change in the append-only trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub instrument: String,
    pub action: TradeAction,
    pub weight_before: f64,
    pub weight_after: f64,
    /// Fee attributed to this position change: `fee_rate * |Δweight|`.
    pub fee_paid: f64,
}
