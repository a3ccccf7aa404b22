//! Performance metrics.

mod calculator;

pub use calculator::{annualized_sharpe, daily_returns_from_equity, Metrics, MetricsCalculator};
