//! Momentum portfolio simulation.
//!
//! This module provides the strategy state machine driven by the
//! walk-forward layer:
//! - Momentum ranking and top-K selection per rebalance
//! - Turnover-based fee accounting
//! - Daily portfolio return accrual with frozen weights on missing prices
//! - Append-only trade log

pub mod engine;
pub mod trade;

pub use engine::{DailyReturn, PortfolioSimulator, SimulationResult, SimulatorConfig};
pub use trade::{Trade, TradeAction};
