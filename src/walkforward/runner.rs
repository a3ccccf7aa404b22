//! Walk-forward driver.
//!
//! Generates windows, re-selects the lookback per window in-sample, runs the
//! chosen configuration out-of-sample, and chains the test-range equity
//! paths into a single curve starting at 1.0.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backtest::{PortfolioSimulator, SimulatorConfig, Trade};
use crate::config::WalkForwardParams;
use crate::data::PriceSeries;
use crate::error::EngineError;
use crate::metrics::{Metrics, MetricsCalculator};
use crate::walkforward::{generate_windows, select_lookback, SelectionResult};

/// One point of the chained out-of-sample equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Per-window summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub window_index: usize,
    pub train_start: NaiveDate,
    pub train_end: NaiveDate,
    pub test_start: NaiveDate,
    pub test_end: NaiveDate,
    pub chosen_lookback: usize,
    pub train_sharpe: f64,
}

/// Full output of one walk-forward run.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkForwardReport {
    pub params: WalkForwardParams,
    pub windows: Vec<WindowRecord>,
    pub selections: Vec<SelectionResult>,
    pub trades: Vec<Trade>,
    pub equity: Vec<EquityPoint>,
    pub metrics: Metrics,
}

/// Run the whole walk-forward study on `prices`.
///
/// Each window's lookback is chosen on its training range alone, then a
/// fresh simulation of the test range is folded into the chained equity
/// curve. When windows overlap (the roll step is shorter than the test
/// span), only the first `rebalance_days` steps of each window count, so
/// every trading day of the out-of-sample period is covered exactly once;
/// the last window contributes its full path.
pub fn run_walkforward(
    prices: &PriceSeries,
    params: &WalkForwardParams,
) -> Result<WalkForwardReport, EngineError> {
    params.validate()?;

    let prices = prices.restrict(&params.tickers)?;
    let calendar = prices.calendar(params.start, params.end);
    if calendar.is_empty() {
        return Err(EngineError::InsufficientData(format!(
            "no trading days between {} and {}",
            params.start, params.end
        )));
    }

    let windows = generate_windows(
        &calendar,
        params.train_days,
        params.test_days,
        params.rebalance_days,
    )?;
    info!(
        windows = windows.len(),
        trading_days = calendar.len(),
        "generated walk-forward windows"
    );

    let mut records = Vec::with_capacity(windows.len());
    let mut selections = Vec::with_capacity(windows.len());
    let mut trades = Vec::new();
    let mut equity = Vec::new();
    let mut accumulator = 1.0_f64;

    let last_index = windows.len() - 1;
    for window in &windows {
        let selection = select_lookback(&prices, &calendar, window, params)?;
        let train_sharpe = selection.in_sample_sharpe_by_lookback
            [&selection.chosen_lookback];
        info!(
            window = window.index,
            lookback = selection.chosen_lookback,
            train_sharpe,
            "selected lookback"
        );

        let simulator = PortfolioSimulator::new(SimulatorConfig {
            lookback: selection.chosen_lookback,
            top_k: params.top_k,
            rebalance_days: params.rebalance_days,
            fee_bps: params.fee_bps,
        });
        let result = simulator.run(&prices, &calendar, window.test_range());

        let contributed = if window.index == last_index {
            result.returns.len()
        } else {
            params.rebalance_days.min(result.returns.len())
        };

        let seed = EquityPoint {
            date: window.test_start,
            equity: accumulator,
        };
        if equity.last().map(|p: &EquityPoint| p.date) != Some(seed.date) {
            equity.push(seed);
        }
        for step in &result.returns[..contributed] {
            accumulator *= 1.0 + step.value;
            equity.push(EquityPoint {
                date: step.date,
                equity: accumulator,
            });
        }

        let cutoff = calendar[window.test_range().start + contributed];
        trades.extend(result.trades.into_iter().filter(|t| t.date < cutoff));

        records.push(WindowRecord {
            window_index: window.index,
            train_start: window.train_start,
            train_end: window.train_end,
            test_start: window.test_start,
            test_end: window.test_end,
            chosen_lookback: selection.chosen_lookback,
            train_sharpe,
        });
        selections.push(selection);
    }

    let metrics = MetricsCalculator::calculate(&equity)?;
    info!(
        final_equity = equity.last().map(|p| p.equity).unwrap_or(1.0),
        sharpe = metrics.sharpe,
        "walk-forward run complete"
    );

    Ok(WalkForwardReport {
        params: params.clone(),
        windows: records,
        selections,
        trades,
        equity,
        metrics,
    })
}
