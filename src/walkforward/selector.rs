//! In-sample lookback selection.
//!
//! Simulates each candidate lookback over a window's training range and
//! keeps the one with the highest annualized Sharpe ratio. Ties go to the
//! smallest lookback. Candidates are scored in parallel.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::backtest::{PortfolioSimulator, SimulatorConfig};
use crate::config::WalkForwardParams;
use crate::data::PriceSeries;
use crate::error::EngineError;
use crate::metrics::annualized_sharpe;
use crate::walkforward::Window;

/// Outcome of selecting a lookback for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    pub window_index: usize,
    pub chosen_lookback: usize,
    /// In-sample Sharpe for every candidate that produced at least one
    /// scored rebalance.
    pub in_sample_sharpe_by_lookback: BTreeMap<usize, f64>,
}

/// Score every candidate lookback on the window's training range and pick
/// the best.
///
/// The simulation sees only the training slice of the calendar, so a
/// lookback longer than the training range cannot anchor any momentum
/// score and is disqualified. Fails when every candidate is disqualified.
pub fn select_lookback(
    prices: &PriceSeries,
    calendar: &[chrono::NaiveDate],
    window: &Window,
    params: &WalkForwardParams,
) -> Result<SelectionResult, EngineError> {
    let mut candidates = params.lookbacks.clone();
    candidates.sort_unstable();
    candidates.dedup();

    let train_calendar = &calendar[window.train_range()];

    let scored: Vec<(usize, Option<f64>)> = candidates
        .par_iter()
        .map(|&lookback| {
            let simulator = PortfolioSimulator::new(SimulatorConfig {
                lookback,
                top_k: params.top_k,
                rebalance_days: params.rebalance_days,
                fee_bps: params.fee_bps,
            });
            let result = simulator.run(prices, train_calendar, 0..train_calendar.len());
            if result.scored_rebalances == 0 {
                return (lookback, None);
            }
            let returns: Vec<f64> = result.returns.iter().map(|r| r.value).collect();
            (lookback, Some(annualized_sharpe(&returns)))
        })
        .collect();

    let mut by_lookback = BTreeMap::new();
    let mut best: Option<(usize, f64)> = None;
    for (lookback, sharpe) in scored {
        let Some(sharpe) = sharpe else { continue };
        by_lookback.insert(lookback, sharpe);
        // strict comparison plus ascending order breaks ties toward the
        // smallest lookback
        match best {
            Some((_, best_sharpe)) if sharpe <= best_sharpe => {}
            _ => best = Some((lookback, sharpe)),
        }
    }

    let Some((chosen_lookback, _)) = best else {
        return Err(EngineError::NoValidLookback {
            window_index: window.index,
        });
    };

    Ok(SelectionResult {
        window_index: window.index,
        chosen_lookback,
        in_sample_sharpe_by_lookback: by_lookback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InstrumentSeries;
    use crate::walkforward::generate_windows;
    use chrono::{Duration, NaiveDate};

    fn ramp_prices(n: usize) -> (PriceSeries, Vec<NaiveDate>) {
        let start: NaiveDate = "2020-01-01".parse().unwrap();
        let dates: Vec<NaiveDate> =
            (0..n).map(|i| start + Duration::days(i as i64)).collect();
        let mut prices = PriceSeries::new();
        prices.insert(
            "AAA".to_string(),
            InstrumentSeries::from_points(
                dates.iter().map(|&d| (d, 100.0)).collect(),
            ),
        );
        (prices, dates)
    }

    fn params(lookbacks: Vec<usize>) -> WalkForwardParams {
        WalkForwardParams {
            lookbacks,
            top_k: 1,
            rebalance_days: 5,
            fee_bps: 0.0,
            ..WalkForwardParams::default()
        }
    }

    #[test]
    fn test_tie_breaks_to_smallest_lookback() {
        // flat prices give identical (zero-Sharpe) series for every lookback
        let (prices, dates) = ramp_prices(200);
        let windows = generate_windows(&dates, 100, 40, 40).unwrap();
        let selection =
            select_lookback(&prices, &dates, &windows[0], &params(vec![60, 20, 40]))
                .unwrap();
        assert_eq!(selection.chosen_lookback, 20);
        assert_eq!(selection.in_sample_sharpe_by_lookback.len(), 3);
    }

    #[test]
    fn test_too_long_lookbacks_are_disqualified() {
        let (prices, dates) = ramp_prices(200);
        let windows = generate_windows(&dates, 100, 40, 40).unwrap();
        let selection =
            select_lookback(&prices, &dates, &windows[0], &params(vec![20, 500]))
                .unwrap();
        assert_eq!(selection.chosen_lookback, 20);
        assert!(!selection.in_sample_sharpe_by_lookback.contains_key(&500));
    }

    #[test]
    fn test_no_valid_lookback() {
        let (prices, dates) = ramp_prices(200);
        let windows = generate_windows(&dates, 100, 40, 40).unwrap();
        let err = select_lookback(&prices, &dates, &windows[0], &params(vec![500]))
            .unwrap_err();
        assert!(matches!(err, EngineError::NoValidLookback { window_index: 0 }));
    }
}
