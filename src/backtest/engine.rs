//! Portfolio simulator.
//!
//! Runs the momentum strategy over one calendar range:
//! 1. On each rebalance date, rank instruments by momentum score
//! 2. Hold the top K equal-weighted, flat, no leverage
//! 3. Charge the fee rate against turnover at each rebalance
//! 4. Accrue weighted daily returns between rebalances
//!
//! The simulation is a pure function of its inputs: no randomness, no
//! shared state, deterministic instrument ordering throughout.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Range;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::PriceSeries;
use crate::returns;

use super::trade::{Trade, TradeAction};

/// Strategy parameters for one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Momentum lookback in trading days.
    pub lookback: usize,
    /// Number of instruments held at each rebalance.
    pub top_k: usize,
    /// Trading days between rebalances; the first rebalance is on the
    /// range's start date.
    pub rebalance_days: usize,
    /// Fee in basis points applied to turnover at each rebalance.
    pub fee_bps: f64,
}

/// Portfolio return over one trading-day step, dated by the day arrived at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyReturn {
    pub date: NaiveDate,
    pub value: f64,
}

/// Output of one simulation over a calendar range.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// One entry per trading-day step out of the range's start date.
    pub returns: Vec<DailyReturn>,
    /// Position changes at every rebalance, in (date, ticker) order.
    pub trades: Vec<Trade>,
    /// Rebalance dates on which at least one instrument had a valid
    /// momentum score.
    pub scored_rebalances: usize,
}

/// Simulates the equal-weight top-K momentum strategy.
pub struct PortfolioSimulator {
    config: SimulatorConfig,
}

impl PortfolioSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Run over `calendar[range]`, seeded flat on the range's first date.
    ///
    /// Momentum anchors may reach before `range.start` (but never before
    /// the start of `calendar`); passing a training slice as the whole
    /// calendar is how callers restrict the visible history. The last step
    /// leaves the range only when `calendar` extends one day past it, so a
    /// test range `[s, e)` with `e < calendar.len()` yields `e - s` steps
    /// while a full-slice training range yields `len - 1`.
    pub fn run(
        &self,
        prices: &PriceSeries,
        calendar: &[NaiveDate],
        range: Range<usize>,
    ) -> SimulationResult {
        let fee_rate = self.config.fee_bps / 10_000.0;
        let last = range.end.min(calendar.len().saturating_sub(1));

        let mut weights: BTreeMap<String, f64> = BTreeMap::new();
        let mut trades = Vec::new();
        let mut daily = Vec::with_capacity(last.saturating_sub(range.start));
        let mut scored_rebalances = 0;

        for k in range.start..last {
            let mut fee = 0.0;
            if (k - range.start) % self.config.rebalance_days == 0 {
                let target = self.target_weights(prices, calendar, k);
                if !target.is_empty() {
                    scored_rebalances += 1;
                }
                fee = self.apply_rebalance(calendar[k], &mut weights, target, fee_rate, &mut trades);
            }

            // Weighted sum of held instruments' returns into the next day;
            // a missing price contributes zero and the weight stays frozen.
            let mut value = -fee;
            for (ticker, weight) in &weights {
                if *weight == 0.0 {
                    continue;
                }
                if let Some(r) = returns::daily_return(prices, ticker, calendar, k + 1) {
                    value += weight * r;
                }
            }
            daily.push(DailyReturn {
                date: calendar[k + 1],
                value,
            });
        }

        SimulationResult {
            returns: daily,
            trades,
            scored_rebalances,
        }
    }

    /// Equal weights over the top K instruments by momentum as of
    /// `calendar[k]`. Instruments without a valid score are excluded; if
    /// fewer than K remain, the survivors split the weight. Empty when
    /// nothing scores.
    fn target_weights(
        &self,
        prices: &PriceSeries,
        calendar: &[NaiveDate],
        k: usize,
    ) -> BTreeMap<String, f64> {
        let mut scores = returns::momentum_scores(prices, calendar, k, self.config.lookback);
        // rank descending, ties broken by ticker for determinism
        scores.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scores.truncate(self.config.top_k);

        if scores.is_empty() {
            return BTreeMap::new();
        }
        let weight = 1.0 / scores.len() as f64;
        scores.into_iter().map(|(t, _)| (t, weight)).collect()
    }

    /// Move to the target weights, logging one trade per changed position
    /// and returning the total fee charged on the turnover.
    fn apply_rebalance(
        &self,
        date: NaiveDate,
        weights: &mut BTreeMap<String, f64>,
        target: BTreeMap<String, f64>,
        fee_rate: f64,
        trades: &mut Vec<Trade>,
    ) -> f64 {
        let mut turnover = 0.0;
        let tickers: Vec<String> = weights
            .keys()
            .chain(target.keys())
            .cloned()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();

        for ticker in tickers {
            let before = weights.get(&ticker).copied().unwrap_or(0.0);
            let after = target.get(&ticker).copied().unwrap_or(0.0);
            if before == after {
                continue;
            }
            let delta = (after - before).abs();
            turnover += delta;
            trades.push(Trade {
                date,
                instrument: ticker,
                action: TradeAction::from_weights(before, after),
                weight_before: before,
                weight_after: after,
                fee_paid: fee_rate * delta,
            });
        }

        *weights = target;
        fee_rate * turnover
    }
}
