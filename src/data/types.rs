//! Core price data types.
//!
//! A run consumes a single immutable [`PriceSeries`]: one ordered
//! adjusted-close series per instrument. Dates are strictly increasing per
//! instrument and missing dates are simply absent; the run calendar is the
//! union of all instrument dates in range.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::error::EngineError;

/// Ordered (date, adjusted close) series for one instrument.
#[derive(Debug, Clone, Default)]
pub struct InstrumentSeries {
    dates: Vec<NaiveDate>,
    closes: Vec<f64>,
}

impl InstrumentSeries {
    /// Build a series from (date, close) pairs. Input is sorted by date and
    /// de-duplicated (last close wins for a repeated date).
    pub fn from_points(mut points: Vec<(NaiveDate, f64)>) -> Self {
        points.sort_by_key(|(d, _)| *d);
        points.dedup_by(|next, prev| {
            if next.0 == prev.0 {
                prev.1 = next.1;
                true
            } else {
                false
            }
        });
        let (dates, closes) = points.into_iter().unzip();
        Self { dates, closes }
    }

    /// Close on an exact date, if the instrument traded that day.
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|i| self.closes[i])
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Immutable map from instrument ticker to its price series.
///
/// `BTreeMap` keeps instrument iteration order deterministic, which the
/// ranking and trade log rely on.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    series: BTreeMap<String, InstrumentSeries>,
}

impl PriceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticker: impl Into<String>, series: InstrumentSeries) {
        self.series.insert(ticker.into(), series);
    }

    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, ticker: &str) -> Option<&InstrumentSeries> {
        self.series.get(ticker)
    }

    /// Close for `ticker` on an exact date.
    pub fn close(&self, ticker: &str, date: NaiveDate) -> Option<f64> {
        self.series.get(ticker)?.close_on(date)
    }

    /// Restrict to the requested tickers, failing on the first one absent
    /// from the loaded data.
    pub fn restrict(&self, tickers: &[String]) -> Result<PriceSeries, EngineError> {
        let mut out = PriceSeries::new();
        for ticker in tickers {
            let series = self
                .series
                .get(ticker)
                .ok_or_else(|| EngineError::MissingInstrument {
                    ticker: ticker.clone(),
                })?;
            out.insert(ticker.clone(), series.clone());
        }
        Ok(out)
    }

    /// Union trading calendar over `[start, end]` (inclusive): every date on
    /// which at least one instrument traded, in increasing order.
    pub fn calendar(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = BTreeSet::new();
        for series in self.series.values() {
            for &d in series.dates() {
                if d >= start && d <= end {
                    dates.insert(d);
                }
            }
        }
        dates.into_iter().collect()
    }
}
