//! Train/test window generation.
//!
//! Partitions the run calendar into rolling (train, test) pairs. Spans are
//! counted in trading days of the calendar; the boundary is half-open, so
//! `train_end == test_start`.

use std::ops::Range;

use chrono::NaiveDate;

use crate::error::EngineError;

/// One walk-forward window over the run calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Window number (0-indexed).
    pub index: usize,
    /// Training range start date.
    pub train_start: NaiveDate,
    /// Training range end date (exclusive; same date as `test_start`).
    pub train_end: NaiveDate,
    /// Test range start date.
    pub test_start: NaiveDate,
    /// Test range end date (exclusive).
    pub test_end: NaiveDate,
    train_offsets: (usize, usize),
    test_offsets: (usize, usize),
}

impl Window {
    /// Calendar offsets of the training range, half-open.
    pub fn train_range(&self) -> Range<usize> {
        self.train_offsets.0..self.train_offsets.1
    }

    /// Calendar offsets of the test range, half-open.
    pub fn test_range(&self) -> Range<usize> {
        self.test_offsets.0..self.test_offsets.1
    }
}

/// Generate all windows that fit on `calendar`.
///
/// Window 0 trains on the first `train_days` trading days and tests on the
/// following `test_days`; each subsequent window rolls the whole pair
/// forward by `rebalance_days`. Generation stops before a window whose test
/// range would run past the calendar, and fails when not even one window
/// fits.
pub fn generate_windows(
    calendar: &[NaiveDate],
    train_days: usize,
    test_days: usize,
    rebalance_days: usize,
) -> Result<Vec<Window>, EngineError> {
    if train_days == 0 || test_days == 0 || rebalance_days == 0 {
        return Err(EngineError::InvalidParams(
            "train_days, test_days and rebalance_days must be positive".into(),
        ));
    }

    let mut windows = Vec::new();
    let mut cursor = 0;
    loop {
        let train_end = cursor + train_days;
        let test_end = train_end + test_days;
        // the test range's exclusive end must itself land on a trading day,
        // so the last step of the test simulation stays on the calendar
        if test_end >= calendar.len() {
            break;
        }
        windows.push(Window {
            index: windows.len(),
            train_start: calendar[cursor],
            train_end: calendar[train_end],
            test_start: calendar[train_end],
            test_end: calendar[test_end],
            train_offsets: (cursor, train_end),
            test_offsets: (train_end, test_end),
        });
        cursor += rebalance_days;
    }

    if windows.is_empty() {
        return Err(EngineError::InsufficientData(format!(
            "{} trading days cannot fit train {} + test {} days",
            calendar.len(),
            train_days,
            test_days
        )));
    }
    Ok(windows)
}
