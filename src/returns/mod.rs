//! Return engine: daily simple returns and rolling momentum scores.
//!
//! Both are evaluated against an explicit trading calendar (a slice of
//! increasing dates). Lookbacks and the one-day return offset count
//! positions on that calendar, not calendar days, so a holiday or a gap in
//! one instrument's history never shifts another instrument's anchor.

use chrono::NaiveDate;

use crate::data::PriceSeries;

/// Momentum score for one instrument as of `dates[i]`:
/// `price(dates[i]) / price(dates[i - lookback]) - 1`.
///
/// `None` when the lookback reaches past the start of the calendar or when
/// the instrument has no price on either date; callers exclude such
/// instruments from ranking on that date only.
pub fn momentum_score(
    prices: &PriceSeries,
    ticker: &str,
    dates: &[NaiveDate],
    i: usize,
    lookback: usize,
) -> Option<f64> {
    if lookback == 0 || i < lookback {
        return None;
    }
    let now = prices.close(ticker, dates[i])?;
    let then = prices.close(ticker, dates[i - lookback])?;
    if then <= 0.0 {
        return None;
    }
    Some(now / then - 1.0)
}

/// Valid momentum scores for every instrument as of `dates[i]`, in
/// deterministic ticker order. Instruments without a defined score are
/// absent from the result.
pub fn momentum_scores(
    prices: &PriceSeries,
    dates: &[NaiveDate],
    i: usize,
    lookback: usize,
) -> Vec<(String, f64)> {
    prices
        .instruments()
        .filter_map(|ticker| {
            momentum_score(prices, ticker, dates, i, lookback).map(|s| (ticker.to_string(), s))
        })
        .collect()
}

/// Daily simple return for one instrument into `dates[i]`:
/// `price(dates[i]) / price(dates[i - 1]) - 1`.
///
/// `None` on the first calendar date or when either day's price is missing.
pub fn daily_return(
    prices: &PriceSeries,
    ticker: &str,
    dates: &[NaiveDate],
    i: usize,
) -> Option<f64> {
    momentum_score(prices, ticker, dates, i, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InstrumentSeries;
    use chrono::Duration;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn calendar(n: usize) -> Vec<NaiveDate> {
        let start = d("2020-01-01");
        (0..n).map(|i| start + Duration::days(i as i64)).collect()
    }

    fn ramp(dates: &[NaiveDate], skip: Option<NaiveDate>) -> PriceSeries {
        let points: Vec<_> = dates
            .iter()
            .enumerate()
            .filter(|(_, day)| Some(**day) != skip)
            .map(|(i, day)| (*day, 100.0 + i as f64))
            .collect();
        let mut prices = PriceSeries::new();
        prices.insert("AAA", InstrumentSeries::from_points(points));
        prices
    }

    #[test]
    fn test_momentum_score_over_lookback() {
        let dates = calendar(10);
        let prices = ramp(&dates, None);

        // price 105 vs 100, five days back
        let score = momentum_score(&prices, "AAA", &dates, 5, 5).unwrap();
        assert!((score - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_momentum_undefined_before_lookback() {
        let dates = calendar(10);
        let prices = ramp(&dates, None);
        assert!(momentum_score(&prices, "AAA", &dates, 4, 5).is_none());
    }

    #[test]
    fn test_missing_anchor_excludes_that_date_only() {
        let dates = calendar(10);
        // no price on the anchor date of a 5-day lookback as of dates[7]
        let prices = ramp(&dates, Some(dates[2]));

        assert!(momentum_score(&prices, "AAA", &dates, 7, 5).is_none());
        // adjacent dates still score
        assert!(momentum_score(&prices, "AAA", &dates, 6, 5).is_some());
        assert!(momentum_score(&prices, "AAA", &dates, 8, 5).is_some());
    }

    #[test]
    fn test_daily_return_first_date_has_none() {
        let dates = calendar(3);
        let prices = ramp(&dates, None);
        assert!(daily_return(&prices, "AAA", &dates, 0).is_none());
        let r = daily_return(&prices, "AAA", &dates, 1).unwrap();
        assert!((r - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_scores_keep_ticker_order() {
        let dates = calendar(10);
        let mut prices = ramp(&dates, None);
        let points: Vec<_> = dates
            .iter()
            .enumerate()
            .map(|(i, day)| (*day, 200.0 - i as f64))
            .collect();
        prices.insert("BBB", InstrumentSeries::from_points(points));

        let scores = momentum_scores(&prices, &dates, 6, 5);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].0, "AAA");
        assert_eq!(scores[1].0, "BBB");
        assert!(scores[0].1 > 0.0);
        assert!(scores[1].1 < 0.0);
    }
}
