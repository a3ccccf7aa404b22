//! CSV price loader.
//!
//! Loads one `{TICKER}.csv` per instrument from a data directory into the
//! type system. The files follow the Stooq daily-history schema:
//!
//! ```text
//! Date,Open,High,Low,Close,Volume
//! 2015-01-02,205.43,206.88,204.18,205.43,121465900
//! ```
//!
//! Only `Date` and `Close` are consumed; other columns are ignored.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::types::{InstrumentSeries, PriceSeries};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One row of a daily-history CSV. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Close")]
    close: f64,
}

/// Loader for per-ticker daily close CSV files.
pub struct PriceLoader {
    data_dir: PathBuf,
}

impl PriceLoader {
    /// Create a loader pointing at a directory of `{TICKER}.csv` files.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", ticker.to_uppercase()))
    }

    /// Load the price series for every requested ticker.
    pub fn load(&self, tickers: &[String]) -> Result<PriceSeries, LoaderError> {
        let mut prices = PriceSeries::new();
        for ticker in tickers {
            let ticker = ticker.to_uppercase();
            let series = self.load_one(&ticker)?;
            debug!(ticker = %ticker, rows = series.len(), "loaded price series");
            prices.insert(ticker, series);
        }
        Ok(prices)
    }

    fn load_one(&self, ticker: &str) -> Result<InstrumentSeries, LoaderError> {
        let path = self.csv_path(ticker);
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.display().to_string()));
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let mut points = Vec::new();
        for row in reader.deserialize::<PriceRow>() {
            let row = row?;
            if !row.close.is_finite() || row.close <= 0.0 {
                return Err(LoaderError::InvalidData(format!(
                    "{}: non-positive close {} on {}",
                    ticker, row.close, row.date
                )));
            }
            points.push((row.date, row.close));
        }
        if points.is_empty() {
            return Err(LoaderError::InvalidData(format!(
                "{}: no price rows in {}",
                ticker,
                path.display()
            )));
        }
        Ok(InstrumentSeries::from_points(points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &Path, ticker: &str, body: &str) {
        let mut f = std::fs::File::create(dir.join(format!("{ticker}.csv"))).unwrap();
        writeln!(f, "Date,Open,High,Low,Close,Volume").unwrap();
        write!(f, "{body}").unwrap();
    }

    #[test]
    fn test_load_sorts_by_date_and_ignores_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "SPY",
            "2020-01-03,2,2,2,101.5,10\n2020-01-02,1,1,1,100.0,10\n",
        );

        let prices = PriceLoader::new(dir.path())
            .load(&["spy".to_string()])
            .unwrap();
        let series = prices.get("SPY").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(
            series.close_on("2020-01-02".parse().unwrap()),
            Some(100.0)
        );
        assert_eq!(
            series.close_on("2020-01-03".parse().unwrap()),
            Some(101.5)
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PriceLoader::new(dir.path())
            .load(&["SPY".to_string()])
            .unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(_)));
    }

    #[test]
    fn test_non_positive_close_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "SPY", "2020-01-02,1,1,1,0.0,10\n");
        let err = PriceLoader::new(dir.path())
            .load(&["SPY".to_string()])
            .unwrap_err();
        assert!(matches!(err, LoaderError::InvalidData(_)));
    }
}
