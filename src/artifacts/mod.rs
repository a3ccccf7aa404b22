//! Run artifacts.
//!
//! Persists a finished walk-forward run as a set of flat files: the exact
//! parameters as JSON plus windows, trades, equity, and metrics as CSV.

use std::fs::{self, File};
use std::path::Path;

use thiserror::Error;

use crate::walkforward::WalkForwardReport;

/// Errors raised while writing artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write all artifacts for `report` under `dir`, creating it if needed.
pub fn write_artifacts(dir: &Path, report: &WalkForwardReport) -> Result<(), ArtifactError> {
    fs::create_dir_all(dir)?;

    let params = serde_json::to_string_pretty(&report.params)?;
    fs::write(dir.join("params_used.json"), params)?;

    let mut windows = csv::Writer::from_writer(File::create(dir.join("walkforward_windows.csv"))?);
    for record in &report.windows {
        windows.serialize(record)?;
    }
    windows.flush()?;

    let mut trades = csv::Writer::from_writer(File::create(dir.join("trades.csv"))?);
    for trade in &report.trades {
        trades.serialize(trade)?;
    }
    trades.flush()?;

    let mut equity = csv::Writer::from_writer(File::create(dir.join("equity.csv"))?);
    for point in &report.equity {
        equity.serialize(point)?;
    }
    equity.flush()?;

    let mut metrics = csv::Writer::from_writer(File::create(dir.join("metrics.csv"))?);
    metrics.serialize(&report.metrics)?;
    metrics.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WalkForwardParams;
    use crate::metrics::Metrics;
    use crate::walkforward::{EquityPoint, WindowRecord};

    fn sample_report() -> WalkForwardReport {
        let d0 = "2020-01-01".parse().unwrap();
        let d1 = "2020-01-02".parse().unwrap();
        WalkForwardReport {
            params: WalkForwardParams::default(),
            windows: vec![WindowRecord {
                window_index: 0,
                train_start: d0,
                train_end: d1,
                test_start: d1,
                test_end: d1,
                chosen_lookback: 20,
                train_sharpe: 1.5,
            }],
            selections: Vec::new(),
            trades: Vec::new(),
            equity: vec![
                EquityPoint { date: d0, equity: 1.0 },
                EquityPoint { date: d1, equity: 1.01 },
            ],
            metrics: Metrics {
                cagr: 0.1,
                ann_vol: 0.2,
                sharpe: 0.5,
                sortino: 0.7,
                max_drawdown: -0.05,
            },
        }
    }

    #[test]
    fn test_writes_all_artifact_files() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), &sample_report()).unwrap();

        for name in [
            "params_used.json",
            "walkforward_windows.csv",
            "trades.csv",
            "equity.csv",
            "metrics.csv",
        ] {
            assert!(dir.path().join(name).exists(), "missing {name}");
        }

        let equity = std::fs::read_to_string(dir.path().join("equity.csv")).unwrap();
        assert!(equity.starts_with("date,equity"));
        assert!(equity.contains("2020-01-02,1.01"));

        let params = std::fs::read_to_string(dir.path().join("params_used.json")).unwrap();
        assert!(params.contains("\"train_days\""));
    }
}
