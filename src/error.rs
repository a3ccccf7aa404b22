//! Run-level error taxonomy.
//!
//! Every variant is terminal for the run in progress: the engine performs
//! no retries and publishes no partial artifact set. Variants carry the
//! window index, instrument, or date needed to diagnose the failure.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Date range too short for a single train/test window, or no trading
    /// days at all in the requested range.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// No candidate lookback produced a single ranked instrument anywhere
    /// in a training window (e.g. every lookback exceeds the window length).
    #[error("no candidate lookback ranked any instrument in training window {window_index}")]
    NoValidLookback { window_index: usize },

    /// Chained equity curve too short to compute summary metrics.
    #[error("equity curve has {points} point(s); at least 2 are required for metrics")]
    DegenerateSeries { points: usize },

    /// A requested ticker is absent from the loaded price data.
    #[error("instrument {ticker} is missing from the loaded price data")]
    MissingInstrument { ticker: String },

    /// A run parameter violates its documented constraint.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}
