pub mod artifacts;
pub mod backtest;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod returns;
pub mod walkforward;

// Re-export commonly used types
pub use artifacts::{write_artifacts, ArtifactError};
pub use backtest::{PortfolioSimulator, SimulatorConfig, Trade, TradeAction};
pub use config::WalkForwardParams;
pub use data::{LoaderError, PriceLoader, PriceSeries};
pub use error::EngineError;
pub use metrics::{Metrics, MetricsCalculator};
pub use walkforward::{run_walkforward, EquityPoint, WalkForwardReport};
