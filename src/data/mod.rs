pub mod loader;
pub mod types;

pub use loader::{LoaderError, PriceLoader};
pub use types::{InstrumentSeries, PriceSeries};
