//! Walk-forward validation.

mod runner;
mod selector;
mod windows;

pub use runner::{run_walkforward, EquityPoint, WalkForwardReport, WindowRecord};
pub use selector::{select_lookback, SelectionResult};
pub use windows::{generate_windows, Window};
