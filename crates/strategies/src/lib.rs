//! # Crossover Strategy Library
//!
//! This crate contains the indicator and signal logic of the SMA crossover
//! backtester: the moving-average calculator, the charting signal classifier and
//! the entry rule the backtester trades on.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   HTTP or execution. It depends only on `core-types` and `configuration`.
//! - **Strategy Agnostic Engine:** By using the `Strategy` trait, the `backtester`
//!   can drive any entry rule without knowing its internal details.
//!
//! ## Public API
//!
//! - `compute_sma` / `RollingSma`: batch and streaming simple moving averages.
//! - `classify_signals`: per-bar `BUY`/`SELL`/`HOLD` labels for charting.
//! - `Strategy` and `MACrossover`: the backtester's entry rule.

// Declare all the modules that constitute this crate.
pub mod classifier;
pub mod error;
pub mod ma_crossover;
pub mod sma;

// Re-export the key components to create a clean, public-facing API.
pub use classifier::{classify_closes, classify_signals, last_signal};
pub use error::StrategyError;
pub use ma_crossover::MACrossover;
pub use sma::{compute_sma, sma_table, MovingAverageSeries, RollingSma, SmaRow};

use core_types::{PricePoint, Signal};

/// The core trait that entry rules must implement.
///
/// The `&mut self` in `evaluate` is crucial, as strategies keep their own
/// indicator state between bars. Every bar of the series must be fed in order,
/// including the warm-up bars the backtester does not act on.
pub trait Strategy: Send + Sync {
    /// Evaluates the strategy on the next price observation.
    ///
    /// # Returns
    ///
    /// * `Ok(Signal::Buy)` - if the entry conditions are met on this bar.
    /// * `Ok(Signal::Hold)` - if no action should be taken.
    /// * `Err(StrategyError)` - if an error occurs during evaluation.
    fn evaluate(&mut self, point: &PricePoint) -> Result<Signal, StrategyError>;
}
