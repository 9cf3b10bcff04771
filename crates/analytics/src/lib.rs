//! # Crossover Result Reporter
//!
//! This crate turns the raw output of a backtest (a terminal balance and a
//! `TradeEvent` log) into the fixed-shape `BacktestResult` that external
//! consumers serialize.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `ResultReporter` holds no state, which makes
//!   it trivially reusable across concurrent runs.
//!
//! ## Public API
//!
//! - `ResultReporter`: builds success and failure results, and trade summaries.
//! - `BacktestResult` / `BacktestStatus`: the externally visible result record.
//! - `TradeSummary`: round-trip statistics for terminal output.

// Declare the modules that constitute this crate.
pub mod report;
pub mod reporter;

// Re-export the key components to create a clean, public-facing API.
pub use report::{BacktestResult, BacktestStatus, TradeSummary};
pub use reporter::ResultReporter;
