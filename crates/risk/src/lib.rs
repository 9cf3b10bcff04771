//! # Crossover Risk Layer
//!
//! Owns the exit side of the strategy: the profit target, the protective stop
//! and the trailing ratchet of an open long position.

pub mod error;
pub mod exit_policy;

pub use error::RiskError;
pub use exit_policy::{ExitDecision, ExitPolicy};

use core_types::ProtectiveLevels;
use rust_decimal::Decimal;

/// Decides when and at what price an open long position is closed.
pub trait RiskManager: Send + Sync {
    /// The target and stop for a position just opened at `entry_price`.
    fn initial_levels(&self, entry_price: Decimal) -> Result<ProtectiveLevels, RiskError>;

    /// Checks the current close against the levels of the open position.
    fn evaluate(&self, close: Decimal, levels: &ProtectiveLevels) -> Result<ExitDecision, RiskError>;
}
