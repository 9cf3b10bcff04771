use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BacktestStatus {
    Success,
    Failure,
}

/// The fixed-shape outcome of a single backtest run.
///
/// This struct is the final output of the `ResultReporter` and is serialized
/// as-is for external consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub status: BacktestStatus,
    /// Last realized cash balance, rounded to two decimal places.
    #[serde(with = "rust_decimal::serde::float")]
    pub final_balance: Decimal,
    /// Human-readable trade log, oldest first.
    pub trades: Vec<String>,
    /// Why the run failed. Absent on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl BacktestResult {
    pub fn is_success(&self) -> bool {
        self.status == BacktestStatus::Success
    }
}

/// Round-trip statistics of a trade log, for terminal summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSummary {
    pub round_trips: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub target_updates: usize,
    /// Option<> for cases with 0 round trips
    pub win_rate_pct: Option<Decimal>,
    pub total_return_pct: Decimal,
}
