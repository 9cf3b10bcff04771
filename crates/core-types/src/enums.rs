use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A categorical trading cue for a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Hold,
}

/// Why a long position was liquidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// The close fell to or below the protective stop.
    StopLoss,
    /// The close reached the profit target while trailing was disabled.
    TargetHit,
    /// The series ended with the position still open.
    EndOfSeries,
}

impl ExitReason {
    /// The annotation attached to the trade-log line for this exit.
    pub fn label(&self) -> &'static str {
        match self {
            ExitReason::StopLoss => "Stop Loss",
            ExitReason::TargetHit => "Target Hit",
            ExitReason::EndOfSeries => "Final",
        }
    }
}

/// The kind of entry appended to a backtest trade log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    Buy,
    Sell { reason: ExitReason },
    /// The protective levels were ratcheted upwards; the position stays open.
    TargetUpdate {
        target_price: Decimal,
        stop_loss_price: Decimal,
    },
}

impl TradeAction {
    pub fn is_buy(&self) -> bool {
        matches!(self, TradeAction::Buy)
    }

    pub fn is_sell(&self) -> bool {
        matches!(self, TradeAction::Sell { .. })
    }
}
