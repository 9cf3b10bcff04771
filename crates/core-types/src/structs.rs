use crate::enums::{ExitReason, TradeAction};
use crate::error::CoreError;
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single closing price observation.
///
/// The timestamp keeps the offset it was recorded in, so the calendar date of
/// the bar is the exchange-local one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<FixedOffset>,
    pub close: Decimal,
}

impl PricePoint {
    /// Creates a new `PricePoint`, rejecting closes that are zero or negative.
    pub fn new(timestamp: DateTime<FixedOffset>, close: Decimal) -> Result<Self, CoreError> {
        if close <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "close".to_string(),
                format!("{} at {} is not a positive price", close, timestamp),
            ));
        }
        Ok(Self { timestamp, close })
    }
}

/// The profit target and protective stop of an open long position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectiveLevels {
    pub target_price: Decimal,
    pub stop_loss_price: Decimal,
}

/// The single-position state of a backtest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PositionState {
    /// No capital is committed to shares.
    #[default]
    Flat,
    /// The entire balance was converted into `quantity` shares at `entry_price`.
    Long {
        quantity: Decimal,
        entry_price: Decimal,
        levels: ProtectiveLevels,
    },
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }
}

/// An immutable entry of the backtest trade log.
///
/// `price` is the fill price for buys and sells, and the close that triggered
/// the ratchet for target updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    #[serde(flatten)]
    pub action: TradeAction,
    pub price: Decimal,
    pub timestamp: DateTime<FixedOffset>,
}

impl TradeEvent {
    pub fn buy(price: Decimal, timestamp: DateTime<FixedOffset>) -> Self {
        Self { action: TradeAction::Buy, price, timestamp }
    }

    pub fn sell(price: Decimal, timestamp: DateTime<FixedOffset>, reason: ExitReason) -> Self {
        Self { action: TradeAction::Sell { reason }, price, timestamp }
    }

    pub fn target_update(price: Decimal, timestamp: DateTime<FixedOffset>, levels: ProtectiveLevels) -> Self {
        Self {
            action: TradeAction::TargetUpdate {
                target_price: levels.target_price,
                stop_loss_price: levels.stop_loss_price,
            },
            price,
            timestamp,
        }
    }

    /// The free-text annotation of this event, if it carries one.
    pub fn note(&self) -> Option<&'static str> {
        match self.action {
            TradeAction::Sell { reason } => Some(reason.label()),
            _ => None,
        }
    }
}

/// Formats a price with exactly two decimal places.
///
/// `Decimal`'s precision formatting truncates, so the value is rounded first.
fn two_dp(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

impl fmt::Display for TradeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.timestamp.date_naive();
        match self.action {
            TradeAction::Buy => write!(f, "BUY at {} on {}", two_dp(self.price), date),
            TradeAction::Sell { reason: ExitReason::EndOfSeries } => {
                write!(f, "Final SELL at {} on {}", two_dp(self.price), date)
            }
            TradeAction::Sell { reason } => write!(
                f,
                "SELL at {} ({}) on {}",
                two_dp(self.price),
                reason.label(),
                date
            ),
            TradeAction::TargetUpdate { target_price, stop_loss_price } => write!(
                f,
                "TARGET UPDATED: New Target {}, Stop Loss {} on {}",
                two_dp(target_price),
                two_dp(stop_loss_price),
                date
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap().fixed_offset()
    }

    #[test]
    fn rejects_non_positive_close() {
        assert!(PricePoint::new(day(1), dec!(0)).is_err());
        assert!(PricePoint::new(day(1), dec!(-3.5)).is_err());
        assert!(PricePoint::new(day(1), dec!(0.01)).is_ok());
    }

    #[test]
    fn renders_trade_log_lines() {
        let levels = ProtectiveLevels { target_price: dec!(13.97), stop_loss_price: dec!(13.2715) };
        let lines: Vec<String> = [
            TradeEvent::buy(dec!(11.5), day(4)),
            TradeEvent::target_update(dec!(12.7), day(5), levels),
            TradeEvent::sell(dec!(10.925), day(6), ExitReason::StopLoss),
            TradeEvent::sell(dec!(12.7), day(7), ExitReason::TargetHit),
            TradeEvent::sell(dec!(13), day(8), ExitReason::EndOfSeries),
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        assert_eq!(
            lines,
            vec![
                "BUY at 11.50 on 2024-03-04",
                "TARGET UPDATED: New Target 13.97, Stop Loss 13.27 on 2024-03-05",
                "SELL at 10.92 (Stop Loss) on 2024-03-06",
                "SELL at 12.70 (Target Hit) on 2024-03-07",
                "Final SELL at 13.00 on 2024-03-08",
            ]
        );
    }

    #[test]
    fn renders_the_exchange_local_date() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let open = tokyo.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();

        assert_eq!(TradeEvent::buy(dec!(100), open).to_string(), "BUY at 100.00 on 2024-03-04");
    }

    #[test]
    fn only_sells_carry_a_note() {
        assert_eq!(TradeEvent::buy(dec!(1), day(1)).note(), None);
        assert_eq!(
            TradeEvent::sell(dec!(1), day(1), ExitReason::StopLoss).note(),
            Some("Stop Loss")
        );
    }

    #[test]
    fn serializes_tagged_action() {
        let event = TradeEvent::sell(dec!(9.5), day(2), ExitReason::TargetHit);
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["kind"], "SELL");
        assert_eq!(json["reason"], "target_hit");
    }
}
