use crate::report::{BacktestResult, BacktestStatus, TradeSummary};
use core_types::{TradeAction, TradeEvent};
use rust_decimal::Decimal;

/// A stateless packager of engine output into `BacktestResult`s.
#[derive(Debug, Default)]
pub struct ResultReporter {}

impl ResultReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a finished run into a successful `BacktestResult`.
    ///
    /// The balance is rounded half-to-even to two decimal places.
    pub fn report(&self, final_balance: Decimal, events: &[TradeEvent]) -> BacktestResult {
        BacktestResult {
            status: BacktestStatus::Success,
            final_balance: final_balance.round_dp(2),
            trades: events.iter().map(ToString::to_string).collect(),
            reason: None,
        }
    }

    /// A run that was rejected before simulating.
    pub fn failure(&self, reason: impl ToString) -> BacktestResult {
        let reason = reason.to_string();
        tracing::warn!(%reason, "Backtest failed");
        BacktestResult {
            status: BacktestStatus::Failure,
            final_balance: Decimal::ZERO,
            trades: Vec::new(),
            reason: Some(reason),
        }
    }

    /// Pairs every BUY with the SELL that closed it and tallies the outcomes.
    pub fn summarize(
        &self,
        initial_balance: Decimal,
        final_balance: Decimal,
        events: &[TradeEvent],
    ) -> TradeSummary {
        let mut summary = TradeSummary {
            round_trips: 0,
            winning_trades: 0,
            losing_trades: 0,
            target_updates: 0,
            win_rate_pct: None,
            total_return_pct: Decimal::ZERO,
        };

        let mut entry: Option<Decimal> = None;
        for event in events {
            match event.action {
                TradeAction::Buy => entry = Some(event.price),
                TradeAction::Sell { .. } => {
                    if let Some(entry_price) = entry.take() {
                        summary.round_trips += 1;
                        if event.price > entry_price {
                            summary.winning_trades += 1;
                        } else {
                            summary.losing_trades += 1;
                        }
                    }
                }
                TradeAction::TargetUpdate { .. } => summary.target_updates += 1,
            }
        }

        if summary.round_trips > 0 {
            summary.win_rate_pct = Some(
                (Decimal::from(summary.winning_trades) / Decimal::from(summary.round_trips)
                    * Decimal::from(100))
                .round_dp(2),
            );
        }

        if initial_balance > Decimal::ZERO {
            summary.total_return_pct =
                ((final_balance - initial_balance) / initial_balance * Decimal::from(100)).round_dp(2);
        }

        summary
    }
}
