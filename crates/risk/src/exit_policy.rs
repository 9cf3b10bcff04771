use crate::error::RiskError;
use crate::RiskManager;
use configuration::BacktestConfig;
use core_types::{ExitReason, ProtectiveLevels};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// What to do with an open long position on the current bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    /// Nothing triggered.
    Hold,
    /// Liquidate the whole position at `fill_price`.
    Exit { reason: ExitReason, fill_price: Decimal },
    /// Keep the position and replace its levels.
    Ratchet(ProtectiveLevels),
}

/// Fixed-percentage target and stop, with an optional trailing ratchet.
#[derive(Debug, Clone)]
pub struct ExitPolicy {
    target_pct: Decimal,
    stop_loss_pct: Decimal,
    trailing_enabled: bool,
    fill_at_trigger_price: bool,
}

impl ExitPolicy {
    /// Creates a new `ExitPolicy` from the backtest configuration.
    pub fn new(config: &BacktestConfig) -> Result<Self, RiskError> {
        // Validate that risk parameters are logical.
        if config.target_pct <= dec!(0) {
            return Err(RiskError::InvalidParameters(
                "target_pct must be greater than 0".to_string(),
            ));
        }
        if config.stop_loss_pct <= dec!(0) || config.stop_loss_pct >= dec!(1) {
            return Err(RiskError::InvalidParameters(
                "stop_loss_pct must be between 0 and 1".to_string(),
            ));
        }
        Ok(Self {
            target_pct: config.target_pct,
            stop_loss_pct: config.stop_loss_pct,
            trailing_enabled: config.trailing_enabled,
            fill_at_trigger_price: config.fill_at_trigger_price,
        })
    }

    fn target_above(&self, price: Decimal) -> Result<Decimal, RiskError> {
        price
            .checked_mul(dec!(1) + self.target_pct)
            .ok_or(RiskError::Overflow(price))
    }

    fn stop_below(&self, price: Decimal) -> Result<Decimal, RiskError> {
        price
            .checked_mul(dec!(1) - self.stop_loss_pct)
            .ok_or(RiskError::Overflow(price))
    }
}

impl RiskManager for ExitPolicy {
    fn initial_levels(&self, entry_price: Decimal) -> Result<ProtectiveLevels, RiskError> {
        if entry_price <= dec!(0) {
            return Err(RiskError::InvalidEntryPrice(entry_price));
        }
        Ok(ProtectiveLevels {
            target_price: self.target_above(entry_price)?,
            stop_loss_price: self.stop_below(entry_price)?,
        })
    }

    /// Checks, in order: the stop, then the target (ratchet when trailing, sell otherwise).
    fn evaluate(&self, close: Decimal, levels: &ProtectiveLevels) -> Result<ExitDecision, RiskError> {
        if close <= levels.stop_loss_price {
            let fill_price = if self.fill_at_trigger_price {
                levels.stop_loss_price
            } else {
                close
            };
            tracing::trace!(%close, stop = %levels.stop_loss_price, %fill_price, "Stop triggered");
            return Ok(ExitDecision::Exit { reason: ExitReason::StopLoss, fill_price });
        }

        if close >= levels.target_price {
            if self.trailing_enabled {
                // The new stop trails the new target, not the close.
                let target_price = self.target_above(close)?;
                let stop_loss_price = self.stop_below(target_price)?;
                tracing::trace!(%close, target = %target_price, stop = %stop_loss_price, "Target reached, trailing");
                return Ok(ExitDecision::Ratchet(ProtectiveLevels { target_price, stop_loss_price }));
            }
            tracing::trace!(%close, target = %levels.target_price, "Target reached");
            return Ok(ExitDecision::Exit { reason: ExitReason::TargetHit, fill_price: close });
        }

        Ok(ExitDecision::Hold)
    }
}
