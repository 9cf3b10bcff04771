use crate::error::StrategyError;
use crate::sma::RollingSma;
use crate::Strategy;
use configuration::BacktestConfig;
use core_types::{PricePoint, Signal};

/// The two-bar confirmed SMA crossover entry rule.
///
/// Emits `BUY` whenever the short average is above the long one on both the
/// previous and the current bar. This is looser than the charting classifier on
/// purpose. It never emits `SELL`; exits are driven by the protective levels.
pub struct MACrossover {
    ma_short: RollingSma,
    ma_long: RollingSma,
    // State: whether the short MA was above the long MA on the previous bar.
    prev_short_above: bool,
}

impl MACrossover {
    /// Creates a new `MACrossover` from the backtest windows.
    ///
    /// It performs validation to ensure the parameters are logical.
    pub fn new(config: &BacktestConfig) -> Result<Self, StrategyError> {
        if config.short_window >= config.long_window {
            return Err(StrategyError::InvalidParameters(format!(
                "Short MA window ({}) must be less than long MA window ({})",
                config.short_window, config.long_window
            )));
        }

        Ok(Self {
            ma_short: RollingSma::new(config.short_window)?,
            ma_long: RollingSma::new(config.long_window)?,
            prev_short_above: false,
        })
    }
}

impl Strategy for MACrossover {
    fn evaluate(&mut self, point: &PricePoint) -> Result<Signal, StrategyError> {
        let short = self.ma_short.next(point.close)?;
        let long = self.ma_long.next(point.close)?;

        let short_above = matches!((short, long), (Some(s), Some(l)) if s > l);
        let signal = if self.prev_short_above && short_above {
            Signal::Buy
        } else {
            Signal::Hold
        };

        tracing::trace!(
            timestamp = %point.timestamp,
            ?short,
            ?long,
            ?signal,
            "MACrossover evaluated"
        );

        // Update state for the next evaluation.
        self.prev_short_above = short_above;
        Ok(signal)
    }
}
