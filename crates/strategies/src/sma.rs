use crate::error::StrategyError;
use chrono::{DateTime, FixedOffset};
use core_types::PricePoint;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::VecDeque;

/// A streaming simple moving average that reports nothing until `window`
/// observations have been seen.
///
/// The running sum is kept in `Decimal`, so a flat series averages to exactly
/// its price and two windows over the same flat prices compare equal.
#[derive(Debug, Clone)]
pub struct RollingSma {
    window: usize,
    divisor: Decimal,
    values: VecDeque<Decimal>,
    sum: Decimal,
}

impl RollingSma {
    pub fn new(window: usize) -> Result<Self, StrategyError> {
        if window == 0 {
            return Err(StrategyError::InvalidWindow("window must be at least 1, got 0".to_string()));
        }
        Ok(Self {
            window,
            divisor: Decimal::from(window),
            values: VecDeque::new(),
            sum: Decimal::ZERO,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Feeds the next close and returns the average once the window is full.
    pub fn next(&mut self, close: Decimal) -> Result<Option<Decimal>, StrategyError> {
        let overflow = || StrategyError::IndicatorError(format!("SMA sum overflowed at close {}", close));

        self.sum = self.sum.checked_add(close).ok_or_else(overflow)?;
        self.values.push_back(close);
        if self.values.len() > self.window {
            if let Some(oldest) = self.values.pop_front() {
                self.sum = self.sum.checked_sub(oldest).ok_or_else(overflow)?;
            }
        }

        if self.values.len() < self.window {
            return Ok(None);
        }
        self.sum.checked_div(self.divisor).map(Some).ok_or_else(overflow)
    }
}

/// A moving average aligned index-for-index with the price series it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageSeries {
    window: usize,
    values: Vec<Option<Decimal>>,
}

impl MovingAverageSeries {
    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value at `index`; `None` while warming up or past the end.
    pub fn get(&self, index: usize) -> Option<Decimal> {
        self.values.get(index).copied().flatten()
    }

    pub fn values(&self) -> &[Option<Decimal>] {
        &self.values
    }
}

/// Computes the simple moving average of `prices` over `window` observations.
///
/// A window longer than the series is not an error: every value is simply undefined.
pub fn compute_sma(prices: &[Decimal], window: usize) -> Result<MovingAverageSeries, StrategyError> {
    let mut sma = RollingSma::new(window)?;
    let values = prices
        .iter()
        .map(|price| sma.next(*price))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MovingAverageSeries { window, values })
}

/// One row of a close/SMA table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmaRow {
    pub timestamp: DateTime<FixedOffset>,
    pub close: Decimal,
    pub sma: Decimal,
}

/// Pairs each close with its moving average, dropping the rows where the average is undefined.
pub fn sma_table(points: &[PricePoint], window: usize) -> Result<Vec<SmaRow>, StrategyError> {
    let closes: Vec<Decimal> = points.iter().map(|p| p.close).collect();
    let series = compute_sma(&closes, window)?;

    Ok(points
        .iter()
        .zip(series.values())
        .filter_map(|(point, sma)| {
            sma.map(|sma| SmaRow { timestamp: point.timestamp, close: point.close, sma })
        })
        .collect())
}
