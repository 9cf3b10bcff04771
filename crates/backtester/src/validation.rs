use crate::error::BacktestError;
use configuration::BacktestConfig;
use core_types::PricePoint;
use rust_decimal::Decimal;

/// Rejects configurations that would silently produce a meaningless strategy.
pub fn validate_config(config: &BacktestConfig) -> Result<(), BacktestError> {
    if config.short_window == 0 || config.long_window == 0 {
        return Err(BacktestError::InvalidWindow(format!(
            "windows must be at least 1 bar (short {}, long {})",
            config.short_window, config.long_window
        )));
    }
    if config.short_window >= config.long_window {
        return Err(BacktestError::InvalidWindow(format!(
            "short window ({}) must be less than long window ({})",
            config.short_window, config.long_window
        )));
    }
    if config.initial_balance <= Decimal::ZERO {
        return Err(BacktestError::InvalidBalance(config.initial_balance));
    }
    Ok(())
}

/// Checks the whole series up front so a run never fails half-way through.
///
/// Timestamps must be strictly increasing and every close must be positive.
pub fn validate_series(prices: &[PricePoint]) -> Result<(), BacktestError> {
    if let Some((index, point)) = prices
        .iter()
        .enumerate()
        .find(|(_, p)| p.close <= Decimal::ZERO)
    {
        return Err(BacktestError::MalformedInput {
            index,
            reason: format!("close {} is not a positive price", point.close),
        });
    }

    if let Some(index) = prices
        .windows(2)
        .position(|pair| pair[1].timestamp <= pair[0].timestamp)
    {
        return Err(BacktestError::MalformedInput {
            index: index + 1,
            reason: format!(
                "timestamp {} does not follow {}",
                prices[index + 1].timestamp, prices[index].timestamp
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(0, 50)]
    #[case(10, 0)]
    #[case(50, 10)]
    #[case(20, 20)]
    fn invalid_windows(#[case] short_window: usize, #[case] long_window: usize) {
        let config = BacktestConfig { short_window, long_window, ..Default::default() };
        assert!(matches!(validate_config(&config), Err(BacktestError::InvalidWindow(_))));
    }

    #[test]
    fn non_positive_balance() {
        let config = BacktestConfig { initial_balance: dec!(0), ..Default::default() };
        assert!(matches!(validate_config(&config), Err(BacktestError::InvalidBalance(_))));
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&BacktestConfig::default()).is_ok());
    }

    fn points(closes: &[Decimal], offsets: &[i64]) -> Vec<PricePoint> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().fixed_offset();
        closes
            .iter()
            .zip(offsets)
            .map(|(close, offset)| PricePoint { timestamp: start + Duration::days(*offset), close: *close })
            .collect()
    }

    #[test]
    fn rejects_out_of_order_timestamps() {
        let prices = points(&[dec!(1), dec!(2), dec!(3)], &[0, 2, 1]);
        match validate_series(&prices) {
            Err(BacktestError::MalformedInput { index, .. }) => assert_eq!(index, 2),
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let prices = points(&[dec!(1), dec!(2)], &[3, 3]);
        assert!(validate_series(&prices).is_err());
    }

    #[test]
    fn rejects_non_positive_close() {
        let prices = points(&[dec!(1), dec!(-2)], &[0, 1]);
        match validate_series(&prices) {
            Err(BacktestError::MalformedInput { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn accepts_empty_and_ordered_series() {
        assert!(validate_series(&[]).is_ok());
        assert!(validate_series(&points(&[dec!(1), dec!(2)], &[0, 1])).is_ok());
    }
}
