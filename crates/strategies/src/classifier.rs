use crate::error::StrategyError;
use crate::sma::{compute_sma, MovingAverageSeries};
use core_types::Signal;
use rust_decimal::Decimal;

fn short_above(short: &MovingAverageSeries, long: &MovingAverageSeries, index: usize) -> bool {
    matches!((short.get(index), long.get(index)), (Some(s), Some(l)) if s > l)
}

fn short_below(short: &MovingAverageSeries, long: &MovingAverageSeries, index: usize) -> bool {
    matches!((short.get(index), long.get(index)), (Some(s), Some(l)) if s < l)
}

/// Labels every bar with a crossover signal.
///
/// - `BUY` when the short average flipped above the long one between `i-2` and
///   `i-1` and is still above at `i`.
/// - `SELL` on a one-bar downward cross between `i-1` and `i`.
/// - `HOLD` otherwise, including the first two bars and any bar whose lookback
///   touches an undefined average.
///
/// This is a charting cue and is deliberately independent of the entry rule the
/// backtester trades on; the two can disagree.
pub fn classify_signals(
    short: &MovingAverageSeries,
    long: &MovingAverageSeries,
) -> Result<Vec<Signal>, StrategyError> {
    if short.len() != long.len() {
        return Err(StrategyError::SeriesLengthMismatch { short: short.len(), long: long.len() });
    }

    let signals = (0..short.len())
        .map(|i| {
            if i < 2 {
                return Signal::Hold;
            }
            let confirmed_up = short_below(short, long, i - 2)
                && short_above(short, long, i - 1)
                && short_above(short, long, i);
            let crossed_down = short_above(short, long, i - 1) && short_below(short, long, i);

            if confirmed_up {
                Signal::Buy
            } else if crossed_down {
                Signal::Sell
            } else {
                Signal::Hold
            }
        })
        .collect();

    Ok(signals)
}

/// Computes both averages from raw closes and classifies them.
pub fn classify_closes(
    closes: &[Decimal],
    short_window: usize,
    long_window: usize,
) -> Result<Vec<Signal>, StrategyError> {
    let short = compute_sma(closes, short_window)?;
    let long = compute_sma(closes, long_window)?;
    classify_signals(&short, &long)
}

/// The most recent signal, or `HOLD` for an empty series.
pub fn last_signal(signals: &[Signal]) -> Signal {
    signals.last().copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn series(values: &[i64]) -> MovingAverageSeries {
        let prices: Vec<Decimal> = values.iter().map(|v| Decimal::from(*v)).collect();
        compute_sma(&prices, 1).unwrap()
    }

    #[test]
    fn buy_needs_a_flip_that_persists() {
        let short = series(&[1, 3, 3, 3]);
        let long = series(&[2, 2, 2, 2]);
        let signals = classify_signals(&short, &long).unwrap();
        // Flip between bars 0 and 1, still above at 2: BUY on bar 2 only.
        assert_eq!(signals, vec![Signal::Hold, Signal::Hold, Signal::Buy, Signal::Hold]);
    }

    #[test]
    fn a_flip_that_fails_immediately_is_not_a_buy() {
        let short = series(&[1, 3, 1]);
        let long = series(&[2, 2, 2]);
        let signals = classify_signals(&short, &long).unwrap();
        assert_eq!(signals[2], Signal::Sell);
    }

    #[test]
    fn sell_is_a_single_bar_cross_down() {
        let short = series(&[3, 3, 3, 1]);
        let long = series(&[2, 2, 2, 2]);
        let signals = classify_signals(&short, &long).unwrap();
        assert_eq!(signals, vec![Signal::Hold, Signal::Hold, Signal::Hold, Signal::Sell]);
    }

    #[rstest]
    #[case(&[3, 1, 1], &[2, 2, 2])]
    #[case(&[1, 3, 3], &[2, 2, 2])]
    fn first_two_bars_always_hold(#[case] short: &[i64], #[case] long: &[i64]) {
        let signals = classify_signals(&series(short), &series(long)).unwrap();
        assert_eq!(&signals[..2], &[Signal::Hold, Signal::Hold]);
    }

    #[test]
    fn undefined_lookback_means_hold() {
        let closes = [dec!(5), dec!(1), dec!(9), dec!(9), dec!(9)];
        // The long average only exists from bar 3 on, and the short one stays above it.
        let signals = classify_closes(&closes, 1, 4).unwrap();
        assert!(signals.iter().all(|s| *s == Signal::Hold));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = classify_signals(&series(&[1, 2]), &series(&[1])).unwrap_err();
        assert!(matches!(err, StrategyError::SeriesLengthMismatch { short: 2, long: 1 }));
    }

    #[test]
    fn last_signal_defaults_to_hold() {
        assert_eq!(last_signal(&[]), Signal::Hold);
        assert_eq!(last_signal(&[Signal::Buy, Signal::Sell]), Signal::Sell);
    }
}
