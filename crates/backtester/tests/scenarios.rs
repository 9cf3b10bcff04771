use analytics::BacktestStatus;
use backtester::{run_backtest, simulate, BacktestError};
use chrono::{Duration, TimeZone, Utc};
use configuration::BacktestConfig;
use core_types::{ExitReason, PricePoint, TradeAction};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn series(closes: &[Decimal]) -> Vec<PricePoint> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().fixed_offset();
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| PricePoint { timestamp: start + Duration::days(i as i64), close: *close })
        .collect()
}

fn small_windows(trailing_enabled: bool) -> BacktestConfig {
    BacktestConfig { short_window: 2, long_window: 4, trailing_enabled, ..Default::default() }
}

/// Flat at 100 until bar 53, then 101 and 101.5: the 10/50 crossover confirms on bar 55.
fn crossover_at_bar_55() -> Vec<Decimal> {
    let mut closes = vec![dec!(100); 54];
    closes.push(dec!(101));
    closes.push(dec!(101.5));
    closes
}

#[test]
fn flat_prices_never_trade() {
    let result = run_backtest(&series(&[dec!(100); 60]), &BacktestConfig::default());

    assert_eq!(result.status, BacktestStatus::Success);
    assert!(result.trades.is_empty());
    assert_eq!(result.final_balance, dec!(10000.00));
}

#[rstest]
#[case(dec!(33.33))]
#[case(dec!(187.15))]
#[case(dec!(99.99))]
#[case(dec!(101.7))]
fn flat_fractional_prices_never_trade(#[case] price: Decimal) {
    let result = run_backtest(&series(&[price; 120]), &BacktestConfig::default());

    assert!(result.is_success());
    assert_eq!(result.trades, Vec::<String>::new());
    assert_eq!(result.final_balance, dec!(10000.00));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(51)]
fn short_series_keeps_initial_balance(#[case] bars: usize) {
    let config = BacktestConfig { initial_balance: dec!(2500), ..Default::default() };
    let prices = series(&vec![dec!(42); bars]);

    let result = run_backtest(&prices, &config);
    assert!(result.is_success());
    assert!(result.trades.is_empty());
    assert_eq!(result.final_balance, dec!(2500));

    assert!(matches!(
        simulate(&prices, &config),
        Err(BacktestError::InsufficientData { required: 52, .. })
    ));
}

#[test]
fn buy_and_hold_until_the_series_ends() {
    let mut closes = crossover_at_bar_55();
    closes.extend((1..=14).map(|k| dec!(101.5) + dec!(0.2) * Decimal::from(k)));
    let prices = series(&closes);

    let outcome = simulate(&prices, &BacktestConfig::default()).unwrap();
    assert_eq!(outcome.events.len(), 2);
    assert_eq!(outcome.events[0].action, TradeAction::Buy);
    assert_eq!(outcome.events[0].timestamp, prices[55].timestamp);
    assert_eq!(outcome.events[0].price, dec!(101.5));
    assert_eq!(outcome.events[1].action, TradeAction::Sell { reason: ExitReason::EndOfSeries });
    assert_eq!(outcome.events[1].price, dec!(104.3));

    let result = run_backtest(&prices, &BacktestConfig::default());
    let expected = (dec!(10000) / dec!(101.5) * dec!(104.3)).round_dp(2);
    assert_eq!(result.final_balance, expected);
    assert_eq!(result.final_balance, dec!(10275.86));
    assert_eq!(
        result.trades,
        vec!["BUY at 101.50 on 2024-02-25", "Final SELL at 104.30 on 2024-03-10"]
    );
}

#[rstest]
#[case(false, dec!(95.41), dec!(9400.00))]
#[case(true, dec!(96.425), dec!(9500.00))]
fn six_percent_drop_stops_out(
    #[case] fill_at_trigger_price: bool,
    #[case] expected_fill: Decimal,
    #[case] expected_balance: Decimal,
) {
    let mut closes = crossover_at_bar_55();
    closes.push(dec!(101.5) * dec!(0.94));
    closes.push(dec!(95));
    let config = BacktestConfig { fill_at_trigger_price, ..Default::default() };

    let outcome = simulate(&series(&closes), &config).unwrap();
    assert_eq!(outcome.events.len(), 2);
    assert_eq!(outcome.events[1].action, TradeAction::Sell { reason: ExitReason::StopLoss });
    assert_eq!(outcome.events[1].price, expected_fill);
    assert_eq!(outcome.events[1].note(), Some("Stop Loss"));

    let result = run_backtest(&series(&closes), &config);
    assert_eq!(result.final_balance, expected_balance);
}

#[test]
fn trailing_ratchets_then_stops_out() {
    let closes = [
        dec!(10), dec!(10), dec!(10), dec!(10), dec!(10), dec!(10),
        dec!(11), dec!(11.5), dec!(12.7), dec!(13),
    ];
    let result = run_backtest(&series(&closes), &small_windows(true));

    assert_eq!(
        result.trades,
        vec![
            "BUY at 11.50 on 2024-01-08",
            "TARGET UPDATED: New Target 13.97, Stop Loss 13.27 on 2024-01-09",
            "SELL at 13.00 (Stop Loss) on 2024-01-10",
        ]
    );
    assert_eq!(result.final_balance, dec!(11304.35));
}

#[test]
fn target_hit_sells_and_re_enters_without_trailing() {
    let closes = [
        dec!(10), dec!(10), dec!(10), dec!(10), dec!(10), dec!(10),
        dec!(11), dec!(11.5), dec!(12.7), dec!(13),
    ];
    let result = run_backtest(&series(&closes), &small_windows(false));

    assert_eq!(
        result.trades,
        vec![
            "BUY at 11.50 on 2024-01-08",
            "SELL at 12.70 (Target Hit) on 2024-01-09",
            "BUY at 13.00 on 2024-01-10",
            "Final SELL at 13.00 on 2024-01-10",
        ]
    );
    assert_eq!(result.final_balance, dec!(11043.48));
}

#[test]
fn last_realized_balance_is_reported_after_a_stop() {
    // Stopped out, then flat to the end: the realized balance stands.
    let closes = [
        dec!(10), dec!(10), dec!(10), dec!(10), dec!(10), dec!(10),
        dec!(11), dec!(11.5), dec!(10.8), dec!(10.5),
    ];
    let outcome = simulate(&series(&closes), &small_windows(false)).unwrap();

    assert_eq!(outcome.events.len(), 2);
    assert_eq!(outcome.final_balance.round_dp(2), dec!(9391.30));
}

#[test]
fn inverted_windows_report_failure() {
    let config = BacktestConfig { short_window: 50, long_window: 10, ..Default::default() };
    let result = run_backtest(&series(&[dec!(100); 80]), &config);

    assert_eq!(result.status, BacktestStatus::Failure);
    assert!(result.reason.unwrap().contains("short window"));
    assert!(result.trades.is_empty());
}

#[test]
fn malformed_series_fails_before_simulating() {
    let mut prices = series(&crossover_at_bar_55());
    prices.swap(10, 11);

    assert!(matches!(
        simulate(&prices, &BacktestConfig::default()),
        Err(BacktestError::MalformedInput { index: 11, .. })
    ));
    let result = run_backtest(&prices, &BacktestConfig::default());
    assert_eq!(result.status, BacktestStatus::Failure);
}
