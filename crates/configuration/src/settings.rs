use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub backtest: BacktestConfig,
    pub logging: LoggingConfig,
}

/// Parameters for a single SMA crossover backtest run.
///
/// Window ordering (`short_window < long_window`) is not checked here; the
/// backtester rejects inverted configurations before simulating.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// The starting cash balance.
    pub initial_balance: Decimal,
    pub short_window: usize,
    pub long_window: usize,
    /// Ratchet the target and stop upwards instead of selling when the target is hit.
    pub trailing_enabled: bool,
    /// Fill stop-outs at the stop price itself rather than at the triggering close.
    pub fill_at_trigger_price: bool,
    /// Distance of the profit target above the entry price (0.10 = 10%).
    pub target_pct: Decimal,
    /// Distance of the stop-loss below the entry (or ratcheted target) price.
    pub stop_loss_pct: Decimal,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_balance: dec!(10000),
            short_window: 10,
            long_window: 50,
            trailing_enabled: false,
            fill_at_trigger_price: false,
            target_pct: dec!(0.10),
            stop_loss_pct: dec!(0.05),
        }
    }
}

impl BacktestConfig {
    /// The first bar index at which the engine is allowed to act.
    pub fn warmup_bars(&self) -> usize {
        self.short_window.max(self.long_window) + 2
    }
}

/// Where and how verbosely the binary writes its logs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive, used when `RUST_LOG` is unset.
    pub level: String,
    /// When set, logs go to a daily rolling file in this directory instead of stderr.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// Command-line overrides layered on top of the loaded `BacktestConfig`.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct BacktestOverrides {
    /// Starting cash balance.
    #[cfg_attr(feature = "clap", arg(long))]
    pub initial_balance: Option<Decimal>,

    /// Short SMA window, in bars.
    #[cfg_attr(feature = "clap", arg(long))]
    pub short_window: Option<usize>,

    /// Long SMA window, in bars.
    #[cfg_attr(feature = "clap", arg(long))]
    pub long_window: Option<usize>,

    /// Enable the trailing target/stop ratchet.
    #[cfg_attr(feature = "clap", arg(long))]
    pub trailing: bool,

    /// Fill stop-outs at the stop price instead of the triggering close.
    #[cfg_attr(feature = "clap", arg(long))]
    pub fill_at_trigger: bool,
}

impl BacktestOverrides {
    /// Applies every override that was provided. Boolean flags can only switch a setting on.
    pub fn apply(&self, config: &mut BacktestConfig) {
        if let Some(balance) = self.initial_balance {
            config.initial_balance = balance;
        }
        if let Some(short) = self.short_window {
            config.short_window = short;
        }
        if let Some(long) = self.long_window {
            config.long_window = long;
        }
        config.trailing_enabled |= self.trailing;
        config.fill_at_trigger_price |= self.fill_at_trigger;
    }
}
