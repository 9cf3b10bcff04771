use analytics::{BacktestResult, ResultReporter};
use configuration::BacktestConfig;
use core_types::{ExitReason, PositionState, PricePoint, Signal, TradeEvent};
use risk::{ExitDecision, ExitPolicy, RiskManager};
use rust_decimal::Decimal;
use strategies::{MACrossover, Strategy};

pub mod error;
pub mod validation;

pub use error::BacktestError;
pub use validation::{validate_config, validate_series};

/// The raw outcome of a simulation, before rounding and rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub initial_balance: Decimal,
    /// The most recently realized cash balance.
    pub final_balance: Decimal,
    /// Append-only trade log, oldest first.
    pub events: Vec<TradeEvent>,
}

/// The single-position SMA crossover backtesting engine.
///
/// One `Backtester` drives one run: the strategy keeps indicator state, so
/// `run` consumes the engine.
pub struct Backtester {
    config: BacktestConfig,
    strategy: Box<dyn Strategy>,
    risk_manager: Box<dyn RiskManager>,
}

impl Backtester {
    /// Constructs a new `Backtester` from explicit components.
    pub fn new(
        config: BacktestConfig,
        strategy: Box<dyn Strategy>,
        risk_manager: Box<dyn RiskManager>,
    ) -> Result<Self, BacktestError> {
        validate_config(&config)?;
        Ok(Self {
            config,
            strategy,
            risk_manager,
        })
    }

    /// Constructs the standard engine: `MACrossover` entries and `ExitPolicy` exits.
    pub fn from_config(config: &BacktestConfig) -> Result<Self, BacktestError> {
        validate_config(config)?;
        let strategy = MACrossover::new(config)?;
        let risk_manager = ExitPolicy::new(config)?;
        Self::new(config.clone(), Box::new(strategy), Box::new(risk_manager))
    }

    /// Walks the series once, left to right, and returns the trade log.
    ///
    /// Every bar is fed to the strategy, but positions are only opened or
    /// managed from bar `warmup_bars()` on.
    pub fn run(mut self, prices: &[PricePoint]) -> Result<SimulationOutcome, BacktestError> {
        validate_series(prices)?;

        let warmup = self.config.warmup_bars();
        if prices.len() < warmup {
            return Err(BacktestError::InsufficientData {
                bars: prices.len(),
                required: warmup,
            });
        }

        let initial_balance = self.config.initial_balance;
        let mut balance = initial_balance;
        let mut last_balance = initial_balance;
        let mut state = PositionState::Flat;
        let mut events: Vec<TradeEvent> = Vec::new();

        for (index, point) in prices.iter().enumerate() {
            let signal = self.strategy.evaluate(point)?;
            if index < warmup {
                continue;
            }

            state = match state {
                PositionState::Flat => {
                    if signal != Signal::Buy {
                        continue;
                    }
                    let levels = self.risk_manager.initial_levels(point.close)?;
                    let quantity = balance
                        .checked_div(point.close)
                        .ok_or(BacktestError::Overflow("sizing the position"))?;
                    balance = Decimal::ZERO;

                    tracing::debug!(
                        bar = index,
                        price = %point.close,
                        %quantity,
                        target = %levels.target_price,
                        stop = %levels.stop_loss_price,
                        "Opened long position"
                    );
                    events.push(TradeEvent::buy(point.close, point.timestamp));

                    PositionState::Long {
                        quantity,
                        entry_price: point.close,
                        levels,
                    }
                }
                PositionState::Long {
                    quantity,
                    entry_price,
                    levels,
                } => match self.risk_manager.evaluate(point.close, &levels)? {
                    ExitDecision::Hold => state,
                    ExitDecision::Ratchet(levels) => {
                        tracing::debug!(
                            bar = index,
                            target = %levels.target_price,
                            stop = %levels.stop_loss_price,
                            "Ratcheted protective levels"
                        );
                        events.push(TradeEvent::target_update(point.close, point.timestamp, levels));
                        PositionState::Long {
                            quantity,
                            entry_price,
                            levels,
                        }
                    }
                    ExitDecision::Exit { reason, fill_price } => {
                        balance = quantity
                            .checked_mul(fill_price)
                            .ok_or(BacktestError::Overflow("liquidating the position"))?;
                        last_balance = balance;

                        tracing::debug!(bar = index, price = %fill_price, ?reason, %balance, "Closed long position");
                        events.push(TradeEvent::sell(fill_price, point.timestamp, reason));
                        PositionState::Flat
                    }
                },
            };
        }

        // Still holding at the end of the series: sell at the last available price.
        if let (PositionState::Long { quantity, .. }, Some(last)) = (state, prices.last()) {
            last_balance = quantity
                .checked_mul(last.close)
                .ok_or(BacktestError::Overflow("liquidating the final position"))?;
            tracing::debug!(price = %last.close, balance = %last_balance, "Forced final liquidation");
            events.push(TradeEvent::sell(last.close, last.timestamp, ExitReason::EndOfSeries));
        }

        tracing::info!(
            bars = prices.len(),
            trades = events.len(),
            %initial_balance,
            final_balance = %last_balance,
            "Backtest complete"
        );

        Ok(SimulationOutcome {
            initial_balance,
            final_balance: last_balance,
            events,
        })
    }
}

/// Runs the standard SMA crossover backtest with typed errors.
pub fn simulate(
    prices: &[PricePoint],
    config: &BacktestConfig,
) -> Result<SimulationOutcome, BacktestError> {
    Backtester::from_config(config)?.run(prices)
}

/// Runs the standard SMA crossover backtest and packages the outcome.
///
/// This never fails: a series too short for the warm-up yields an empty trade
/// log with the initial balance, and any other error becomes a `failure` result.
pub fn run_backtest(prices: &[PricePoint], config: &BacktestConfig) -> BacktestResult {
    let reporter = ResultReporter::new();
    match simulate(prices, config) {
        Ok(outcome) => reporter.report(outcome.final_balance, &outcome.events),
        Err(BacktestError::InsufficientData { bars, required }) => {
            tracing::warn!(bars, required, "Not enough bars to trade; reporting the initial balance");
            reporter.report(config.initial_balance, &[])
        }
        Err(e) => reporter.failure(e),
    }
}
