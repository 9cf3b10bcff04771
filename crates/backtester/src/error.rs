use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Invalid moving-average windows: {0}")]
    InvalidWindow(String),

    #[error("Initial balance must be positive, got {0}")]
    InvalidBalance(Decimal),

    #[error("Price series has {bars} bars but the warm-up needs {required}")]
    InsufficientData { bars: usize, required: usize },

    #[error("Malformed price series at bar {index}: {reason}")]
    MalformedInput { index: usize, reason: String },

    #[error("Strategy execution error: {0}")]
    Strategy(#[from] strategies::StrategyError),

    #[error("Risk management error: {0}")]
    Risk(#[from] risk::RiskError),

    #[error("Arithmetic overflow while {0}")]
    Overflow(&'static str),
}
