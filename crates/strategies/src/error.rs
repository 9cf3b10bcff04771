use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Strategy received invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid moving-average window: {0}")]
    InvalidWindow(String),

    #[error("Moving-average series must be aligned: short has {short} values, long has {long}")]
    SeriesLengthMismatch { short: usize, long: usize },

    #[error("An error occurred during indicator calculation: {0}")]
    IndicatorError(String),
}
