use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{BacktestConfig, BacktestOverrides, Config, LoggingConfig};

/// Prefix of the environment variables that override file settings,
/// e.g. `CROSSOVER_BACKTEST__SHORT_WINDOW=5`.
pub const ENV_PREFIX: &str = "CROSSOVER";

/// Loads the application configuration.
///
/// Sources, lowest priority first: built-in defaults, then the TOML file
/// (`path` if given and required to exist, otherwise an optional `config.toml`
/// in the working directory), then `CROSSOVER_*` environment variables.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file_source = match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.display().to_string()));
            }
            config::File::from(path).required(true)
        }
        None => config::File::with_name("config").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file_source)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    tracing::debug!(?config, "Configuration loaded");

    Ok(config)
}
