pub mod config;
pub mod error;

pub use config::{Config, DecorationConfig, LocationConfig, ValidationResult, WeatherConfig};
pub use error::{
    AppError, ConfigError, NetworkError, ReqwestErrorExt, WeatherError,
    location_denied_notice, FORECAST_FAILURE_MESSAGE,
};

use anyhow::Result;

/// Initialize logging.
///
/// Logs go to stderr so dashboard output on stdout stays clean.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("twcast core initialized");
    Ok(())
}
