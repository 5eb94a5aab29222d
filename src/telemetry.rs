use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;
use crate::errors::{PrequalError, Result};

/// `RUST_LOG` wins over the configured level
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|err| PrequalError::Telemetry {
            message: format!("invalid log level/filter '{}': {err}", config.log_level),
        }),
    }
}

/// install the global fmt subscriber
pub fn init(config: &TelemetryConfig) -> Result<()> {
    let env_filter = build_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(|err| PrequalError::Telemetry {
            message: err.to_string(),
        })
}
