//! Logging System
//!
//! Structured diagnostics through `tracing`. Logs go to stderr so they never interleave with
//! reporter output on stdout. The filter comes from `SPECTREE_LOG` when set, otherwise from
//! the configured level, otherwise `warn`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::errors::SpecError;

pub const LOG_ENV: &str = "SPECTREE_LOG";
const DEFAULT_LEVEL: &str = "warn";

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(level: Option<&str>) -> Result<(), SpecError> {
    let filter = build_env_filter(level)?;
    Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| SpecError::Logging(e.to_string()))
}

fn build_env_filter(level: Option<&str>) -> Result<EnvFilter, SpecError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    filter_for_level(level.unwrap_or(DEFAULT_LEVEL))
}

fn filter_for_level(level: &str) -> Result<EnvFilter, SpecError> {
    EnvFilter::try_new(level)
        .map_err(|e| SpecError::Logging(format!("invalid log level '{}': {}", level, e)))
}
