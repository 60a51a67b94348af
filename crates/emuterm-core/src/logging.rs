#![forbid(unsafe_code)]

//! Subscriber installation for hosts and tools.
//!
//! The library itself only emits `tracing` events; nothing is printed until
//! a host calls [`init`]. The filter comes from `EMUTERM_LOG` (standard
//! `EnvFilter` syntax) and defaults to `info`.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "EMUTERM_LOG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines on stderr.
    #[default]
    Text,
    /// One JSON object per event on stderr.
    #[cfg(feature = "tracing-json")]
    Json,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("a global tracing subscriber is already installed: {0}")]
    AlreadyInstalled(String),
}

/// Filter from `EMUTERM_LOG`, or `info` if unset or unparsable.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// Fails (without panicking) if one is already installed.
pub fn init(format: LogFormat) -> Result<(), LoggingError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr);
    let result = match format {
        LogFormat::Text => builder.try_init(),
        #[cfg(feature = "tracing-json")]
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|err| LoggingError::AlreadyInstalled(err.to_string()))
}
