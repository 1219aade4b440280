//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise the CLI/env log level applies.
//! Output is human-readable by default, JSON when `LOG_FORMAT=json`.

use crate::config::ServerConfig;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Primary log filter (RUST_LOG env var)
    pub log_filter: String,
    /// Fallback log level if RUST_LOG not set
    pub default_level: String,
    /// Log format ("human" or "json")
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

impl TelemetryConfig {
    /// Create telemetry config with server config for CLI log level support
    pub fn with_server_config(config: &ServerConfig) -> Self {
        Self::from_env_with_defaults(config.log_level.clone())
    }

    fn from_env_with_defaults(default_level: String) -> Self {
        Self {
            log_filter: env::var("RUST_LOG").unwrap_or_default(),
            default_level,
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_default()
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Human,
            },
        }
    }

    fn env_filter(&self) -> EnvFilter {
        if self.log_filter.is_empty() {
            EnvFilter::new(&self.default_level)
        } else {
            EnvFilter::new(&self.log_filter)
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::from_env_with_defaults("info".to_string())
    }
}

/// Initialize the global subscriber. Safe to call more than once; later
/// calls (e.g. from tests) are no-ops.
pub fn init_logging(config: &TelemetryConfig) {
    let registry = tracing_subscriber::registry().with(config.env_filter());
    let result = match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Human => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    if result.is_err() {
        // A subscriber is already installed; keep it.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_is_human() {
        // Only meaningful when LOG_FORMAT is unset in the test env.
        if env::var("LOG_FORMAT").is_err() {
            assert_eq!(TelemetryConfig::default().log_format, LogFormat::Human);
        }
    }
}
