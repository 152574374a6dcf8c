//! Gateway client settings
//!
//! Loads configuration from environment variables (with `.env` support).

use serde::Deserialize;
use std::env;

/// Settings for the gateway client
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySettings {
    /// Authentication token used for login
    pub token: String,
    /// Messages cached per channel
    #[serde(default = "default_message_cache_size")]
    pub message_cache_size: usize,
    /// Connect timeout in milliseconds
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,
    /// Capture a pre-mutation snapshot for update notifications
    #[serde(default)]
    pub enable_pre_update_events: bool,
}

// Default value functions
fn default_message_cache_size() -> usize {
    100
}

fn default_connection_timeout_ms() -> u64 {
    30_000
}

impl GatewaySettings {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            token: env::var("RIPPLE_TOKEN").map_err(|_| ConfigError::MissingVar("RIPPLE_TOKEN"))?,
            message_cache_size: parse_var("RIPPLE_MESSAGE_CACHE_SIZE")?
                .unwrap_or_else(default_message_cache_size),
            connection_timeout_ms: parse_var("RIPPLE_CONNECTION_TIMEOUT_MS")?
                .unwrap_or_else(default_connection_timeout_ms),
            enable_pre_update_events: env::var("RIPPLE_PRE_UPDATE_EVENTS")
                .ok()
                .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
