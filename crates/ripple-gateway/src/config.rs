//! Client configuration

use ripple_common::GatewaySettings;
use std::time::Duration;

/// Behavioral knobs for [`GatewayClient`](crate::GatewayClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Messages retained per channel (0 disables message caching)
    pub message_cache_size: usize,

    /// How long `connect` waits for the session-ready signal
    pub connection_timeout: Duration,

    /// Capture a snapshot of the previous entity state for update
    /// notifications
    pub enable_pre_update_events: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            message_cache_size: 100,
            connection_timeout: Duration::from_secs(30),
            enable_pre_update_events: false,
        }
    }
}

impl From<&GatewaySettings> for ClientConfig {
    fn from(settings: &GatewaySettings) -> Self {
        Self {
            message_cache_size: settings.message_cache_size,
            connection_timeout: Duration::from_millis(settings.connection_timeout_ms),
            enable_pre_update_events: settings.enable_pre_update_events,
        }
    }
}
