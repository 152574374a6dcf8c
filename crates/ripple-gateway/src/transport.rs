//! Transport abstraction
//!
//! The socket connection and outbound wire encoding live behind
//! [`GatewayTransport`]. The embedder supplies an implementation and feeds
//! received frames back into [`GatewayClient`](crate::GatewayClient) via
//! `process`, reporting connection-level failures via `transport_failed`.

use async_trait::async_trait;
use ripple_core::{Snowflake, VoiceRegion};

/// Outbound side of the gateway connection.
///
/// All methods are invoked from async tasks and may be called concurrently.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// Open the underlying socket connection.
    async fn connect(&self) -> Result<(), TransportError>;

    /// Close the underlying socket connection.
    async fn disconnect(&self) -> Result<(), TransportError>;

    /// Send an Identify (op=2) with the given token.
    async fn send_identify(&self, token: &str) -> Result<(), TransportError>;

    /// Send a Heartbeat (op=1) carrying the last seen sequence number.
    async fn send_heartbeat(&self, sequence: Option<u64>) -> Result<(), TransportError>;

    /// Send a Request Members (op=6) for the given guilds.
    async fn send_request_members(&self, guild_ids: &[Snowflake]) -> Result<(), TransportError>;

    /// Fetch the list of voice regions from the platform API.
    async fn voice_regions(&self) -> Result<Vec<VoiceRegion>, TransportError>;
}

/// Error reported by a transport implementation
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    /// Create a transport error with the given message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
