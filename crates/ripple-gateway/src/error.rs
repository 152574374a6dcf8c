//! Gateway error types

use crate::transport::TransportError;

/// Errors surfaced by the connection lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Connect was attempted before a successful login
    #[error("You must log in before connecting")]
    NotLoggedIn,

    /// The transport reported a failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session did not become ready within the configured timeout
    #[error("Timed out waiting for the session to become ready")]
    ConnectTimeout,

    /// The connection was torn down before the session became ready
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// Errors raised while handling a single inbound frame
///
/// These never escape the dispatcher; a failed frame is logged and the next
/// frame is processed normally.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The frame payload could not be decoded
    #[error("Failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// An outbound send triggered by the frame failed
    #[error(transparent)]
    Transport(#[from] TransportError),
}
