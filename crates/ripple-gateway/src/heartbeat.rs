//! Heartbeat loop
//!
//! Runs as a background task for the lifetime of one connection. Each tick
//! sends a heartbeat carrying the last seen sequence number; the latency
//! measurement happens in the dispatch path when the ACK arrives.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::connection::state::ClientState;
use crate::connection::ConnectionState;
use crate::transport::GatewayTransport;

/// Spawn the heartbeat loop for the current connection
///
/// The loop ends when the shutdown signal fires, the connection leaves the
/// active states, or a send fails.
pub(crate) fn spawn(
    state: Arc<ClientState>,
    transport: Arc<dyn GatewayTransport>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!(interval_ms = interval.as_millis() as u64, "Heartbeat loop started");

        loop {
            if *shutdown.borrow() {
                break;
            }
            let connection = state.connection_state();
            if !matches!(
                connection,
                ConnectionState::Connecting | ConnectionState::Connected
            ) {
                break;
            }

            state.record_heartbeat_sent();
            if let Err(error) = transport.send_heartbeat(state.last_sequence()).await {
                tracing::warn!(error = %error, "Failed to send heartbeat");
                break;
            }

            tokio::select! {
                () = tokio::time::sleep(interval) => {}
                _ = shutdown.changed() => break,
            }
        }

        tracing::debug!("Heartbeat loop stopped");
    })
}
