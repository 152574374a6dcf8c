//! Ripple Gateway - Real-time gateway client
//!
//! This crate implements the persistent gateway session for the Ripple
//! platform:
//! - Connection lifecycle (login, connect, disconnect) with timeout handling
//! - Inbound frame dispatch that keeps the entity cache consistent
//! - Heartbeat scheduling and latency measurement
//! - On-demand guild member downloads with batched requests
//!
//! The wire connection itself is provided by the embedder through the
//! [`GatewayTransport`] trait; this crate owns everything above it.

pub mod config;
pub mod connection;
pub mod dispatch;
pub mod download;
pub mod error;
pub mod events;
pub mod heartbeat;
pub mod protocol;
pub mod transport;

pub use config::ClientConfig;
pub use connection::{ConnectionState, GatewayClient};
pub use error::{DispatchError, GatewayError};
pub use events::GatewayEventType;
pub use protocol::{GatewayFrame, HelloPayload, OpCode};
pub use transport::{GatewayTransport, TransportError};
