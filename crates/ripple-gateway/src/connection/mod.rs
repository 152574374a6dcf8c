//! Connection lifecycle
//!
//! The gateway client, its connection state machine, and the shared session
//! state mutated by the dispatch path.

pub mod client;
pub mod state;

pub use client::GatewayClient;
pub use state::ConnectionState;
