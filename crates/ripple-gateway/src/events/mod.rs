//! Inbound dispatch events
//!
//! Event type names and the payload shapes carried by dispatch frames.

pub mod event_types;
pub mod payloads;

pub use event_types::GatewayEventType;
