//! # ripple-core
//!
//! Domain layer containing entities, the snowflake identifier, and the typed
//! client event enum. This crate has zero dependencies on the gateway or
//! cache infrastructure.

pub mod entities;
pub mod events;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Channel, ChannelKind, Guild, Message, Role, User, VoiceRegion};
pub use events::ClientEvent;
pub use value_objects::{Snowflake, SnowflakeParseError};
