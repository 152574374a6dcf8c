//! Entity storage

mod entity_cache;
mod messages;

pub use entity_cache::EntityCache;
pub use messages::MessageStore;
