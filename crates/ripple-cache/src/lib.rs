//! # ripple-cache
//!
//! In-memory mirror of server-side state. All entity creation and removal
//! flows through [`EntityCache`] so that shared-user reference counting and
//! guild removal cascades cannot be bypassed.

pub mod store;

pub use store::{EntityCache, MessageStore};
