//! Client events - typed notifications emitted to subscribers

mod client_event;

pub use client_event::ClientEvent;
