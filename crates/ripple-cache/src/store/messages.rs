//! Per-channel message buffers
//!
//! Messages are capacity-bounded per channel; the oldest message is evicted
//! when a channel's buffer is full.

use std::collections::VecDeque;

use dashmap::DashMap;
use ripple_core::{Message, Snowflake};

/// Capacity-bounded message storage keyed by channel id
pub struct MessageStore {
    buffers: DashMap<Snowflake, VecDeque<Message>>,
    capacity: usize,
}

impl MessageStore {
    /// Create a new store with the given per-channel capacity
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            buffers: DashMap::new(),
            capacity,
        }
    }

    /// Get a message by channel and message id
    pub fn get(&self, channel_id: Snowflake, message_id: Snowflake) -> Option<Message> {
        self.buffers
            .get(&channel_id)
            .and_then(|buf| buf.iter().find(|m| m.id == message_id).cloned())
    }

    /// Add a message to its channel's buffer, evicting the oldest if full
    pub fn add(&self, message: Message) {
        if self.capacity == 0 {
            return;
        }

        let mut buffer = self
            .buffers
            .entry(message.channel_id)
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));

        if buffer.len() >= self.capacity {
            if let Some(evicted) = buffer.pop_front() {
                tracing::trace!(
                    channel_id = %evicted.channel_id,
                    message_id = %evicted.id,
                    "Evicted oldest cached message"
                );
            }
        }
        buffer.push_back(message);
    }

    /// Mutate a message in place, returning the updated copy
    pub fn update<F>(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        f: F,
    ) -> Option<Message>
    where
        F: FnOnce(&mut Message),
    {
        let mut buffer = self.buffers.get_mut(&channel_id)?;
        let message = buffer.iter_mut().find(|m| m.id == message_id)?;
        f(message);
        Some(message.clone())
    }

    /// Remove a message from its channel's buffer
    pub fn remove(&self, channel_id: Snowflake, message_id: Snowflake) -> Option<Message> {
        let mut buffer = self.buffers.get_mut(&channel_id)?;
        let pos = buffer.iter().position(|m| m.id == message_id)?;
        buffer.remove(pos)
    }

    /// Drop every message cached for a channel
    pub fn remove_channel(&self, channel_id: Snowflake) {
        self.buffers.remove(&channel_id);
    }

    /// Number of messages cached for a channel
    #[must_use]
    pub fn channel_len(&self, channel_id: Snowflake) -> usize {
        self.buffers.get(&channel_id).map_or(0, |buf| buf.len())
    }
}
