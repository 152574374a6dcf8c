//! Cached chat message.

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// A message inside a text or DM channel.
///
/// The author is stored by id; look the user up through the cache so
/// edits to the shared user object are visible here too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub edited_timestamp: Option<DateTime<Utc>>,
}

impl Message {
    #[must_use]
    pub fn new(
        id: Snowflake,
        channel_id: Snowflake,
        author_id: Snowflake,
        content: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            channel_id,
            author_id,
            content,
            timestamp,
            edited_timestamp: None,
        }
    }

    /// Whether the server has delivered an edit for this message.
    #[inline]
    #[must_use]
    pub fn is_edited(&self) -> bool {
        self.edited_timestamp.is_some()
    }

    /// Apply an edit to the message content
    pub fn set_content(&mut self, content: String, edited_at: Option<DateTime<Utc>>) {
        self.content = content;
        self.edited_timestamp = edited_at;
    }
}
