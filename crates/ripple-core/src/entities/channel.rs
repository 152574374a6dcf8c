//! Text and direct-message channels.

use crate::value_objects::Snowflake;

/// Channel kind
///
/// Guild channels are owned by their guild; DM channels are owned by their
/// recipient user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelKind {
    /// Guild text channel
    #[default]
    Text,
    /// Direct message between the current user and one recipient
    Dm,
}

/// A place messages land, either inside a guild or in a DM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub kind: ChannelKind,
    /// Owning guild (guild channels only)
    pub guild_id: Option<Snowflake>,
    /// Recipient user (DM channels only)
    pub recipient_id: Option<Snowflake>,
    pub name: Option<String>,
}

impl Channel {
    /// Create a new guild text channel
    #[must_use]
    pub fn new_text(id: Snowflake, guild_id: Snowflake, name: Option<String>) -> Self {
        Self {
            id,
            kind: ChannelKind::Text,
            guild_id: Some(guild_id),
            recipient_id: None,
            name,
        }
    }

    /// Create a new DM channel
    #[must_use]
    pub fn new_dm(id: Snowflake, recipient_id: Snowflake) -> Self {
        Self {
            id,
            kind: ChannelKind::Dm,
            guild_id: None,
            recipient_id: Some(recipient_id),
            name: None,
        }
    }

    /// Check if this is a DM channel
    #[inline]
    #[must_use]
    pub fn is_dm(&self) -> bool {
        matches!(self.kind, ChannelKind::Dm)
    }

    /// Check if this is a guild channel
    #[inline]
    #[must_use]
    pub fn is_guild_channel(&self) -> bool {
        self.guild_id.is_some()
    }

    /// Get display name (channel name or fallback for DMs)
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Direct Message")
    }

    /// Update channel name
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }
}
