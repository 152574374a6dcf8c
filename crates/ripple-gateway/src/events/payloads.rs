//! Dispatch event payload definitions
//!
//! Wire shapes for the `d` field of dispatch frames, with conversions into
//! the cached entity types. Unknown fields are ignored so the client stays
//! tolerant of server-side additions.

use chrono::{DateTime, Utc};
use ripple_core::{Guild, Role, Snowflake, User};
use serde::Deserialize;

/// A full user object
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub id: Snowflake,
    pub username: String,
    pub discriminator: String,
}

impl UserPayload {
    /// Convert into the cached entity
    #[must_use]
    pub fn into_entity(self) -> User {
        User::new(self.id, self.username, self.discriminator)
    }
}

/// A user reference that may omit identity fields (presence updates)
#[derive(Debug, Clone, Deserialize)]
pub struct PartialUserPayload {
    pub id: Snowflake,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub discriminator: Option<String>,
}

/// Payload for READY
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyPayload {
    pub session_id: String,
    pub user: UserPayload,
    #[serde(default)]
    pub guilds: Vec<GuildPayload>,
    #[serde(default)]
    pub private_channels: Vec<ChannelPayload>,
}

/// Payload for GUILD_CREATE / GUILD_UPDATE / GUILD_DELETE
///
/// Unavailable guilds arrive as a bare id with `unavailable: true`; every
/// other field is optional to cover that shape and partial updates.
#[derive(Debug, Clone, Deserialize)]
pub struct GuildPayload {
    pub id: Snowflake,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub large: Option<bool>,
    #[serde(default)]
    pub unavailable: Option<bool>,
    #[serde(default)]
    pub member_count: Option<usize>,
    #[serde(default)]
    pub channels: Vec<ChannelPayload>,
    #[serde(default)]
    pub members: Vec<MemberPayload>,
}

impl GuildPayload {
    /// Convert into a bare guild entity; channels and members are attached
    /// through the cache separately.
    #[must_use]
    pub fn entity(&self) -> Guild {
        let mut guild = Guild::new(self.id, self.name.clone().unwrap_or_default());
        guild.large = self.large.unwrap_or(false);
        guild.unavailable = self.unavailable.unwrap_or(false);
        guild.member_count = self.member_count.unwrap_or(0);
        guild
    }
}

/// Payload for CHANNEL_CREATE / CHANNEL_UPDATE / CHANNEL_DELETE, also the
/// channel shape embedded in guild payloads
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelPayload {
    pub id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub name: Option<String>,
    /// DM channels carry their single recipient inline
    #[serde(default)]
    pub recipient: Option<UserPayload>,
}

/// Payload for GUILD_MEMBER_ADD / GUILD_MEMBER_UPDATE / GUILD_MEMBER_REMOVE
#[derive(Debug, Clone, Deserialize)]
pub struct MemberPayload {
    pub user: UserPayload,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
}

/// Payload for GUILD_MEMBERS_CHUNK
#[derive(Debug, Clone, Deserialize)]
pub struct MembersChunkPayload {
    pub guild_id: Snowflake,
    #[serde(default)]
    pub members: Vec<MemberPayload>,
}

/// A role object as carried by role events
#[derive(Debug, Clone, Deserialize)]
pub struct RolePayload {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub position: i32,
}

impl RolePayload {
    /// Convert into the cached entity for the given guild
    #[must_use]
    pub fn entity(&self, guild_id: Snowflake) -> Role {
        let mut role = Role::new(self.id, guild_id, self.name.clone());
        role.position = self.position;
        role
    }
}

/// Payload for GUILD_ROLE_CREATE / GUILD_ROLE_UPDATE
#[derive(Debug, Clone, Deserialize)]
pub struct GuildRolePayload {
    pub guild_id: Snowflake,
    pub role: RolePayload,
}

/// Payload for GUILD_ROLE_DELETE
#[derive(Debug, Clone, Deserialize)]
pub struct GuildRoleDeletePayload {
    pub guild_id: Snowflake,
    pub role_id: Snowflake,
}

/// Payload for GUILD_BAN_ADD / GUILD_BAN_REMOVE
#[derive(Debug, Clone, Deserialize)]
pub struct GuildBanPayload {
    pub guild_id: Snowflake,
    pub user: UserPayload,
}

/// Payload for MESSAGE_CREATE / MESSAGE_UPDATE / MESSAGE_DELETE
#[derive(Debug, Clone, Deserialize)]
pub struct MessagePayload {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub author: Option<UserPayload>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub edited_timestamp: Option<DateTime<Utc>>,
}

/// Payload for PRESENCE_UPDATE
#[derive(Debug, Clone, Deserialize)]
pub struct PresencePayload {
    pub user: PartialUserPayload,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
}

/// Payload for TYPING_START
#[derive(Debug, Clone, Deserialize)]
pub struct TypingStartPayload {
    pub channel_id: Snowflake,
    pub user_id: Snowflake,
}

/// Payload for VOICE_STATE_UPDATE
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceStatePayload {
    pub user_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
}
