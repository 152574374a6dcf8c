//! Typed notifications emitted by the gateway client
//!
//! One tagged enum rather than many independent callback slots; subscribers
//! match on the variants they care about. `before` fields are populated only
//! when pre-update events are enabled in the client configuration.

use crate::entities::{Channel, Guild, Message, Role, User};
use crate::value_objects::Snowflake;

/// A notification emitted to client subscribers
#[derive(Debug, Clone)]
pub enum ClientEvent {
    // Lifecycle
    /// The gateway connection is established and the session is ready
    Connected,
    /// The gateway connection has been torn down
    Disconnected,
    /// The session-ready snapshot has been applied to the cache
    Ready,

    // Channels
    ChannelCreated(Channel),
    ChannelUpdated {
        before: Option<Channel>,
        after: Channel,
    },
    ChannelDestroyed(Channel),

    // Messages
    MessageReceived(Message),
    MessageUpdated {
        before: Option<Message>,
        after: Message,
    },
    MessageDeleted(Message),

    // Roles
    RoleCreated(Role),
    RoleUpdated {
        before: Option<Role>,
        after: Role,
    },
    RoleDeleted(Role),

    // Guilds
    GuildJoined(Guild),
    GuildLeft(Guild),
    GuildUpdated {
        before: Option<Guild>,
        after: Guild,
    },
    GuildAvailable(Guild),
    GuildUnavailable(Guild),
    GuildMembersDownloaded(Guild),

    // Users
    UserJoined {
        guild_id: Snowflake,
        user: User,
    },
    UserLeft {
        guild_id: Snowflake,
        user: User,
    },
    UserBanned {
        guild_id: Snowflake,
        user: User,
    },
    UserUnbanned {
        guild_id: Snowflake,
        user: User,
    },
    UserUpdated {
        before: Option<User>,
        after: User,
    },
    CurrentUserUpdated {
        before: Option<User>,
        after: User,
    },
    UserTyping {
        channel_id: Snowflake,
        user_id: Snowflake,
    },

    // Connection health
    /// Round-trip latency to the gateway, in milliseconds
    LatencyUpdated(u64),
}

impl ClientEvent {
    /// Get the event kind name, for logging
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Ready => "ready",
            Self::ChannelCreated(_) => "channel_created",
            Self::ChannelUpdated { .. } => "channel_updated",
            Self::ChannelDestroyed(_) => "channel_destroyed",
            Self::MessageReceived(_) => "message_received",
            Self::MessageUpdated { .. } => "message_updated",
            Self::MessageDeleted(_) => "message_deleted",
            Self::RoleCreated(_) => "role_created",
            Self::RoleUpdated { .. } => "role_updated",
            Self::RoleDeleted(_) => "role_deleted",
            Self::GuildJoined(_) => "guild_joined",
            Self::GuildLeft(_) => "guild_left",
            Self::GuildUpdated { .. } => "guild_updated",
            Self::GuildAvailable(_) => "guild_available",
            Self::GuildUnavailable(_) => "guild_unavailable",
            Self::GuildMembersDownloaded(_) => "guild_members_downloaded",
            Self::UserJoined { .. } => "user_joined",
            Self::UserLeft { .. } => "user_left",
            Self::UserBanned { .. } => "user_banned",
            Self::UserUnbanned { .. } => "user_unbanned",
            Self::UserUpdated { .. } => "user_updated",
            Self::CurrentUserUpdated { .. } => "current_user_updated",
            Self::UserTyping { .. } => "user_typing",
            Self::LatencyUpdated(_) => "latency_updated",
        }
    }
}
