//! Frame fixtures
//!
//! JSON builders for the inbound frames used across the integration tests.

use ripple_gateway::{GatewayFrame, HelloPayload};
use serde_json::{json, Value};

/// A full user object
#[must_use]
pub fn user_json(id: u64, username: &str) -> Value {
    json!({
        "id": id.to_string(),
        "username": username,
        "discriminator": "0001",
    })
}

/// A guild with no embedded channels or members
#[must_use]
pub fn guild_json(id: u64, name: &str, member_count: usize) -> Value {
    json!({
        "id": id.to_string(),
        "name": name,
        "member_count": member_count,
        "channels": [],
        "members": [],
    })
}

/// A guild with embedded channels and members
#[must_use]
pub fn guild_json_with(
    id: u64,
    name: &str,
    member_count: usize,
    channels: Vec<Value>,
    members: Vec<Value>,
) -> Value {
    json!({
        "id": id.to_string(),
        "name": name,
        "member_count": member_count,
        "channels": channels,
        "members": members.into_iter().map(|user| json!({"user": user})).collect::<Vec<_>>(),
    })
}

/// A guild text channel
#[must_use]
pub fn channel_json(id: u64, guild_id: u64, name: &str) -> Value {
    json!({
        "id": id.to_string(),
        "guild_id": guild_id.to_string(),
        "name": name,
    })
}

/// A DM channel with its recipient inline
#[must_use]
pub fn dm_channel_json(id: u64, recipient: Value) -> Value {
    json!({
        "id": id.to_string(),
        "recipient": recipient,
    })
}

/// Hello frame (op=10)
#[must_use]
pub fn hello_frame(heartbeat_interval_ms: u64) -> GatewayFrame {
    GatewayFrame::hello(HelloPayload::with_interval(heartbeat_interval_ms))
}

/// READY dispatch carrying the session snapshot
#[must_use]
pub fn ready_frame(seq: u64, guilds: Vec<Value>, private_channels: Vec<Value>) -> GatewayFrame {
    GatewayFrame::dispatch(
        "READY",
        seq,
        json!({
            "session_id": "session-1",
            "user": user_json(900, "me"),
            "guilds": guilds,
            "private_channels": private_channels,
        }),
    )
}

/// GUILD_CREATE dispatch
#[must_use]
pub fn guild_create_frame(seq: u64, mut guild: Value, unavailable: Option<bool>) -> GatewayFrame {
    if let Some(unavailable) = unavailable {
        guild["unavailable"] = json!(unavailable);
    }
    GatewayFrame::dispatch("GUILD_CREATE", seq, guild)
}

/// GUILD_UPDATE dispatch renaming a guild
#[must_use]
pub fn guild_update_frame(seq: u64, guild_id: u64, name: &str) -> GatewayFrame {
    GatewayFrame::dispatch(
        "GUILD_UPDATE",
        seq,
        json!({"id": guild_id.to_string(), "name": name}),
    )
}

/// GUILD_DELETE dispatch
#[must_use]
pub fn guild_delete_frame(seq: u64, guild_id: u64, unavailable: Option<bool>) -> GatewayFrame {
    let mut data = json!({"id": guild_id.to_string()});
    if let Some(unavailable) = unavailable {
        data["unavailable"] = json!(unavailable);
    }
    GatewayFrame::dispatch("GUILD_DELETE", seq, data)
}

/// GUILD_MEMBERS_CHUNK dispatch
#[must_use]
pub fn members_chunk_frame(seq: u64, guild_id: u64, members: Vec<Value>) -> GatewayFrame {
    GatewayFrame::dispatch(
        "GUILD_MEMBERS_CHUNK",
        seq,
        json!({
            "guild_id": guild_id.to_string(),
            "members": members.into_iter().map(|user| json!({"user": user})).collect::<Vec<_>>(),
        }),
    )
}

/// GUILD_MEMBER_ADD dispatch
#[must_use]
pub fn member_add_frame(seq: u64, guild_id: u64, user: Value) -> GatewayFrame {
    GatewayFrame::dispatch(
        "GUILD_MEMBER_ADD",
        seq,
        json!({"guild_id": guild_id.to_string(), "user": user}),
    )
}

/// GUILD_MEMBER_REMOVE dispatch
#[must_use]
pub fn member_remove_frame(seq: u64, guild_id: u64, user: Value) -> GatewayFrame {
    GatewayFrame::dispatch(
        "GUILD_MEMBER_REMOVE",
        seq,
        json!({"guild_id": guild_id.to_string(), "user": user}),
    )
}

/// MESSAGE_CREATE dispatch
#[must_use]
pub fn message_create_frame(
    seq: u64,
    message_id: u64,
    channel_id: u64,
    author: Value,
    content: &str,
) -> GatewayFrame {
    GatewayFrame::dispatch(
        "MESSAGE_CREATE",
        seq,
        json!({
            "id": message_id.to_string(),
            "channel_id": channel_id.to_string(),
            "author": author,
            "content": content,
        }),
    )
}

/// CHANNEL_UPDATE dispatch
#[must_use]
pub fn channel_update_frame(seq: u64, channel_id: u64, name: &str) -> GatewayFrame {
    GatewayFrame::dispatch(
        "CHANNEL_UPDATE",
        seq,
        json!({"id": channel_id.to_string(), "name": name}),
    )
}
