//! Member, presence, and voice handlers

use serde_json::Value;

use ripple_core::ClientEvent;

use crate::error::DispatchError;
use crate::events::payloads::{
    MemberPayload, MembersChunkPayload, PresencePayload, VoiceStatePayload,
};

use super::Dispatcher;

impl Dispatcher {
    pub(super) fn handle_member_add(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: MemberPayload = Self::decode(data)?;
        let Some(guild_id) = payload.guild_id else {
            tracing::warn!("GUILD_MEMBER_ADD without a guild id");
            return Ok(());
        };
        let store = self.state.store();

        let Some(guild) = store.guild(guild_id) else {
            tracing::warn!(guild_id = %guild_id, "GUILD_MEMBER_ADD referenced an unknown guild");
            return Ok(());
        };
        let already_member = guild.members.contains(&payload.user.id);

        let Some(user) = store.add_member(guild_id, payload.user.into_entity()) else {
            return Ok(());
        };
        // A re-delivery refreshes the user record but is not a new join
        if already_member {
            tracing::debug!(
                user_id = %user.id,
                guild_id = %guild_id,
                "GUILD_MEMBER_ADD for an existing member"
            );
            return Ok(());
        }
        store.update_guild(guild_id, |g| g.member_count += 1);

        self.emit(ClientEvent::UserJoined { guild_id, user });
        Ok(())
    }

    pub(super) fn handle_member_update(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: MemberPayload = Self::decode(data)?;
        let Some(guild_id) = payload.guild_id else {
            tracing::warn!("GUILD_MEMBER_UPDATE without a guild id");
            return Ok(());
        };
        let store = self.state.store();

        let Some(guild) = store.guild(guild_id) else {
            tracing::warn!(guild_id = %guild_id, "GUILD_MEMBER_UPDATE referenced an unknown guild");
            return Ok(());
        };
        if !guild.members.contains(&payload.user.id) {
            tracing::warn!(user_id = %payload.user.id, "GUILD_MEMBER_UPDATE referenced an unknown member");
            return Ok(());
        }

        let before = self.snapshot(store.user(payload.user.id));
        let Some(after) = store.update_user(payload.user.id, |u| {
            u.set_username(payload.user.username.clone());
            u.set_discriminator(payload.user.discriminator.clone());
        }) else {
            return Ok(());
        };

        self.emit(ClientEvent::UserUpdated { before, after });
        Ok(())
    }

    pub(super) fn handle_member_remove(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: MemberPayload = Self::decode(data)?;
        let Some(guild_id) = payload.guild_id else {
            tracing::warn!("GUILD_MEMBER_REMOVE without a guild id");
            return Ok(());
        };
        let store = self.state.store();

        if store.guild(guild_id).is_none() {
            tracing::warn!(guild_id = %guild_id, "GUILD_MEMBER_REMOVE referenced an unknown guild");
            return Ok(());
        }
        let Some(user) = store.remove_member(guild_id, payload.user.id) else {
            tracing::warn!(user_id = %payload.user.id, "GUILD_MEMBER_REMOVE referenced an unknown member");
            return Ok(());
        };
        store.update_guild(guild_id, |g| g.member_count = g.member_count.saturating_sub(1));

        self.emit(ClientEvent::UserLeft { guild_id, user });
        Ok(())
    }

    pub(super) fn handle_members_chunk(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: MembersChunkPayload = Self::decode(data)?;
        let store = self.state.store();

        if store.guild(payload.guild_id).is_none() {
            tracing::warn!(guild_id = %payload.guild_id, "GUILD_MEMBERS_CHUNK referenced an unknown guild");
            return Ok(());
        }

        for member in payload.members {
            store.add_member(payload.guild_id, member.user.into_entity());
        }

        if let Some(guild) = store.guild(payload.guild_id) {
            if guild.has_all_members() {
                tracing::debug!(
                    guild_id = %guild.id,
                    members = guild.downloaded_member_count,
                    "Member download complete"
                );
                self.downloader.complete(guild.id);
                self.emit(ClientEvent::GuildMembersDownloaded(guild));
            }
        }
        Ok(())
    }

    pub(super) fn handle_presence_update(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: PresencePayload = Self::decode(data)?;
        let store = self.state.store();

        if let Some(guild_id) = payload.guild_id {
            if store.guild(guild_id).is_none() {
                tracing::warn!(guild_id = %guild_id, "PRESENCE_UPDATE referenced an unknown guild");
                return Ok(());
            }
        }
        if store.user(payload.user.id).is_none() {
            // Presences still arrive briefly for users that just left
            tracing::debug!(user_id = %payload.user.id, "PRESENCE_UPDATE for an uncached user");
            return Ok(());
        }
        // Only identity refreshes are mirrored into the cache
        if payload.user.username.is_none() && payload.user.discriminator.is_none() {
            return Ok(());
        }

        let before = self.snapshot(store.user(payload.user.id));
        let Some(after) = store.update_user(payload.user.id, |u| {
            if let Some(username) = payload.user.username.clone() {
                u.set_username(username);
            }
            if let Some(discriminator) = payload.user.discriminator.clone() {
                u.set_discriminator(discriminator);
            }
        }) else {
            return Ok(());
        };

        self.emit(ClientEvent::UserUpdated { before, after });
        Ok(())
    }

    pub(super) fn handle_voice_state_update(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: VoiceStatePayload = Self::decode(data)?;
        let store = self.state.store();

        if let Some(guild_id) = payload.guild_id {
            if store.guild(guild_id).is_none() {
                tracing::warn!(guild_id = %guild_id, "VOICE_STATE_UPDATE referenced an unknown guild");
                return Ok(());
            }
        }
        let Some(user) = store.user(payload.user_id) else {
            tracing::debug!(user_id = %payload.user_id, "VOICE_STATE_UPDATE for an uncached user");
            return Ok(());
        };

        let before = self.snapshot(Some(user.clone()));
        self.emit(ClientEvent::UserUpdated {
            before,
            after: user,
        });
        Ok(())
    }
}
