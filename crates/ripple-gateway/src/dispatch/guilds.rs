//! Guild, role, and ban handlers

use serde_json::Value;

use ripple_core::ClientEvent;

use crate::error::DispatchError;
use crate::events::payloads::{
    GuildBanPayload, GuildPayload, GuildRoleDeletePayload, GuildRolePayload,
};

use super::Dispatcher;

impl Dispatcher {
    pub(super) fn handle_guild_create(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: GuildPayload = Self::decode(data)?;
        let store = self.state.store();

        Self::add_guild(&store, &payload);
        let Some(guild) = store.guild(payload.id) else {
            return Ok(());
        };

        // An explicit `unavailable: false` means a known guild came back
        // after an outage; anything else is a first-time join
        if payload.unavailable == Some(false) {
            self.emit(ClientEvent::GuildAvailable(guild));
        } else {
            self.emit(ClientEvent::GuildJoined(guild.clone()));
            self.emit(ClientEvent::GuildAvailable(guild));
        }
        Ok(())
    }

    pub(super) fn handle_guild_update(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: GuildPayload = Self::decode(data)?;
        let store = self.state.store();

        if store.guild(payload.id).is_none() {
            tracing::warn!(guild_id = %payload.id, "GUILD_UPDATE referenced an unknown guild");
            return Ok(());
        }

        let before = self.snapshot(store.guild(payload.id));
        let Some(after) = store.update_guild(payload.id, |g| {
            if let Some(name) = payload.name.clone() {
                g.set_name(name);
            }
            if let Some(large) = payload.large {
                g.large = large;
            }
            if let Some(count) = payload.member_count {
                g.member_count = count;
            }
        }) else {
            return Ok(());
        };

        self.emit(ClientEvent::GuildUpdated { before, after });
        Ok(())
    }

    pub(super) fn handle_guild_delete(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: GuildPayload = Self::decode(data)?;
        let store = self.state.store();

        let Some(guild) = store.remove_guild(payload.id) else {
            tracing::warn!(guild_id = %payload.id, "GUILD_DELETE referenced an unknown guild");
            return Ok(());
        };

        self.emit(ClientEvent::GuildUnavailable(guild.clone()));
        // `unavailable: true` marks an outage; the current user is still a
        // member, so no leave notification
        if payload.unavailable != Some(true) {
            self.emit(ClientEvent::GuildLeft(guild));
        }
        Ok(())
    }

    // === Roles ===

    pub(super) fn handle_role_create(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: GuildRolePayload = Self::decode(data)?;
        let store = self.state.store();

        let role = payload.role.entity(payload.guild_id);
        if store
            .update_guild(payload.guild_id, |g| g.add_role(role.clone()))
            .is_none()
        {
            tracing::warn!(guild_id = %payload.guild_id, "GUILD_ROLE_CREATE referenced an unknown guild");
            return Ok(());
        }

        self.emit(ClientEvent::RoleCreated(role));
        Ok(())
    }

    pub(super) fn handle_role_update(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: GuildRolePayload = Self::decode(data)?;
        let store = self.state.store();

        let Some(guild) = store.guild(payload.guild_id) else {
            tracing::warn!(guild_id = %payload.guild_id, "GUILD_ROLE_UPDATE referenced an unknown guild");
            return Ok(());
        };
        let Some(existing) = guild.role(payload.role.id) else {
            tracing::warn!(role_id = %payload.role.id, "GUILD_ROLE_UPDATE referenced an unknown role");
            return Ok(());
        };

        let before = self.snapshot(Some(existing.clone()));
        let after = payload.role.entity(payload.guild_id);
        store.update_guild(payload.guild_id, |g| g.add_role(after.clone()));

        self.emit(ClientEvent::RoleUpdated { before, after });
        Ok(())
    }

    pub(super) fn handle_role_delete(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: GuildRoleDeletePayload = Self::decode(data)?;
        let store = self.state.store();

        let mut removed = None;
        if store
            .update_guild(payload.guild_id, |g| removed = g.remove_role(payload.role_id))
            .is_none()
        {
            tracing::warn!(guild_id = %payload.guild_id, "GUILD_ROLE_DELETE referenced an unknown guild");
            return Ok(());
        }
        let Some(role) = removed else {
            tracing::warn!(role_id = %payload.role_id, "GUILD_ROLE_DELETE referenced an unknown role");
            return Ok(());
        };

        self.emit(ClientEvent::RoleDeleted(role));
        Ok(())
    }

    // === Bans ===

    pub(super) fn handle_ban_add(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: GuildBanPayload = Self::decode(data)?;
        let store = self.state.store();

        if store.guild(payload.guild_id).is_none() {
            tracing::warn!(guild_id = %payload.guild_id, "GUILD_BAN_ADD referenced an unknown guild");
            return Ok(());
        }

        self.emit(ClientEvent::UserBanned {
            guild_id: payload.guild_id,
            user: payload.user.into_entity(),
        });
        Ok(())
    }

    pub(super) fn handle_ban_remove(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: GuildBanPayload = Self::decode(data)?;
        let store = self.state.store();

        if store.guild(payload.guild_id).is_none() {
            tracing::warn!(guild_id = %payload.guild_id, "GUILD_BAN_REMOVE referenced an unknown guild");
            return Ok(());
        }

        self.emit(ClientEvent::UserUnbanned {
            guild_id: payload.guild_id,
            user: payload.user.into_entity(),
        });
        Ok(())
    }
}
