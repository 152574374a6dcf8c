//! Session establishment and current-user handlers

use serde_json::Value;
use std::sync::Arc;

use ripple_cache::EntityCache;
use ripple_core::{Channel, ClientEvent};

use crate::error::DispatchError;
use crate::events::payloads::{ChannelPayload, GuildPayload, ReadyPayload, UserPayload};

use super::Dispatcher;

impl Dispatcher {
    /// Apply the session-ready snapshot
    ///
    /// A fresh cache is built from the snapshot and swapped in atomically,
    /// so lookups never observe a half-applied session.
    pub(super) fn handle_ready(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let ready: ReadyPayload = Self::decode(data)?;

        let store = EntityCache::with_capacity(
            ready.guilds.len(),
            ready.private_channels.len(),
            self.state.config().message_cache_size,
        );

        self.state.set_current_user(ready.user.into_entity());
        for guild in &ready.guilds {
            Self::add_guild(&store, guild);
        }
        for channel in &ready.private_channels {
            Self::add_dm_channel(&store, channel);
        }

        tracing::info!(
            session_id = %ready.session_id,
            guilds = ready.guilds.len(),
            dm_channels = ready.private_channels.len(),
            "Session ready"
        );

        self.state.set_session_id(ready.session_id);
        self.state.swap_store(Arc::new(store));

        self.emit(ClientEvent::Ready);
        self.state.resolve_connect(Ok(()));
        Ok(())
    }

    pub(super) fn handle_user_update(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: UserPayload = Self::decode(data)?;

        let is_current = self
            .state
            .current_user()
            .is_some_and(|u| u.id == payload.id);
        if !is_current {
            tracing::debug!(user_id = %payload.id, "USER_UPDATE for a different user");
            return Ok(());
        }

        let before = self.snapshot(self.state.current_user());
        let Some(after) = self.state.update_current_user(|u| {
            u.set_username(payload.username.clone());
            u.set_discriminator(payload.discriminator.clone());
        }) else {
            return Ok(());
        };

        self.emit(ClientEvent::CurrentUserUpdated { before, after });
        Ok(())
    }

    /// Insert a guild payload with its embedded channels and members
    pub(super) fn add_guild(store: &EntityCache, payload: &GuildPayload) {
        let guild = payload.entity();
        let guild_id = guild.id;
        let available = !guild.unavailable;
        store.insert_guild(guild);

        // Unavailable guilds arrive as a stub; their contents come later
        // with the GUILD_CREATE that marks them available
        if available {
            for channel in &payload.channels {
                store.add_guild_channel(Channel::new_text(
                    channel.id,
                    channel.guild_id.unwrap_or(guild_id),
                    channel.name.clone(),
                ));
            }
        }
        for member in &payload.members {
            store.add_member(guild_id, member.user.clone().into_entity());
        }
    }

    /// Insert a DM channel payload, caching its recipient
    pub(super) fn add_dm_channel(store: &EntityCache, payload: &ChannelPayload) {
        let Some(recipient) = payload.recipient.clone() else {
            tracing::warn!(channel_id = %payload.id, "DM channel payload without a recipient");
            return;
        };
        let channel = Channel::new_dm(payload.id, recipient.id);
        store.add_dm_channel(channel, recipient.into_entity());
    }
}
