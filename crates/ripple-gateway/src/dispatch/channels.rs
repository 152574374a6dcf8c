//! Channel handlers

use serde_json::Value;

use ripple_core::{Channel, ClientEvent};

use crate::error::DispatchError;
use crate::events::payloads::ChannelPayload;

use super::Dispatcher;

impl Dispatcher {
    pub(super) fn handle_channel_create(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: ChannelPayload = Self::decode(data)?;
        let store = self.state.store();

        if let Some(guild_id) = payload.guild_id {
            let channel = Channel::new_text(payload.id, guild_id, payload.name.clone());
            match store.add_guild_channel(channel) {
                Some(channel) => self.emit(ClientEvent::ChannelCreated(channel)),
                None => {
                    tracing::warn!(guild_id = %guild_id, "CHANNEL_CREATE referenced an unknown guild");
                }
            }
        } else if let Some(recipient) = payload.recipient {
            let channel = Channel::new_dm(payload.id, recipient.id);
            let channel = store.add_dm_channel(channel, recipient.into_entity());
            self.emit(ClientEvent::ChannelCreated(channel));
        } else {
            tracing::warn!(channel_id = %payload.id, "CHANNEL_CREATE without a guild or recipient");
        }
        Ok(())
    }

    pub(super) fn handle_channel_update(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: ChannelPayload = Self::decode(data)?;
        let store = self.state.store();

        if store.channel(payload.id).is_none() {
            tracing::warn!(channel_id = %payload.id, "CHANNEL_UPDATE referenced an unknown channel");
            return Ok(());
        }

        let before = self.snapshot(store.channel(payload.id));
        let Some(after) = store.update_channel(payload.id, |c| {
            if payload.name.is_some() {
                c.set_name(payload.name.clone());
            }
        }) else {
            return Ok(());
        };

        self.emit(ClientEvent::ChannelUpdated { before, after });
        Ok(())
    }

    pub(super) fn handle_channel_delete(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: ChannelPayload = Self::decode(data)?;
        let store = self.state.store();

        let Some(channel) = store.remove_channel(payload.id) else {
            tracing::warn!(channel_id = %payload.id, "CHANNEL_DELETE referenced an unknown channel");
            return Ok(());
        };

        self.emit(ClientEvent::ChannelDestroyed(channel));
        Ok(())
    }
}
