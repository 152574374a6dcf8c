//! Message and typing handlers

use chrono::Utc;
use serde_json::Value;

use ripple_core::{ClientEvent, Message};

use crate::error::DispatchError;
use crate::events::payloads::{MessagePayload, TypingStartPayload};

use super::Dispatcher;

impl Dispatcher {
    pub(super) fn handle_message_create(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: MessagePayload = Self::decode(data)?;
        let store = self.state.store();

        if store.channel(payload.channel_id).is_none() {
            tracing::warn!(channel_id = %payload.channel_id, "MESSAGE_CREATE referenced an unknown channel");
            return Ok(());
        }
        let Some(author) = payload.author.as_ref() else {
            tracing::warn!(message_id = %payload.id, "MESSAGE_CREATE without an author");
            return Ok(());
        };
        if store.user(author.id).is_none() {
            tracing::warn!(user_id = %author.id, "MESSAGE_CREATE referenced an unknown user");
            return Ok(());
        }

        let message = Message::new(
            payload.id,
            payload.channel_id,
            author.id,
            payload.content.clone().unwrap_or_default(),
            payload.timestamp.unwrap_or_else(Utc::now),
        );
        store.add_message(message.clone());

        self.emit(ClientEvent::MessageReceived(message));
        Ok(())
    }

    pub(super) fn handle_message_update(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: MessagePayload = Self::decode(data)?;
        let store = self.state.store();

        if store.channel(payload.channel_id).is_none() {
            tracing::warn!(channel_id = %payload.channel_id, "MESSAGE_UPDATE referenced an unknown channel");
            return Ok(());
        }
        if store.message(payload.channel_id, payload.id).is_none() {
            // Routine for messages that aged out of the bounded buffer
            tracing::debug!(message_id = %payload.id, "MESSAGE_UPDATE for an uncached message");
            return Ok(());
        }

        let before = self.snapshot(store.message(payload.channel_id, payload.id));
        let Some(after) = store.update_message(payload.channel_id, payload.id, |m| {
            if let Some(content) = payload.content.clone() {
                m.set_content(content, payload.edited_timestamp);
            } else if payload.edited_timestamp.is_some() {
                m.edited_timestamp = payload.edited_timestamp;
            }
        }) else {
            return Ok(());
        };

        self.emit(ClientEvent::MessageUpdated { before, after });
        Ok(())
    }

    pub(super) fn handle_message_delete(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: MessagePayload = Self::decode(data)?;
        let store = self.state.store();

        if store.channel(payload.channel_id).is_none() {
            tracing::warn!(channel_id = %payload.channel_id, "MESSAGE_DELETE referenced an unknown channel");
            return Ok(());
        }
        let Some(message) = store.remove_message(payload.channel_id, payload.id) else {
            tracing::debug!(message_id = %payload.id, "MESSAGE_DELETE for an uncached message");
            return Ok(());
        };

        self.emit(ClientEvent::MessageDeleted(message));
        Ok(())
    }

    pub(super) fn handle_typing_start(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let payload: TypingStartPayload = Self::decode(data)?;
        let store = self.state.store();

        if store.channel(payload.channel_id).is_none() {
            tracing::warn!(channel_id = %payload.channel_id, "TYPING_START referenced an unknown channel");
            return Ok(());
        }
        // Typing from users outside the cache carries no useful identity
        if store.user(payload.user_id).is_none() {
            return Ok(());
        }

        self.emit(ClientEvent::UserTyping {
            channel_id: payload.channel_id,
            user_id: payload.user_id,
        });
        Ok(())
    }
}
