//! Inbound frame dispatch
//!
//! Single ordered entry point for everything the transport receives. Each
//! frame is handled in isolation: a decode failure or handler error is
//! logged and the next frame proceeds normally. Cache updates always happen
//! before the corresponding notification is emitted.

mod channels;
mod guilds;
mod members;
mod messages;
mod session;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use ripple_core::ClientEvent;

use crate::connection::state::ClientState;
use crate::download::MemberDownloader;
use crate::error::DispatchError;
use crate::events::GatewayEventType;
use crate::heartbeat;
use crate::protocol::{GatewayFrame, HelloPayload, OpCode};
use crate::transport::GatewayTransport;

/// Routes inbound frames to their handlers
pub(crate) struct Dispatcher {
    state: Arc<ClientState>,
    transport: Arc<dyn GatewayTransport>,
    downloader: Arc<MemberDownloader>,
    events: broadcast::Sender<ClientEvent>,
}

impl Dispatcher {
    pub(crate) fn new(
        state: Arc<ClientState>,
        transport: Arc<dyn GatewayTransport>,
        downloader: Arc<MemberDownloader>,
        events: broadcast::Sender<ClientEvent>,
    ) -> Self {
        Self {
            state,
            transport,
            downloader,
            events,
        }
    }

    /// Process one inbound frame
    ///
    /// The sequence number is recorded before any handling so that even a
    /// frame that fails to decode advances the tracked sequence.
    pub(crate) async fn process(&self, frame: GatewayFrame) {
        if let Some(seq) = frame.s {
            self.state.observe_sequence(seq);
        }

        let op = frame.op;
        let event_type = frame.t.clone();
        if let Err(error) = self.handle(frame).await {
            tracing::error!(
                op = %op,
                event = event_type.as_deref().unwrap_or("-"),
                error = %error,
                "Error handling gateway frame"
            );
        }
    }

    async fn handle(&self, frame: GatewayFrame) -> Result<(), DispatchError> {
        match frame.op {
            OpCode::Hello => self.handle_hello(frame.d).await,
            OpCode::HeartbeatAck => {
                self.handle_heartbeat_ack();
                Ok(())
            }
            OpCode::Dispatch => self.handle_dispatch(frame.t.as_deref(), frame.d),
            other => {
                tracing::warn!(op = %other, "Unexpected op code received");
                Ok(())
            }
        }
    }

    fn handle_dispatch(
        &self,
        event_type: Option<&str>,
        data: Option<Value>,
    ) -> Result<(), DispatchError> {
        let Some(name) = event_type else {
            tracing::warn!("Dispatch frame without an event type");
            return Ok(());
        };
        let Some(event) = GatewayEventType::parse(name) else {
            tracing::warn!(event = name, "Unknown dispatch event");
            return Ok(());
        };
        if event.is_ignored() {
            tracing::debug!(event = %event, "Ignored dispatch event");
            return Ok(());
        }

        tracing::debug!(event = %event, "Received dispatch event");
        match event {
            GatewayEventType::Ready => self.handle_ready(data),
            GatewayEventType::GuildCreate => self.handle_guild_create(data),
            GatewayEventType::GuildUpdate => self.handle_guild_update(data),
            GatewayEventType::GuildDelete => self.handle_guild_delete(data),
            GatewayEventType::ChannelCreate => self.handle_channel_create(data),
            GatewayEventType::ChannelUpdate => self.handle_channel_update(data),
            GatewayEventType::ChannelDelete => self.handle_channel_delete(data),
            GatewayEventType::MessageCreate => self.handle_message_create(data),
            GatewayEventType::MessageUpdate => self.handle_message_update(data),
            GatewayEventType::MessageDelete => self.handle_message_delete(data),
            GatewayEventType::GuildMemberAdd => self.handle_member_add(data),
            GatewayEventType::GuildMemberUpdate => self.handle_member_update(data),
            GatewayEventType::GuildMemberRemove => self.handle_member_remove(data),
            GatewayEventType::GuildMembersChunk => self.handle_members_chunk(data),
            GatewayEventType::GuildRoleCreate => self.handle_role_create(data),
            GatewayEventType::GuildRoleUpdate => self.handle_role_update(data),
            GatewayEventType::GuildRoleDelete => self.handle_role_delete(data),
            GatewayEventType::GuildBanAdd => self.handle_ban_add(data),
            GatewayEventType::GuildBanRemove => self.handle_ban_remove(data),
            GatewayEventType::PresenceUpdate => self.handle_presence_update(data),
            GatewayEventType::TypingStart => self.handle_typing_start(data),
            GatewayEventType::VoiceStateUpdate => self.handle_voice_state_update(data),
            GatewayEventType::UserUpdate => self.handle_user_update(data),
            // Covered by the ignore check above
            GatewayEventType::Resumed
            | GatewayEventType::MessageAck
            | GatewayEventType::GuildEmojisUpdate
            | GatewayEventType::GuildIntegrationsUpdate
            | GatewayEventType::VoiceServerUpdate
            | GatewayEventType::UserSettingsUpdate => Ok(()),
        }
    }

    // === Connection-level ops ===

    async fn handle_hello(&self, data: Option<Value>) -> Result<(), DispatchError> {
        let hello: HelloPayload = Self::decode(data)?;
        let Some(token) = self.state.token() else {
            tracing::warn!("Hello received while not logged in");
            return Ok(());
        };

        self.transport.send_identify(&token).await?;

        if let Some(shutdown) = self.state.heartbeat_shutdown_rx() {
            let handle = heartbeat::spawn(
                Arc::clone(&self.state),
                Arc::clone(&self.transport),
                Duration::from_millis(hello.heartbeat_interval),
                shutdown,
            );
            self.state.set_heartbeat_task(handle);
        }

        Ok(())
    }

    fn handle_heartbeat_ack(&self) {
        let Some(elapsed) = self.state.take_heartbeat_elapsed() else {
            tracing::debug!("Heartbeat ACK without an outstanding heartbeat");
            return;
        };

        let latency = elapsed.as_millis() as u64;
        self.state.set_latency_ms(latency);
        tracing::debug!(latency_ms = latency, "Heartbeat acknowledged");
        self.emit(ClientEvent::LatencyUpdated(latency));
    }

    // === Shared helpers ===

    fn emit(&self, event: ClientEvent) {
        tracing::trace!(event = event.kind(), "Emitting client event");
        // Fire and forget; nobody listening is fine
        let _ = self.events.send(event);
    }

    fn decode<T: DeserializeOwned>(data: Option<Value>) -> Result<T, DispatchError> {
        Ok(serde_json::from_value(data.unwrap_or(Value::Null))?)
    }

    /// Pre-mutation snapshot for update notifications, gated by config
    fn snapshot<T>(&self, value: Option<T>) -> Option<T> {
        if self.state.config().enable_pre_update_events {
            value
        } else {
            None
        }
    }
}
