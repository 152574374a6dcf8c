//! The gateway client
//!
//! Orchestrates the connection lifecycle and exposes the consumer surface:
//! lookups against the entity cache, member downloads, and the notification
//! stream. The transport feeds inbound frames through [`GatewayClient::process`].

use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

use ripple_core::{Channel, ClientEvent, Guild, Message, Snowflake, User, VoiceRegion};

use crate::config::ClientConfig;
use crate::dispatch::Dispatcher;
use crate::download::MemberDownloader;
use crate::error::GatewayError;
use crate::protocol::GatewayFrame;
use crate::transport::{GatewayTransport, TransportError};

use super::state::ClientState;
use super::ConnectionState;

/// Buffered notifications per subscriber before lagging kicks in
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Persistent real-time gateway client
pub struct GatewayClient {
    state: Arc<ClientState>,
    transport: Arc<dyn GatewayTransport>,
    dispatcher: Dispatcher,
    downloader: Arc<MemberDownloader>,
    events: broadcast::Sender<ClientEvent>,
    /// Serializes connect and disconnect transitions
    lifecycle: Mutex<()>,
}

impl GatewayClient {
    /// Create a client over the given transport
    #[must_use]
    pub fn new(config: ClientConfig, transport: Arc<dyn GatewayTransport>) -> Self {
        let state = Arc::new(ClientState::new(config));
        let downloader = Arc::new(MemberDownloader::new(Arc::clone(&transport)));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let dispatcher = Dispatcher::new(
            Arc::clone(&state),
            Arc::clone(&transport),
            Arc::clone(&downloader),
            events.clone(),
        );

        Self {
            state,
            transport,
            dispatcher,
            downloader,
            events,
            lifecycle: Mutex::new(()),
        }
    }

    /// Subscribe to the notification stream
    ///
    /// Delivery is fire-and-forget; a subscriber that falls behind misses
    /// the oldest buffered notifications rather than stalling dispatch.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    // === Lifecycle ===

    /// Authenticate and fetch login-scoped data
    pub async fn login(&self, token: impl Into<String> + Send) -> Result<(), GatewayError> {
        let token = token.into();
        let regions = self.transport.voice_regions().await?;

        self.state.set_voice_regions(regions);
        self.state.set_credentials(token);
        tracing::info!("Logged in");
        Ok(())
    }

    /// Tear down any active connection and discard credentials
    pub async fn logout(&self) -> Result<(), GatewayError> {
        self.disconnect().await?;
        self.state.clear_credentials();
        tracing::info!("Logged out");
        Ok(())
    }

    /// Establish a gateway session
    ///
    /// Resolves once the session-ready snapshot has been applied. A failure
    /// at any stage runs the full disconnect teardown before returning, so
    /// the client is never left half-open.
    pub async fn connect(&self) -> Result<(), GatewayError> {
        let _guard = self.lifecycle.lock().await;
        self.connect_internal().await
    }

    /// Tear down the gateway session; no-op when already disconnected
    pub async fn disconnect(&self) -> Result<(), GatewayError> {
        let _guard = self.lifecycle.lock().await;
        self.disconnect_internal().await
    }

    async fn connect_internal(&self) -> Result<(), GatewayError> {
        if !self.state.is_logged_in() {
            return Err(GatewayError::NotLoggedIn);
        }
        if self.state.connection_state() == ConnectionState::Connected {
            return Ok(());
        }

        self.state.set_connection_state(ConnectionState::Connecting);
        if let Err(error) = self.establish().await {
            tracing::warn!(error = %error, "Connect failed");
            self.disconnect_internal().await?;
            return Err(error);
        }

        tracing::info!("Connected");
        self.emit(ClientEvent::Connected);
        Ok(())
    }

    async fn establish(&self) -> Result<(), GatewayError> {
        let ready = self.state.arm_connect_signal();
        self.transport.connect().await?;

        let timeout = self.state.config().connection_timeout;
        match tokio::time::timeout(timeout, ready).await {
            Err(_) => Err(GatewayError::ConnectTimeout),
            // Sender dropped without resolution means teardown won the race
            Ok(Err(_)) => Err(GatewayError::ConnectionFailed(
                "connection aborted before the session became ready".to_string(),
            )),
            Ok(Ok(result)) => {
                result?;
                self.state.set_connection_state(ConnectionState::Connected);
                Ok(())
            }
        }
    }

    async fn disconnect_internal(&self) -> Result<(), GatewayError> {
        if self.state.connection_state() == ConnectionState::Disconnected {
            return Ok(());
        }
        self.state.set_connection_state(ConnectionState::Disconnecting);

        if let Err(error) = self.transport.disconnect().await {
            tracing::warn!(error = %error, "Transport close failed during teardown");
        }

        // Cancel the heartbeat loop and wait for it to fully terminate so a
        // late heartbeat can never race the closed transport
        if let Some(shutdown) = self.state.take_heartbeat_shutdown() {
            let _ = shutdown.send(true);
        }
        if let Some(task) = self.state.take_heartbeat_task() {
            if let Err(error) = task.await {
                tracing::error!(error = %error, "Heartbeat task ended abnormally");
            }
        }

        self.downloader.reset();
        // Dropping an unresolved connect signal aborts the waiting connect
        drop(self.state.take_connect_signal());

        self.state.set_connection_state(ConnectionState::Disconnected);
        tracing::info!("Disconnected");
        self.emit(ClientEvent::Disconnected);
        Ok(())
    }

    // === Inbound path ===

    /// Feed one inbound frame from the transport
    ///
    /// Frames must be delivered in arrival order from a single task; errors
    /// while handling a frame are contained and logged.
    pub async fn process(&self, frame: GatewayFrame) {
        self.dispatcher.process(frame).await;
    }

    /// Report a connection-level transport failure
    ///
    /// A pending connect resolves with the failure; an established session
    /// is left for the consumer to tear down via [`GatewayClient::disconnect`].
    pub fn transport_failed(&self, error: TransportError) {
        tracing::warn!(error = %error, "Transport reported a failure");
        self.state
            .resolve_connect(Err(GatewayError::Transport(error)));
    }

    // === Member downloads ===

    /// Download members for every cached guild still missing some
    pub async fn download_all_members(&self) -> Result<(), GatewayError> {
        self.download_members(&self.guilds()).await
    }

    /// Download members for the given guilds, skipping complete ones
    pub async fn download_members(&self, guilds: &[Guild]) -> Result<(), GatewayError> {
        self.downloader.download(guilds).await
    }

    // === Lookups ===

    /// Current connection state
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.state.connection_state()
    }

    /// Latest heartbeat round-trip latency in milliseconds (0 before the
    /// first acknowledgment)
    #[must_use]
    pub fn latency_ms(&self) -> u64 {
        self.state.latency_ms()
    }

    /// Session id of the current session, if established
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.state.session_id()
    }

    /// Last sequence number observed on the current connection
    #[must_use]
    pub fn last_sequence(&self) -> Option<u64> {
        self.state.last_sequence()
    }

    /// The logged-in user, once a session has been established
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.current_user()
    }

    /// Look up a guild by id
    #[must_use]
    pub fn guild(&self, guild_id: Snowflake) -> Option<Guild> {
        self.state.store().guild(guild_id)
    }

    /// All cached guilds
    #[must_use]
    pub fn guilds(&self) -> Vec<Guild> {
        self.state.store().guilds()
    }

    /// Look up a channel by id
    #[must_use]
    pub fn channel(&self, channel_id: Snowflake) -> Option<Channel> {
        self.state.store().channel(channel_id)
    }

    /// Look up a user by id
    #[must_use]
    pub fn user(&self, user_id: Snowflake) -> Option<User> {
        self.state.store().user(user_id)
    }

    /// Look up a user by username and discriminator
    #[must_use]
    pub fn user_by_tag(&self, username: &str, discriminator: &str) -> Option<User> {
        self.state.store().user_by_tag(username, discriminator)
    }

    /// Look up a cached message
    #[must_use]
    pub fn message(&self, channel_id: Snowflake, message_id: Snowflake) -> Option<Message> {
        self.state.store().message(channel_id, message_id)
    }

    /// Look up a voice region by id
    #[must_use]
    pub fn voice_region(&self, id: &str) -> Option<VoiceRegion> {
        self.state.voice_region(id)
    }

    /// All voice regions fetched at login
    #[must_use]
    pub fn voice_regions(&self) -> Vec<VoiceRegion> {
        self.state.voice_regions()
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("connection", &self.state.connection_state())
            .finish()
    }
}
