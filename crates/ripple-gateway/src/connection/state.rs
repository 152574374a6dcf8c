//! Shared session state
//!
//! One `ClientState` lives behind an `Arc` and is touched from the caller's
//! task, the dispatch path, and the heartbeat loop. Locks here are held only
//! for field access, never across an await point.

use parking_lot::{Mutex, RwLock};
use ripple_cache::EntityCache;
use ripple_core::{User, VoiceRegion};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::error::GatewayError;

/// Connection lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection attempt in progress
    Disconnected,
    /// Socket opened, waiting for the session-ready snapshot
    Connecting,
    /// Session established
    Connected,
    /// Teardown in progress
    Disconnecting,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnecting => "disconnecting",
        };
        write!(f, "{s}")
    }
}

/// State shared between the client, the dispatch path, and background tasks
pub(crate) struct ClientState {
    config: ClientConfig,
    connection: RwLock<ConnectionState>,
    /// Swapped wholesale when a session-ready snapshot is applied
    store: RwLock<Arc<EntityCache>>,
    credentials: RwLock<Option<String>>,
    session_id: RwLock<Option<String>>,
    current_user: RwLock<Option<User>>,
    voice_regions: RwLock<HashMap<String, VoiceRegion>>,
    last_seq: AtomicU64,
    seq_seen: AtomicBool,
    latency_ms: AtomicU64,
    heartbeat_sent_at: Mutex<Option<Instant>>,
    connect_tx: Mutex<Option<oneshot::Sender<Result<(), GatewayError>>>>,
    heartbeat_shutdown: Mutex<Option<watch::Sender<bool>>>,
    heartbeat_task: Mutex<Option<JoinHandle<()>>>,
}

impl ClientState {
    pub(crate) fn new(config: ClientConfig) -> Self {
        let store = Arc::new(EntityCache::new(config.message_cache_size));
        Self {
            config,
            connection: RwLock::new(ConnectionState::Disconnected),
            store: RwLock::new(store),
            credentials: RwLock::new(None),
            session_id: RwLock::new(None),
            current_user: RwLock::new(None),
            voice_regions: RwLock::new(HashMap::new()),
            last_seq: AtomicU64::new(0),
            seq_seen: AtomicBool::new(false),
            latency_ms: AtomicU64::new(0),
            heartbeat_sent_at: Mutex::new(None),
            connect_tx: Mutex::new(None),
            heartbeat_shutdown: Mutex::new(None),
            heartbeat_task: Mutex::new(None),
        }
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.config
    }

    // === Connection state machine ===

    pub(crate) fn connection_state(&self) -> ConnectionState {
        *self.connection.read()
    }

    pub(crate) fn set_connection_state(&self, next: ConnectionState) {
        let mut current = self.connection.write();
        tracing::debug!(from = %*current, to = %next, "Connection state changed");
        *current = next;
    }

    // === Credentials and login-scoped data ===

    pub(crate) fn set_credentials(&self, token: String) {
        *self.credentials.write() = Some(token);
    }

    pub(crate) fn clear_credentials(&self) {
        *self.credentials.write() = None;
        self.voice_regions.write().clear();
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.credentials.read().clone()
    }

    pub(crate) fn is_logged_in(&self) -> bool {
        self.credentials.read().is_some()
    }

    pub(crate) fn set_voice_regions(&self, regions: Vec<VoiceRegion>) {
        let mut map = self.voice_regions.write();
        map.clear();
        for region in regions {
            map.insert(region.id.clone(), region);
        }
    }

    pub(crate) fn voice_region(&self, id: &str) -> Option<VoiceRegion> {
        self.voice_regions.read().get(id).cloned()
    }

    pub(crate) fn voice_regions(&self) -> Vec<VoiceRegion> {
        self.voice_regions.read().values().cloned().collect()
    }

    // === Session data ===

    pub(crate) fn store(&self) -> Arc<EntityCache> {
        Arc::clone(&self.store.read())
    }

    pub(crate) fn swap_store(&self, store: Arc<EntityCache>) {
        *self.store.write() = store;
    }

    pub(crate) fn set_session_id(&self, session_id: String) {
        *self.session_id.write() = Some(session_id);
    }

    pub(crate) fn session_id(&self) -> Option<String> {
        self.session_id.read().clone()
    }

    pub(crate) fn set_current_user(&self, user: User) {
        *self.current_user.write() = Some(user);
    }

    pub(crate) fn current_user(&self) -> Option<User> {
        self.current_user.read().clone()
    }

    pub(crate) fn update_current_user<F>(&self, f: F) -> Option<User>
    where
        F: FnOnce(&mut User),
    {
        let mut guard = self.current_user.write();
        let user = guard.as_mut()?;
        f(user);
        Some(user.clone())
    }

    // === Sequence tracking ===

    /// Record a sequence number; the tracked value never decreases even when
    /// frames are observed out of order.
    pub(crate) fn observe_sequence(&self, seq: u64) {
        self.last_seq.fetch_max(seq, Ordering::AcqRel);
        self.seq_seen.store(true, Ordering::Release);
    }

    pub(crate) fn last_sequence(&self) -> Option<u64> {
        if self.seq_seen.load(Ordering::Acquire) {
            Some(self.last_seq.load(Ordering::Acquire))
        } else {
            None
        }
    }

    // === Latency ===

    pub(crate) fn latency_ms(&self) -> u64 {
        self.latency_ms.load(Ordering::Acquire)
    }

    pub(crate) fn set_latency_ms(&self, latency: u64) {
        self.latency_ms.store(latency, Ordering::Release);
    }

    pub(crate) fn record_heartbeat_sent(&self) {
        *self.heartbeat_sent_at.lock() = Some(Instant::now());
    }

    /// Time since the last unacknowledged heartbeat, consuming the mark
    pub(crate) fn take_heartbeat_elapsed(&self) -> Option<Duration> {
        self.heartbeat_sent_at.lock().take().map(|at| at.elapsed())
    }

    // === Connect signal ===

    /// Arm the signals for a new connection attempt, returning the receiver
    /// that resolves when the session-ready snapshot lands.
    pub(crate) fn arm_connect_signal(&self) -> oneshot::Receiver<Result<(), GatewayError>> {
        let (tx, rx) = oneshot::channel();
        *self.connect_tx.lock() = Some(tx);

        let (shutdown_tx, _) = watch::channel(false);
        *self.heartbeat_shutdown.lock() = Some(shutdown_tx);

        rx
    }

    /// Resolve the pending connection attempt, if any
    pub(crate) fn resolve_connect(&self, result: Result<(), GatewayError>) {
        if let Some(tx) = self.connect_tx.lock().take() {
            let _ = tx.send(result);
        }
    }

    pub(crate) fn take_connect_signal(&self) -> Option<oneshot::Sender<Result<(), GatewayError>>> {
        self.connect_tx.lock().take()
    }

    // === Heartbeat task handles ===

    pub(crate) fn heartbeat_shutdown_rx(&self) -> Option<watch::Receiver<bool>> {
        self.heartbeat_shutdown.lock().as_ref().map(watch::Sender::subscribe)
    }

    pub(crate) fn take_heartbeat_shutdown(&self) -> Option<watch::Sender<bool>> {
        self.heartbeat_shutdown.lock().take()
    }

    pub(crate) fn set_heartbeat_task(&self, handle: JoinHandle<()>) {
        *self.heartbeat_task.lock() = Some(handle);
    }

    pub(crate) fn take_heartbeat_task(&self) -> Option<JoinHandle<()>> {
        self.heartbeat_task.lock().take()
    }
}
