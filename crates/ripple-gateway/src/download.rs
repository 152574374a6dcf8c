//! Guild member downloads
//!
//! Coordinates Request Members sends with per-guild completion signals. The
//! dispatch path resolves a signal once a guild's member chunks have filled
//! the advertised count; waiters with no matching guild are unblocked by
//! `reset` at teardown.

use dashmap::DashMap;
use futures::future::join_all;
use ripple_core::{Guild, Snowflake};
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::GatewayError;
use crate::transport::GatewayTransport;

/// Guilds requested per Request Members send
pub const DOWNLOAD_BATCH_SIZE: usize = 50;

/// Tracks in-flight member downloads
pub struct MemberDownloader {
    transport: Arc<dyn GatewayTransport>,
    pending: DashMap<Snowflake, watch::Sender<bool>>,
}

impl MemberDownloader {
    pub(crate) fn new(transport: Arc<dyn GatewayTransport>) -> Self {
        Self {
            transport,
            pending: DashMap::new(),
        }
    }

    /// Download members for every given guild that is still missing some,
    /// returning once all of them are complete.
    ///
    /// Guilds already holding their full member list are skipped; when
    /// nothing is missing no request is sent at all.
    pub async fn download(&self, guilds: &[Guild]) -> Result<(), GatewayError> {
        let needing: Vec<Snowflake> = guilds
            .iter()
            .filter(|g| !g.has_all_members())
            .map(|g| g.id)
            .collect();

        if needing.is_empty() {
            return Ok(());
        }

        // Single-guild fast path: no batching machinery
        if needing.len() == 1 {
            let mut rx = self.arm(needing[0]);
            self.transport.send_request_members(&needing).await?;
            Self::wait(&mut rx).await;
            self.pending.remove(&needing[0]);
            return Ok(());
        }

        tracing::debug!(guilds = needing.len(), "Downloading members in batches");
        for batch in needing.chunks(DOWNLOAD_BATCH_SIZE) {
            let receivers: Vec<_> = batch.iter().map(|id| self.arm(*id)).collect();
            self.transport.send_request_members(batch).await?;
            join_all(receivers.into_iter().map(|mut rx| async move {
                Self::wait(&mut rx).await;
            }))
            .await;
            for id in batch {
                self.pending.remove(id);
            }
        }

        Ok(())
    }

    /// Mark a guild's download as complete, waking any waiter
    pub(crate) fn complete(&self, guild_id: Snowflake) {
        if let Some(signal) = self.pending.get(&guild_id) {
            let _ = signal.send(true);
        }
    }

    /// Drop all pending signals, unblocking every waiter
    pub(crate) fn reset(&self) {
        self.pending.clear();
    }

    /// Get the completion signal for a guild, creating it if absent.
    /// The signal is armed before the request goes out so a chunk that
    /// arrives first still resolves it.
    fn arm(&self, guild_id: Snowflake) -> watch::Receiver<bool> {
        self.pending
            .entry(guild_id)
            .or_insert_with(|| watch::channel(false).0)
            .subscribe()
    }

    async fn wait(rx: &mut watch::Receiver<bool>) {
        // Err means the sender was dropped by reset(); treat as done
        let _ = rx.wait_for(|done| *done).await;
    }
}

impl std::fmt::Debug for MemberDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberDownloader")
            .field("pending", &self.pending.len())
            .finish()
    }
}
