//! Test helpers for integration tests
//!
//! Provides a recording fake transport and client construction shortcuts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use ripple_core::{Snowflake, VoiceRegion};
use ripple_gateway::{ClientConfig, GatewayClient, GatewayTransport, TransportError};

/// One outbound call recorded by [`FakeTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentCommand {
    Connect,
    Disconnect,
    Identify(String),
    Heartbeat(Option<u64>),
    RequestMembers(Vec<Snowflake>),
}

/// A transport that records every outbound call instead of hitting a wire
#[derive(Default)]
pub struct FakeTransport {
    sent: Mutex<Vec<SentCommand>>,
    fail_connect: AtomicBool,
}

impl FakeTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order
    pub fn sent(&self) -> Vec<SentCommand> {
        self.sent.lock().clone()
    }

    /// Number of outbound calls so far
    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Guild id batches carried by Request Members sends, in order
    pub fn request_members_sends(&self) -> Vec<Vec<Snowflake>> {
        self.sent
            .lock()
            .iter()
            .filter_map(|cmd| match cmd {
                SentCommand::RequestMembers(ids) => Some(ids.clone()),
                _ => None,
            })
            .collect()
    }

    /// Make subsequent connect calls fail
    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    fn record(&self, command: SentCommand) {
        self.sent.lock().push(command);
    }
}

#[async_trait]
impl GatewayTransport for FakeTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(TransportError::new("connect refused"));
        }
        self.record(SentCommand::Connect);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        self.record(SentCommand::Disconnect);
        Ok(())
    }

    async fn send_identify(&self, token: &str) -> Result<(), TransportError> {
        self.record(SentCommand::Identify(token.to_string()));
        Ok(())
    }

    async fn send_heartbeat(&self, sequence: Option<u64>) -> Result<(), TransportError> {
        self.record(SentCommand::Heartbeat(sequence));
        Ok(())
    }

    async fn send_request_members(&self, guild_ids: &[Snowflake]) -> Result<(), TransportError> {
        self.record(SentCommand::RequestMembers(guild_ids.to_vec()));
        Ok(())
    }

    async fn voice_regions(&self) -> Result<Vec<VoiceRegion>, TransportError> {
        Ok(vec![
            VoiceRegion::new("us-east", "US East"),
            VoiceRegion::new("eu-west", "EU West"),
        ])
    }
}

/// Client configuration tuned for fast tests
#[must_use]
pub fn test_config() -> ClientConfig {
    ClientConfig {
        message_cache_size: 10,
        connection_timeout: Duration::from_millis(200),
        enable_pre_update_events: false,
    }
}

/// Build a client over a fresh fake transport, without logging in
#[must_use]
pub fn build_client(config: ClientConfig) -> (Arc<GatewayClient>, Arc<FakeTransport>) {
    let transport = Arc::new(FakeTransport::new());
    let client = Arc::new(GatewayClient::new(
        config,
        Arc::clone(&transport) as Arc<dyn GatewayTransport>,
    ));
    (client, transport)
}

/// Build a logged-in client over a fresh fake transport
pub async fn logged_in_client() -> (Arc<GatewayClient>, Arc<FakeTransport>) {
    let (client, transport) = build_client(test_config());
    client.login("test-token").await.expect("login against fake transport");
    (client, transport)
}

/// Poll a condition until it holds, for up to one second
pub async fn wait_until<F>(condition: F) -> bool
where
    F: Fn() -> bool,
{
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}
