//! Gateway client integration tests
//!
//! These tests drive the client end to end through a recording fake
//! transport: inbound frames are fed through `process` exactly as a real
//! transport would deliver them.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::sync::Arc;

use integration_tests::{
    build_client, channel_json, channel_update_frame, dm_channel_json, guild_create_frame,
    guild_delete_frame, guild_json, guild_json_with, guild_update_frame, hello_frame,
    logged_in_client, member_add_frame, member_remove_frame, members_chunk_frame,
    message_create_frame, ready_frame, test_config, user_json, wait_until, FakeTransport,
    SentCommand,
};
use ripple_core::{ClientEvent, Snowflake};
use ripple_gateway::{
    ConnectionState, GatewayClient, GatewayError, GatewayFrame, TransportError,
};
use serde_json::json;
use tokio::sync::broadcast;

fn drain(rx: &mut broadcast::Receiver<ClientEvent>) -> Vec<ClientEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn kinds(events: &[ClientEvent]) -> Vec<&'static str> {
    events.iter().map(ClientEvent::kind).collect()
}

// ============================================================================
// Sequence Tracking
// ============================================================================

#[tokio::test]
async fn test_sequence_tracks_maximum_seen() {
    let (client, _transport) = logged_in_client().await;
    assert_eq!(client.last_sequence(), None);

    client.process(ready_frame(5, vec![], vec![])).await;
    // Ignored and unknown event types still advance the sequence
    client
        .process(GatewayFrame::dispatch("RESUMED", 3, json!({})))
        .await;
    client
        .process(GatewayFrame::dispatch("SOMETHING_NEW", 9, json!({})))
        .await;
    // So does a frame whose payload fails to decode
    client
        .process(GatewayFrame::dispatch("TYPING_START", 7, json!("garbage")))
        .await;

    assert_eq!(client.last_sequence(), Some(9));
}

// ============================================================================
// Connection Lifecycle
// ============================================================================

#[tokio::test]
async fn test_connect_without_login_fails_before_transport() {
    let (client, transport) = build_client(test_config());

    let err = client.connect().await.unwrap_err();
    assert!(matches!(err, GatewayError::NotLoggedIn));
    assert_eq!(transport.sent_count(), 0);
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_connect_establishes_session() {
    let (client, transport) = logged_in_client().await;
    let mut rx = client.subscribe();

    let driver = spawn_session_driver(&client, &transport, 30);
    client.connect().await.expect("connect should succeed");
    driver.await.unwrap();

    assert_eq!(client.connection_state(), ConnectionState::Connected);
    assert_eq!(client.session_id().as_deref(), Some("session-1"));
    assert_eq!(client.current_user().unwrap().username, "me");
    assert!(client.guild(Snowflake::new(10)).is_some());
    assert!(transport
        .sent()
        .contains(&SentCommand::Identify("test-token".to_string())));

    let events = drain(&mut rx);
    assert_eq!(kinds(&events), vec!["ready", "connected"]);

    // Disconnect stops the heartbeat loop before declaring teardown done
    client.disconnect().await.unwrap();
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    assert!(transport.sent().contains(&SentCommand::Disconnect));

    let heartbeats_after_teardown = heartbeat_count(&transport);
    tokio::time::sleep(std::time::Duration::from_millis(120)).await;
    assert_eq!(heartbeat_count(&transport), heartbeats_after_teardown);

    assert_eq!(kinds(&drain(&mut rx)), vec!["disconnected"]);
}

#[tokio::test]
async fn test_connect_timeout_runs_full_teardown() {
    let (client, transport) = logged_in_client().await;

    // Nobody feeds a READY, so the attempt times out
    let err = client.connect().await.unwrap_err();
    assert!(matches!(err, GatewayError::ConnectTimeout));
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    assert_eq!(
        transport.sent(),
        vec![SentCommand::Connect, SentCommand::Disconnect]
    );
}

#[tokio::test]
async fn test_concurrent_connects_are_serialized() {
    let (client, transport) = logged_in_client().await;

    let (first, second) = tokio::join!(client.connect(), client.connect());
    assert!(first.is_err());
    assert!(second.is_err());

    // Each attempt fully resolves, teardown included, before the next begins
    assert_eq!(
        transport.sent(),
        vec![
            SentCommand::Connect,
            SentCommand::Disconnect,
            SentCommand::Connect,
            SentCommand::Disconnect,
        ]
    );
}

#[tokio::test]
async fn test_refused_transport_connect_surfaces_error() {
    let (client, transport) = logged_in_client().await;
    transport.set_fail_connect(true);

    let err = client.connect().await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    // The refused open never records a Connect, only the teardown close
    assert_eq!(transport.sent(), vec![SentCommand::Disconnect]);
}

#[tokio::test]
async fn test_transport_failure_aborts_connect() {
    let (client, transport) = logged_in_client().await;

    let driver = {
        let client = Arc::clone(&client);
        let transport = Arc::clone(&transport);
        tokio::spawn(async move {
            assert!(wait_until(|| transport.sent().contains(&SentCommand::Connect)).await);
            client.transport_failed(TransportError::new("socket reset"));
        })
    };

    let err = client.connect().await.unwrap_err();
    driver.await.unwrap();

    assert!(matches!(err, GatewayError::Transport(_)));
    assert_eq!(client.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_logout_discards_credentials() {
    let (client, _transport) = logged_in_client().await;
    assert!(client.voice_region("us-east").is_some());
    assert_eq!(client.voice_regions().len(), 2);

    client.logout().await.unwrap();
    assert!(client.voice_region("us-east").is_none());

    let err = client.connect().await.unwrap_err();
    assert!(matches!(err, GatewayError::NotLoggedIn));
}

// ============================================================================
// Heartbeat and Latency
// ============================================================================

#[tokio::test]
async fn test_heartbeat_carries_sequence_and_ack_updates_latency() {
    let (client, transport) = logged_in_client().await;

    let driver = spawn_session_driver(&client, &transport, 20);
    client.connect().await.expect("connect should succeed");
    driver.await.unwrap();

    // The loop keeps ticking and picks up the latest observed sequence
    client
        .process(GatewayFrame::dispatch("SOMETHING_NEW", 42, json!({})))
        .await;
    assert!(
        wait_until(|| transport
            .sent()
            .contains(&SentCommand::Heartbeat(Some(42))))
        .await
    );

    let mut rx = client.subscribe();
    client.process(GatewayFrame::heartbeat_ack()).await;
    assert_eq!(kinds(&drain(&mut rx)), vec!["latency_updated"]);

    client.disconnect().await.unwrap();
}

// ============================================================================
// Member Downloads
// ============================================================================

#[tokio::test]
async fn test_download_members_noop_when_nothing_missing() {
    let (client, transport) = logged_in_client().await;
    client
        .process(ready_frame(
            1,
            vec![guild_json_with(
                10,
                "complete",
                1,
                vec![],
                vec![user_json(100, "alice")],
            )],
            vec![],
        ))
        .await;

    let before = transport.sent_count();
    client.download_all_members().await.unwrap();
    client.download_members(&[]).await.unwrap();
    assert_eq!(transport.sent_count(), before);
}

#[tokio::test]
async fn test_download_members_batches_of_fifty() {
    let (client, transport) = logged_in_client().await;
    let guilds = (1u64..=51)
        .map(|id| guild_json(id, &format!("guild-{id}"), 1))
        .collect();
    client.process(ready_frame(1, guilds, vec![])).await;

    let download = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.download_all_members().await })
    };

    assert!(wait_until(|| transport.request_members_sends().len() == 1).await);
    let first_batch = transport.request_members_sends()[0].clone();
    assert_eq!(first_batch.len(), 50);

    let mut seq = 2;
    for guild_id in &first_batch {
        client
            .process(members_chunk_frame(
                seq,
                guild_id.into_inner(),
                vec![user_json(10_000 + seq, "member")],
            ))
            .await;
        seq += 1;
    }

    // The second, partial batch goes out only after the first resolves
    assert!(wait_until(|| transport.request_members_sends().len() == 2).await);
    let second_batch = transport.request_members_sends()[1].clone();
    assert_eq!(second_batch.len(), 1);

    client
        .process(members_chunk_frame(
            seq,
            second_batch[0].into_inner(),
            vec![user_json(20_000, "member")],
        ))
        .await;

    download.await.unwrap().unwrap();
    assert_eq!(transport.request_members_sends().len(), 2);
}

// ============================================================================
// Guild Events
// ============================================================================

#[tokio::test]
async fn test_guild_create_first_join_vs_reconnect() {
    let (client, _transport) = logged_in_client().await;
    let mut rx = client.subscribe();
    client.process(ready_frame(1, vec![], vec![])).await;
    drain(&mut rx);

    client
        .process(guild_create_frame(2, guild_json(10, "new", 0), None))
        .await;
    assert_eq!(kinds(&drain(&mut rx)), vec!["guild_joined", "guild_available"]);

    // Explicit `unavailable: false` is a known guild coming back
    client
        .process(guild_create_frame(3, guild_json(11, "back", 0), Some(false)))
        .await;
    assert_eq!(kinds(&drain(&mut rx)), vec!["guild_available"]);
}

#[tokio::test]
async fn test_guild_delete_unavailable_vs_left() {
    let (client, _transport) = logged_in_client().await;
    let mut rx = client.subscribe();

    let guild_one = guild_json_with(
        10,
        "one",
        1,
        vec![channel_json(20, 10, "general")],
        vec![user_json(100, "alice")],
    );
    let guild_two = guild_json_with(11, "two", 1, vec![], vec![user_json(100, "alice")]);
    client.process(ready_frame(1, vec![guild_one, guild_two], vec![])).await;
    drain(&mut rx);

    // Outage marking: no leave notification, but the cascade still runs
    client.process(guild_delete_frame(2, 10, Some(true))).await;
    assert_eq!(kinds(&drain(&mut rx)), vec!["guild_unavailable"]);
    assert!(client.guild(Snowflake::new(10)).is_none());
    assert!(client.channel(Snowflake::new(20)).is_none());
    // Alice is still a member of the second guild
    assert!(client.user(Snowflake::new(100)).is_some());

    // A real leave releases the last owning reference
    client.process(guild_delete_frame(3, 11, None)).await;
    assert_eq!(
        kinds(&drain(&mut rx)),
        vec!["guild_unavailable", "guild_left"]
    );
    assert!(client.user(Snowflake::new(100)).is_none());
}

#[tokio::test]
async fn test_member_add_and_remove() {
    let (client, _transport) = logged_in_client().await;
    let mut rx = client.subscribe();
    client.process(ready_frame(1, vec![guild_json(10, "g", 0)], vec![])).await;
    drain(&mut rx);

    client
        .process(member_add_frame(2, 10, user_json(100, "alice")))
        .await;
    assert_eq!(kinds(&drain(&mut rx)), vec!["user_joined"]);
    assert!(client.user(Snowflake::new(100)).is_some());
    assert_eq!(client.guild(Snowflake::new(10)).unwrap().member_count, 1);

    client
        .process(member_remove_frame(3, 10, user_json(100, "alice")))
        .await;
    assert_eq!(kinds(&drain(&mut rx)), vec!["user_left"]);
    assert!(client.user(Snowflake::new(100)).is_none());
    assert_eq!(client.guild(Snowflake::new(10)).unwrap().member_count, 0);
}

#[tokio::test]
async fn test_redelivered_member_add_is_silent() {
    let (client, _transport) = logged_in_client().await;
    let mut rx = client.subscribe();
    client.process(ready_frame(1, vec![guild_json(10, "g", 0)], vec![])).await;
    drain(&mut rx);

    client
        .process(member_add_frame(2, 10, user_json(100, "alice")))
        .await;
    assert_eq!(kinds(&drain(&mut rx)), vec!["user_joined"]);

    // Same member again: record refreshed, no event, count unchanged
    client
        .process(member_add_frame(3, 10, user_json(100, "alicia")))
        .await;
    assert!(drain(&mut rx).is_empty());
    assert_eq!(client.guild(Snowflake::new(10)).unwrap().member_count, 1);
    assert_eq!(client.user(Snowflake::new(100)).unwrap().username, "alicia");
}

#[tokio::test]
async fn test_update_events_omit_before_image_by_default() {
    let (client, _transport) = logged_in_client().await;
    let mut rx = client.subscribe();
    client
        .process(ready_frame(
            1,
            vec![guild_json_with(10, "old", 0, vec![channel_json(20, 10, "general")], vec![])],
            vec![],
        ))
        .await;
    drain(&mut rx);

    client.process(guild_update_frame(2, 10, "new")).await;
    assert!(matches!(
        drain(&mut rx).as_slice(),
        [ClientEvent::GuildUpdated { before: None, .. }]
    ));

    client.process(channel_update_frame(3, 20, "renamed")).await;
    assert!(matches!(
        drain(&mut rx).as_slice(),
        [ClientEvent::ChannelUpdated { before: None, .. }]
    ));
}

#[tokio::test]
async fn test_update_events_carry_before_image_when_opted_in() {
    let mut config = test_config();
    config.enable_pre_update_events = true;
    let (client, _transport) = build_client(config);
    client.login("test-token").await.unwrap();
    let mut rx = client.subscribe();
    client
        .process(ready_frame(
            1,
            vec![guild_json_with(10, "old", 0, vec![channel_json(20, 10, "general")], vec![])],
            vec![],
        ))
        .await;
    drain(&mut rx);

    client.process(guild_update_frame(2, 10, "new")).await;
    match drain(&mut rx).as_slice() {
        [ClientEvent::GuildUpdated { before: Some(before), after }] => {
            assert_eq!(before.name, "old");
            assert_eq!(after.name, "new");
        }
        other => panic!("unexpected events: {other:?}"),
    }

    client.process(channel_update_frame(3, 20, "renamed")).await;
    match drain(&mut rx).as_slice() {
        [ClientEvent::ChannelUpdated { before: Some(before), after }] => {
            assert_eq!(before.name.as_deref(), Some("general"));
            assert_eq!(after.name.as_deref(), Some("renamed"));
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

// ============================================================================
// Channel and Message Events
// ============================================================================

#[tokio::test]
async fn test_unknown_channel_update_is_dropped() {
    let (client, _transport) = logged_in_client().await;
    let mut rx = client.subscribe();
    client
        .process(ready_frame(
            1,
            vec![guild_json_with(10, "g", 0, vec![channel_json(20, 10, "general")], vec![])],
            vec![],
        ))
        .await;
    drain(&mut rx);

    // Unknown channel: warn-and-drop, no event, cache untouched
    client.process(channel_update_frame(2, 999, "renamed")).await;
    assert!(drain(&mut rx).is_empty());
    assert_eq!(
        client.channel(Snowflake::new(20)).unwrap().name.as_deref(),
        Some("general")
    );

    // Known channel: mutation plus notification
    client.process(channel_update_frame(3, 20, "renamed")).await;
    assert_eq!(kinds(&drain(&mut rx)), vec!["channel_updated"]);
    assert_eq!(
        client.channel(Snowflake::new(20)).unwrap().name.as_deref(),
        Some("renamed")
    );
}

#[tokio::test]
async fn test_dm_snapshot_and_message_flow() {
    let (client, _transport) = logged_in_client().await;
    let mut rx = client.subscribe();
    client
        .process(ready_frame(
            1,
            vec![],
            vec![dm_channel_json(20, user_json(100, "alice"))],
        ))
        .await;
    drain(&mut rx);

    assert!(client.channel(Snowflake::new(20)).unwrap().is_dm());
    assert!(client.user_by_tag("alice", "0001").is_some());

    client
        .process(message_create_frame(2, 30, 20, user_json(100, "alice"), "hi"))
        .await;
    assert_eq!(kinds(&drain(&mut rx)), vec!["message_received"]);
    assert_eq!(
        client.message(Snowflake::new(20), Snowflake::new(30)).unwrap().content,
        "hi"
    );

    // Messages from users outside the cache are dropped
    client
        .process(message_create_frame(3, 31, 20, user_json(999, "stranger"), "?"))
        .await;
    assert!(drain(&mut rx).is_empty());
    assert!(client.message(Snowflake::new(20), Snowflake::new(31)).is_none());
}

#[tokio::test]
async fn test_malformed_frame_does_not_stop_dispatch() {
    let (client, _transport) = logged_in_client().await;
    let mut rx = client.subscribe();
    client
        .process(ready_frame(
            1,
            vec![guild_json_with(
                10,
                "g",
                1,
                vec![channel_json(20, 10, "general")],
                vec![user_json(100, "alice")],
            )],
            vec![],
        ))
        .await;
    drain(&mut rx);

    // Garbage payload: contained, logged, sequence still advances
    client
        .process(GatewayFrame::dispatch("MESSAGE_CREATE", 2, json!("garbage")))
        .await;
    assert!(drain(&mut rx).is_empty());
    assert_eq!(client.last_sequence(), Some(2));

    // The next frame processes normally
    client
        .process(message_create_frame(3, 30, 20, user_json(100, "alice"), "still here"))
        .await;
    assert_eq!(kinds(&drain(&mut rx)), vec!["message_received"]);
}

// ============================================================================
// Helpers
// ============================================================================

/// Feed the hello and READY frames once the transport connect goes out
fn spawn_session_driver(
    client: &Arc<GatewayClient>,
    transport: &Arc<FakeTransport>,
    heartbeat_interval_ms: u64,
) -> tokio::task::JoinHandle<()> {
    let client = Arc::clone(client);
    let transport = Arc::clone(transport);
    tokio::spawn(async move {
        assert!(wait_until(|| transport.sent().contains(&SentCommand::Connect)).await);
        client.process(hello_frame(heartbeat_interval_ms)).await;
        client
            .process(ready_frame(1, vec![guild_json(10, "home", 0)], vec![]))
            .await;
    })
}

fn heartbeat_count(transport: &FakeTransport) -> usize {
    transport
        .sent()
        .iter()
        .filter(|cmd| matches!(cmd, SentCommand::Heartbeat(_)))
        .count()
}
