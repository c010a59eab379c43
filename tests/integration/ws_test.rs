//! Integration tests for the WebSocket endpoints.

mod helpers;

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::json;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use agora_realtime::RoomId;
use axum::http::StatusCode;

use helpers::{TestApp, assert_silent, connect, next_json};

async fn handshake_status(url: String) -> StatusCode {
    match connect_async(url).await {
        Err(WsError::Http(response)) => response.status(),
        Err(e) => panic!("unexpected handshake error: {e}"),
        Ok(_) => panic!("handshake unexpectedly succeeded"),
    }
}

#[tokio::test]
async fn test_ws_upgrade_without_token_is_rejected() {
    let app = TestApp::new().await;
    let addr = app.serve().await;

    let status = handshake_status(format!("ws://{addr}/ws/notifications")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.state.realtime.connections.connection_count(), 0);
}

#[tokio::test]
async fn test_ws_upgrade_with_bad_token_is_rejected() {
    let app = TestApp::new().await;
    let addr = app.serve().await;

    let status = handshake_status(format!("ws://{addr}/ws/chat?token=not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let alice = app.store.add_user("alice");
    let expired = helpers::mint(alice.id, "alice", -60);
    let status = handshake_status(format!("ws://{addr}/ws/chat?token={expired}")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_detailed_health_counts_connections() {
    let app = TestApp::new().await;
    let addr = app.serve().await;
    let alice = app.store.add_user("alice");

    let _ws = connect(addr, "/ws/notifications", &app.token_for(&alice)).await;
    app.wait_for_connections(1).await;

    let response = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["ws_connections"], 1);
    assert_eq!(response.body["data"]["online_users"], 1);
    assert_eq!(response.body["data"]["rooms"], 1);
    assert_eq!(response.body["data"]["metrics"]["connections_total"], 1);
}

#[tokio::test]
async fn test_chat_message_reaches_recipient() {
    let app = TestApp::new().await;
    let addr = app.serve().await;
    let alice = app.store.add_user("alice");
    let bob = app.store.add_user("bob");

    let mut alice_ws = connect(addr, "/ws/chat", &app.token_for(&alice)).await;
    let mut bob_ws = connect(addr, "/ws/chat", &app.token_for(&bob)).await;
    app.wait_for_connections(2).await;

    let frame = json!({ "recipient_id": bob.id, "content": "hello bob" });
    alice_ws
        .send(Message::Text(frame.to_string().into()))
        .await
        .unwrap();

    let received = next_json(&mut bob_ws).await;
    assert_eq!(received["alert"], "alice sent you a message!");
    assert_eq!(received["message"]["content"], "hello bob");
    assert_eq!(received["message"]["sender"]["user"]["username"], "alice");
    assert_eq!(received["message"]["is_read"], false);

    assert_silent(&mut alice_ws).await;
    assert_eq!(app.store.message_count().await, 1);
    assert_eq!(app.store.notification_count(bob.id).await, 0);
}

#[tokio::test]
async fn test_invalid_chat_frames_keep_connection_open() {
    let app = TestApp::new().await;
    let addr = app.serve().await;
    let alice = app.store.add_user("alice");
    let bob = app.store.add_user("bob");

    let mut alice_ws = connect(addr, "/ws/chat", &app.token_for(&alice)).await;
    let mut bob_ws = connect(addr, "/ws/chat", &app.token_for(&bob)).await;
    app.wait_for_connections(2).await;

    for bad in [
        "not json".to_string(),
        json!({ "recipient_id": bob.id }).to_string(),
        json!({ "recipient_id": bob.id, "content": "" }).to_string(),
    ] {
        alice_ws.send(Message::Text(bad.into())).await.unwrap();
    }
    let good = json!({ "recipient_id": bob.id, "content": "still here" });
    alice_ws
        .send(Message::Text(good.to_string().into()))
        .await
        .unwrap();

    let received = next_json(&mut bob_ws).await;
    assert_eq!(received["message"]["content"], "still here");
    assert_eq!(app.store.message_count().await, 1);
    assert_eq!(app.state.realtime.metrics.snapshot().inbound_rejected, 3);
    assert_eq!(app.state.realtime.connections.connection_count(), 2);
}

#[tokio::test]
async fn test_notification_socket_does_not_receive_chat() {
    let app = TestApp::new().await;
    let addr = app.serve().await;
    let alice = app.store.add_user("alice");
    let bob = app.store.add_user("bob");

    let mut alice_ws = connect(addr, "/ws/chat", &app.token_for(&alice)).await;
    let mut bob_notifications = connect(addr, "/ws/notifications", &app.token_for(&bob)).await;
    app.wait_for_connections(2).await;

    let frame = json!({ "recipient_id": bob.id, "content": "offline chat" });
    alice_ws
        .send(Message::Text(frame.to_string().into()))
        .await
        .unwrap();

    assert_silent(&mut bob_notifications).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(app.store.message_count().await, 1);
}

#[tokio::test]
async fn test_oldest_connection_evicted_over_limit() {
    let app = TestApp::with_config(|config| config.realtime.max_connections_per_user = 1).await;
    let addr = app.serve().await;
    let alice = app.store.add_user("alice");
    let token = app.token_for(&alice);

    let mut first = connect(addr, "/ws/notifications", &token).await;
    app.wait_for_connections(1).await;
    let _second = connect(addr, "/ws/notifications", &token).await;

    let ended = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match first.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(ended.is_ok(), "evicted socket was not closed");

    app.wait_for_connections(1).await;
    let snapshot = app.state.realtime.metrics.snapshot();
    assert_eq!(snapshot.connections_evicted, 1);
    let room = RoomId::notifications(alice.id);
    assert_eq!(app.state.realtime.rooms.member_count(&room), 1);
}

#[tokio::test]
async fn test_client_close_cleans_up_rooms() {
    let app = TestApp::new().await;
    let addr = app.serve().await;
    let alice = app.store.add_user("alice");

    let mut ws = connect(addr, "/ws/chat", &app.token_for(&alice)).await;
    app.wait_for_connections(1).await;
    assert_eq!(app.state.realtime.rooms.member_count(&RoomId::chat(alice.id)), 1);

    ws.close(None).await.unwrap();
    app.wait_for_connections(0).await;

    assert_eq!(app.state.realtime.rooms.room_count(), 0);
    assert!(!app.state.realtime.connections.is_user_connected(&alice.id));
}
