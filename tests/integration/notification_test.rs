//! Integration tests for event intake, notification listing and discussions.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use agora_core::traits::MessageStore;
use agora_core::types::UserId;

use helpers::{TestApp, assert_silent, connect, next_json};

#[tokio::test]
async fn test_like_event_is_pushed_and_listed() {
    let app = TestApp::new().await;
    let addr = app.serve().await;
    let alice = app.store.add_user("alice");
    let bob = app.store.add_user("bob");
    let post = app.store.add_post(bob.id, "first post");

    let mut bob_ws = connect(addr, "/ws/notifications", &app.token_for(&bob)).await;
    app.wait_for_connections(1).await;

    let body = json!({ "kind": "post_liked", "target_id": bob.id, "post_id": post });
    let response = app
        .request("POST", "/api/events", Some(&app.token_for(&alice)), Some(body))
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body["data"]["queued"], true);

    let pushed = next_json(&mut bob_ws).await;
    assert_eq!(pushed["payload"]["notifications_count"], 1);
    assert_eq!(pushed["payload"]["results"]["message"], "alice liked your post");
    assert_eq!(pushed["payload"]["results"]["user"]["username"], "alice");
    assert_eq!(pushed["payload"]["results"]["post"]["content"], "first post");
    assert_eq!(pushed["payload"]["results"]["is_read"], false);

    let bob_token = app.token_for(&bob);
    let listed = app
        .request("GET", "/api/notifications", Some(&bob_token), None)
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["data"]["notifications_count"], 1);
    let items = listed.body["data"]["results"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], pushed["payload"]["results"]["id"]);

    let marked = app
        .request("POST", "/api/notifications/read", Some(&bob_token), None)
        .await;
    assert_eq!(marked.body["data"]["marked"], 1);

    let listed = app
        .request("GET", "/api/notifications", Some(&bob_token), None)
        .await;
    assert_eq!(listed.body["data"]["notifications_count"], 0);
    assert_eq!(listed.body["data"]["results"]["items"][0]["is_read"], true);
}

#[tokio::test]
async fn test_post_created_reaches_every_follower() {
    let app = TestApp::new().await;
    let addr = app.serve().await;
    let alice = app.store.add_user("alice");
    let bob = app.store.add_user("bob");
    let carol = app.store.add_user("carol");
    app.store.follow(bob.id, alice.id);
    app.store.follow(carol.id, alice.id);
    let post = app.store.add_post(alice.id, "news");

    let mut bob_ws = connect(addr, "/ws/notifications", &app.token_for(&bob)).await;
    let mut alice_ws = connect(addr, "/ws/notifications", &app.token_for(&alice)).await;
    app.wait_for_connections(2).await;

    let body = json!({ "kind": "post_created", "post_id": post });
    let response = app
        .request("POST", "/api/events", Some(&app.token_for(&alice)), Some(body))
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);

    let pushed = next_json(&mut bob_ws).await;
    assert_eq!(pushed["payload"]["results"]["message"], "alice created a new post!");
    assert_silent(&mut alice_ws).await;

    // Carol was offline; her copy is stored for later.
    assert_eq!(app.store.notification_count(carol.id).await, 1);
    assert_eq!(app.store.notification_count(alice.id).await, 0);
}

#[tokio::test]
async fn test_free_form_message_event() {
    let app = TestApp::new().await;
    let alice = app.store.add_user("alice");
    let bob = app.store.add_user("bob");

    let body = json!({ "message": "alice mentioned you", "target_id": bob.id });
    let response = app
        .request("POST", "/api/events", Some(&app.token_for(&alice)), Some(body))
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);

    app.state.realtime.shutdown().await;
    assert_eq!(app.store.notification_count(bob.id).await, 1);
}

#[tokio::test]
async fn test_self_targeted_event_is_skipped() {
    let app = TestApp::new().await;
    let alice = app.store.add_user("alice");
    let post = app.store.add_post(alice.id, "mine");

    let body = json!({ "kind": "post_liked", "target_id": alice.id, "post_id": post });
    let response = app
        .request("POST", "/api/events", Some(&app.token_for(&alice)), Some(body))
        .await;
    assert_eq!(response.status, StatusCode::ACCEPTED);
    assert_eq!(response.body["data"]["queued"], false);

    app.state.realtime.shutdown().await;
    assert_eq!(app.store.notification_count(alice.id).await, 0);
}

#[tokio::test]
async fn test_event_intake_rejections() {
    let app = TestApp::new().await;
    let alice = app.store.add_user("alice");
    let token = app.token_for(&alice);

    let response = app
        .request("POST", "/api/events", None, Some(json!({ "message": "hi" })))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("POST", "/api/events", Some(&token), Some(json!({})))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("POST", "/api/events", Some(&token), Some(json!({ "kind": "user_followed" })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let too_long = "x".repeat(256);
    let response = app
        .request("POST", "/api/events", Some(&token), Some(json!({ "message": too_long })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_discussion_listing_and_seen() {
    let app = TestApp::new().await;
    let alice = app.store.add_user("alice");
    let bob = app.store.add_user("bob");
    let messages = &app.state.collaborators.messages;
    messages.create_message(alice.id, bob.id, "one").await.unwrap();
    messages.create_message(alice.id, bob.id, "two").await.unwrap();
    messages.create_message(bob.id, alice.id, "reply").await.unwrap();

    let bob_token = app.token_for(&bob);
    let uri = format!("/api/messages/{}", alice.id);
    let listed = app.request("GET", &uri, Some(&bob_token), None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["data"]["unread_count"], 2);
    assert_eq!(listed.body["data"]["results"]["total_items"], 3);

    let seen = app
        .request("POST", &format!("{uri}/seen"), Some(&bob_token), None)
        .await;
    assert_eq!(seen.body["data"]["marked"], 2);

    let listed = app.request("GET", &uri, Some(&bob_token), None).await;
    assert_eq!(listed.body["data"]["unread_count"], 0);

    // Alice's side still has Bob's reply unread.
    let alice_view = app
        .request("GET", &format!("/api/messages/{}", bob.id), Some(&app.token_for(&alice)), None)
        .await;
    assert_eq!(alice_view.body["data"]["unread_count"], 1);
}

#[tokio::test]
async fn test_discussion_partners_listing() {
    let app = TestApp::new().await;
    let alice = app.store.add_user("alice");
    let bob = app.store.add_user("bob");
    let carol = app.store.add_user("carol");
    let messages = &app.state.collaborators.messages;
    messages.create_message(bob.id, alice.id, "one").await.unwrap();
    messages.create_message(bob.id, alice.id, "two").await.unwrap();
    messages.create_message(alice.id, carol.id, "hi").await.unwrap();

    let token = app.token_for(&alice);
    let listed = app.request("GET", "/api/messages", Some(&token), None).await;
    assert_eq!(listed.status, StatusCode::OK);
    let items = listed.body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["username"], "carol");
    assert_eq!(items[0]["unread_count"], 0);
    assert_eq!(items[1]["username"], "bob");
    assert_eq!(items[1]["id"], bob.id.to_string());
    assert_eq!(items[1]["unread_count"], 2);
    assert!(items[1]["avatar"].is_string());

    app.request("POST", &format!("/api/messages/{}/seen", bob.id), Some(&token), None)
        .await;
    let listed = app.request("GET", "/api/messages", Some(&token), None).await;
    assert_eq!(listed.body["data"]["items"][1]["unread_count"], 0);

    let anonymous = app.request("GET", "/api/messages", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_discussion_with_unknown_user_is_not_found() {
    let app = TestApp::new().await;
    let bob = app.store.add_user("bob");

    let uri = format!("/api/messages/{}", UserId::new());
    let response = app.request("GET", &uri, Some(&app.token_for(&bob)), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}
