//! Route definitions for the Agora HTTP API.
//!
//! REST routes are mounted under `/api`, WebSocket routes under `/ws`.

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

/// Build the router with every route, threading `AppState` through.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(notification_routes())
        .merge(message_routes())
        .merge(event_routes())
        .merge(health_routes());

    let ws_routes = Router::new()
        .route("/notifications", get(handlers::ws::notifications_ws))
        .route("/chat", get(handlers::ws::chat_ws));

    Router::new()
        .nest("/api", api_routes)
        .nest("/ws", ws_routes)
        .with_state(state)
}

/// Durable notifications of the caller
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list_notifications))
        .route("/notifications/read", post(handlers::notification::mark_all_read))
}

/// Discussions between the caller and another user
fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", get(handlers::chat::list_partners))
        .route("/messages/{user_id}", get(handlers::chat::list_discussion))
        .route("/messages/{user_id}/seen", post(handlers::chat::mark_seen))
}

/// Producer intake
fn event_routes() -> Router<AppState> {
    Router::new().route("/events", post(handlers::events::publish_event))
}

/// Health
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use async_trait::async_trait;
    use jsonwebtoken::{EncodingKey, Header, encode};

    use agora_core::config::AppConfig;
    use agora_core::error::AppError;
    use agora_core::models::{NewNotification, PostSummary};
    use agora_core::result::AppResult;
    use agora_core::traits::{Collaborators, NotificationStore, PostDirectory};
    use agora_core::types::{PostId, UserId};
    use agora_store::MemoryStore;

    use crate::app::{build_app, build_state};
    use crate::auth::Claims;

    struct PostsDown;

    #[async_trait]
    impl PostDirectory for PostsDown {
        async fn find_post(&self, _id: PostId, _viewer: UserId) -> AppResult<Option<PostSummary>> {
            Err(AppError::storage("post directory unavailable"))
        }
    }

    fn bearer(config: &AppConfig, sub: UserId, username: &str) -> String {
        let token = encode(
            &Header::default(),
            &Claims::new(sub, username, 300),
            &EncodingKey::from_secret(config.auth.jwt_secret.as_bytes()),
        )
        .unwrap();
        format!("Bearer {token}")
    }

    fn app() -> Router {
        let collaborators = Collaborators::from_backend(Arc::new(MemoryStore::new()));
        build_app(build_state(AppConfig::default(), collaborators))
    }

    async fn get(router: Router, uri: &str, auth: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().uri(uri);
        if let Some(auth) = auth {
            request = request.header("Authorization", auth);
        }
        let response = router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (status, body) = get(app(), "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn test_notifications_require_bearer_token() {
        let (status, body) = get(app(), "/api/notifications", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHORIZED");

        let (status, _) = get(app(), "/api/notifications", Some("Basic abc")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = get(app(), "/api/notifications", Some("Bearer garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_listing_survives_post_lookup_failure() {
        let store = Arc::new(MemoryStore::new());
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");
        let post = store.add_post(bob.id, "hello");
        store
            .create_notification(NewNotification {
                user_id: alice.id,
                target_user_id: bob.id,
                post_id: Some(post),
                message: "alice liked your post".to_string(),
            })
            .await
            .unwrap();

        let mut collaborators = Collaborators::from_backend(store);
        collaborators.posts = Arc::new(PostsDown);
        let config = AppConfig::default();
        let auth = bearer(&config, bob.id, "bob");
        let router = build_app(build_state(config, collaborators));

        let (status, body) = get(router, "/api/notifications", Some(&auth)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["notifications_count"], 1);
        let items = body["data"]["results"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["message"], "alice liked your post");
        assert!(items[0]["post"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (status, _) = get(app(), "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
