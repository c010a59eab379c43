//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::StreamExt;
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

use agora_api::AppState;
use agora_api::auth::Claims;
use agora_core::config::AppConfig;
use agora_core::models::UserProfile;
use agora_core::traits::Collaborators;
use agora_core::types::UserId;
use agora_store::MemoryStore;

const JWT_SECRET: &str = "integration-secret";
const WAIT: Duration = Duration::from_secs(2);

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for inspecting the realtime engine
    pub state: AppState,
    /// Backing store, for seeding users, posts and follows
    pub store: Arc<MemoryStore>,
}

/// Parsed HTTP response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application after adjusting the default configuration
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = JWT_SECRET.to_string();
        config.auth.leeway_seconds = 0;
        config.realtime.ping_interval_seconds = 3600;
        adjust(&mut config);

        let store = Arc::new(MemoryStore::new());
        let collaborators = Collaborators::from_backend(Arc::clone(&store));
        let state = agora_api::app::build_state(config, collaborators);
        let router = agora_api::build_app(state.clone());

        Self {
            router,
            state,
            store,
        }
    }

    /// Mint a valid access token for a user
    pub fn token_for(&self, user: &UserProfile) -> String {
        mint(user.id, &user.user.username, 300)
    }

    /// Make a request to the router
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Serve the app on an ephemeral port
    pub async fn serve(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    /// Wait until the server holds exactly `count` live connections
    pub async fn wait_for_connections(&self, count: usize) {
        let connections = &self.state.realtime.connections;
        tokio::time::timeout(WAIT, async {
            while connections.connection_count() != count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("connection count did not settle in time");
    }
}

/// Sign claims with the test secret
pub fn mint(sub: UserId, username: &str, ttl_seconds: i64) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &Claims::new(sub, username, ttl_seconds),
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Open a WebSocket client against a running server
pub async fn connect(addr: SocketAddr, path: &str, token: &str) -> WsClient {
    let url = format!("ws://{addr}{path}?token={token}");
    let (ws, _) = connect_async(url).await.expect("WebSocket handshake failed");
    ws
}

/// Read the next text frame as JSON
pub async fn next_json(ws: &mut WsClient) -> Value {
    tokio::time::timeout(WAIT, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => return serde_json::from_str::<Value>(&text).unwrap(),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                other => panic!("expected a text frame, got {other:?}"),
            }
        }
    })
    .await
    .expect("no frame received in time")
}

/// Assert no text frame arrives within a short window
pub async fn assert_silent(ws: &mut WsClient) {
    let quiet = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    if let Ok(Some(Ok(Message::Text(text)))) = quiet {
        panic!("unexpected frame: {}", text.as_str());
    }
}
