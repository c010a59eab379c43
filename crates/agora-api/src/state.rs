//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use agora_core::config::AppConfig;
use agora_core::traits::Collaborators;
use agora_realtime::{IdentityResolver, NotificationSink, RealtimeEngine};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Durable store, follow graph, and directories
    pub collaborators: Collaborators,
    /// Bearer token resolution
    pub identity: Arc<dyn IdentityResolver>,
    /// WebSocket realtime engine
    pub realtime: RealtimeEngine,
    /// Non-blocking notification producer seam
    pub sink: Arc<dyn NotificationSink>,
    /// Process start, for uptime
    pub started_at: Instant,
}

impl AppState {
    /// Assembles state around an engine; the sink is the engine's event bridge.
    pub fn new(
        config: Arc<AppConfig>,
        collaborators: Collaborators,
        identity: Arc<dyn IdentityResolver>,
        realtime: RealtimeEngine,
    ) -> Self {
        let sink = realtime.sink();
        Self {
            config,
            collaborators,
            identity,
            realtime,
            sink,
            started_at: Instant::now(),
        }
    }
}
