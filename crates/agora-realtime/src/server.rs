//! Top-level real-time engine that ties together all subsystems.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use agora_core::config::RealtimeConfig;
use agora_core::traits::Collaborators;

use crate::bridge::{EventBridge, NotificationSink, spawn_worker};
use crate::channel::RoomRegistry;
use crate::chat::ChatRelay;
use crate::connection::{ConnectionKind, ConnectionLifecycle, ConnectionManager};
use crate::metrics::RealtimeMetrics;
use crate::notification::NotificationDispatcher;

/// Central real-time engine that coordinates all WebSocket subsystems.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Room registry.
    pub rooms: Arc<RoomRegistry>,
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Notification dispatcher.
    pub notifications: Arc<NotificationDispatcher>,
    /// Direct-message relay.
    pub chat: Arc<ChatRelay>,
    /// Producer side of the dispatch queue.
    pub event_bridge: EventBridge,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    /// Cancelled once on shutdown.
    shutdown: CancellationToken,
    /// Dispatch worker, taken on shutdown.
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates the engine and starts its dispatch worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: RealtimeConfig, collaborators: Collaborators) -> Self {
        let shutdown = CancellationToken::new();
        let metrics = Arc::new(RealtimeMetrics::new());
        let rooms = Arc::new(RoomRegistry::new());
        let connections = Arc::new(ConnectionManager::new(
            config.clone(),
            rooms.clone(),
            metrics.clone(),
        ));
        let notifications = Arc::new(NotificationDispatcher::new(
            connections.clone(),
            collaborators.clone(),
            metrics.clone(),
        ));
        let chat = Arc::new(ChatRelay::new(
            connections.clone(),
            collaborators,
            metrics.clone(),
        ));
        let (event_bridge, rx) = EventBridge::new(config.dispatch_queue_size, metrics.clone());
        let worker = spawn_worker(rx, notifications.clone(), metrics.clone(), shutdown.clone());

        info!(
            queue = config.dispatch_queue_size,
            max_connections_per_user = config.max_connections_per_user,
            "Real-time engine initialized"
        );

        Self {
            rooms,
            connections,
            notifications,
            chat,
            event_bridge,
            metrics,
            shutdown,
            worker: Arc::new(Mutex::new(Some(worker))),
        }
    }

    /// Starts the lifecycle of a new connection.
    pub fn lifecycle(&self, kind: ConnectionKind) -> ConnectionLifecycle {
        ConnectionLifecycle::new(
            kind,
            self.connections.clone(),
            self.chat.clone(),
            self.metrics.clone(),
        )
    }

    /// Non-blocking sink for notification producers.
    pub fn sink(&self) -> Arc<dyn NotificationSink> {
        Arc::new(self.event_bridge.clone())
    }

    /// Token cancelled when the engine shuts down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Initiates a graceful shutdown of the real-time engine.
    ///
    /// Closes every connection, then waits for the dispatch worker to
    /// drain the events already queued.
    pub async fn shutdown(&self) {
        info!("Shutting down real-time engine");
        self.shutdown.cancel();

        self.connections.close_all();

        let worker = match self.worker.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                warn!(error = %e, "Dispatch worker ended abnormally");
            }
        }

        info!("Real-time engine shut down");
    }
}
