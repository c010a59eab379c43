//! Per-connection state machine: `Connecting → Open → Closed`.
//!
//! Reaching `Open` is the only path that registers a handle and joins
//! rooms, so a rejected connection leaves nothing behind. `Closed` is
//! terminal and teardown runs exactly once.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use agora_core::error::AppError;
use agora_core::events::ChatSendEvent;
use agora_core::result::AppResult;

use crate::chat::ChatRelay;
use crate::message::validator::parse_chat_inbound;
use crate::metrics::RealtimeMetrics;

use super::authenticator::AuthenticatedUser;
use super::handle::{ConnectionHandle, ConnectionKind, Frame};
use super::heartbeat::HeartbeatConfig;
use super::manager::ConnectionManager;

/// Lifecycle state of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Request received, identity not yet accepted.
    Connecting,
    /// Registered and joined to its rooms.
    Open,
    /// Torn down. Terminal.
    Closed,
}

/// Drives one connection from accept to teardown.
#[derive(Debug)]
pub struct ConnectionLifecycle {
    kind: ConnectionKind,
    state: ConnectionState,
    handle: Option<Arc<ConnectionHandle>>,
    connections: Arc<ConnectionManager>,
    chat: Arc<ChatRelay>,
    metrics: Arc<RealtimeMetrics>,
}

impl ConnectionLifecycle {
    /// Starts a lifecycle in `Connecting`.
    pub fn new(
        kind: ConnectionKind,
        connections: Arc<ConnectionManager>,
        chat: Arc<ChatRelay>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            kind,
            state: ConnectionState::Connecting,
            handle: None,
            connections,
            chat,
            metrics,
        }
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Endpoint kind.
    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    /// The registered handle, once `Open`.
    pub fn handle(&self) -> Option<&Arc<ConnectionHandle>> {
        self.handle.as_ref()
    }

    /// Token cancelled when the connection must stop (eviction, heartbeat
    /// timeout, or shutdown). `None` until `Open`.
    pub fn cancellation(&self) -> Option<CancellationToken> {
        self.handle.as_ref().map(|h| h.cancellation())
    }

    /// Heartbeat settings for this connection.
    pub fn heartbeat_config(&self) -> HeartbeatConfig {
        HeartbeatConfig::from(self.connections.config())
    }

    /// Accepts or rejects the connection.
    ///
    /// `None` means the identity could not be resolved: the lifecycle goes
    /// straight to `Closed` with no side effects.
    pub fn accept(
        &mut self,
        identity: Option<AuthenticatedUser>,
    ) -> AppResult<mpsc::Receiver<Frame>> {
        if self.state != ConnectionState::Connecting {
            return Err(AppError::conflict("Connection already accepted or closed"));
        }
        let Some(identity) = identity else {
            self.state = ConnectionState::Closed;
            debug!(kind = ?self.kind, "Connection rejected: unauthenticated");
            return Err(AppError::authentication("Connection rejected: unauthenticated"));
        };

        let (handle, rx) = self.connections.register(&identity, self.kind);
        self.handle = Some(handle);
        self.state = ConnectionState::Open;
        Ok(rx)
    }

    /// Handles an inbound text frame.
    ///
    /// Never changes state: malformed or invalid frames are logged and
    /// dropped.
    pub async fn on_text(&self, raw: &str) {
        let Some(handle) = self.open_handle() else {
            return;
        };
        handle.touch().await;

        match self.kind {
            ConnectionKind::Notifications => {
                debug!(conn_id = %handle.id, "Ignoring inbound frame on notification connection");
            }
            ConnectionKind::Chat => {
                if let Err(e) = self.relay_chat(handle, raw).await {
                    warn!(
                        conn_id = %handle.id,
                        user_id = %handle.user_id,
                        error = %e,
                        "Inbound chat message rejected"
                    );
                    self.metrics.inbound_rejected();
                }
            }
        }
    }

    async fn relay_chat(&self, handle: &ConnectionHandle, raw: &str) -> AppResult<()> {
        let inbound = parse_chat_inbound(raw, self.connections.config().max_message_bytes)?;
        let event = ChatSendEvent::new(handle.user_id, inbound.recipient_id, inbound.content)?;
        self.chat.relay(&event).await?;
        Ok(())
    }

    /// Records a pong from the client.
    pub async fn on_pong(&self) {
        if let Some(handle) = self.open_handle() {
            handle.record_pong().await;
        }
    }

    /// Tears the connection down. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }
        if let Some(handle) = &self.handle {
            self.connections.unregister(&handle.id);
        }
        self.state = ConnectionState::Closed;
    }

    fn open_handle(&self) -> Option<&Arc<ConnectionHandle>> {
        match self.state {
            ConnectionState::Open => self.handle.as_ref(),
            _ => None,
        }
    }
}

impl Drop for ConnectionLifecycle {
    fn drop(&mut self) {
        self.close();
    }
}
