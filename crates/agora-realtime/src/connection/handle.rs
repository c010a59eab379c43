//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, mpsc};
use tokio_util::sync::CancellationToken;

use agora_core::types::{ConnectionId, UserId};

use crate::channel::RoomId;

/// Which endpoint a connection was opened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    /// Receives notification pushes; inbound frames are ignored.
    Notifications,
    /// Sends and receives direct messages.
    Chat,
}

impl ConnectionKind {
    /// Rooms a connection of this kind joins on open.
    pub fn rooms_for(&self, user: UserId) -> Vec<RoomId> {
        match self {
            Self::Notifications => vec![RoomId::notifications(user)],
            Self::Chat => vec![RoomId::chat(user)],
        }
    }
}

/// A frame queued for the socket writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A serialized JSON payload.
    Text(String),
    /// A keepalive ping.
    Ping,
}

/// A handle to a single WebSocket connection.
///
/// Holds the sender channel for pushing frames to the client, the
/// cancellation token of the connection task, and metadata about the
/// connected user.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// User who owns this connection
    pub user_id: UserId,
    /// Username (cached for display)
    pub username: String,
    /// Endpoint kind
    pub kind: ConnectionKind,
    /// Sender for outbound frames
    sender: mpsc::Sender<Frame>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Last activity timestamp
    last_activity: RwLock<DateTime<Utc>>,
    /// Last pong received
    last_pong: RwLock<DateTime<Utc>>,
    /// Cleared exactly once, when teardown begins
    alive: AtomicBool,
    /// Cancels the connection task
    cancel: CancellationToken,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(
        user_id: UserId,
        username: String,
        kind: ConnectionKind,
        sender: mpsc::Sender<Frame>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ConnectionId::new(),
            user_id,
            username,
            kind,
            sender,
            connected_at: now,
            last_activity: RwLock::new(now),
            last_pong: RwLock::new(now),
            alive: AtomicBool::new(true),
            cancel: CancellationToken::new(),
        }
    }

    /// Queue a frame for this connection.
    ///
    /// Never blocks. Returns `false` when the handle is closed, the writer
    /// is gone, or the buffer is full.
    ///
    /// Best-effort: `true` means queued, not written. A frame queued while
    /// `mark_closed` runs on another task may still be dropped, because the
    /// writer stops at cancellation without draining its buffer.
    pub fn send(&self, frame: Frame) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(conn_id = %self.id, "Writer gone, cancelling connection");
                self.cancel.cancel();
                false
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Marks the handle closed and cancels its task.
    ///
    /// Returns `true` only for the first caller.
    pub fn mark_closed(&self) -> bool {
        let was_alive = self.alive.swap(false, Ordering::SeqCst);
        self.cancel.cancel();
        was_alive
    }

    /// Requests the connection task to stop without tearing anything down.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token cancelled when the connection must stop.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Update last activity timestamp
    pub async fn touch(&self) {
        *self.last_activity.write().await = Utc::now();
    }

    /// Record a pong response
    pub async fn record_pong(&self) {
        let now = Utc::now();
        *self.last_pong.write().await = now;
        *self.last_activity.write().await = now;
    }

    /// Time of the last pong.
    pub async fn last_pong(&self) -> DateTime<Utc> {
        *self.last_pong.read().await
    }

    /// Get a snapshot of connection info
    pub async fn info(&self) -> ConnectionInfo {
        ConnectionInfo {
            id: self.id,
            user_id: self.user_id,
            username: self.username.clone(),
            kind: self.kind,
            connected_at: self.connected_at,
            last_activity: *self.last_activity.read().await,
            alive: self.is_alive(),
        }
    }
}

/// Snapshot of connection info (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Connection ID
    pub id: ConnectionId,
    /// User ID
    pub user_id: UserId,
    /// Username
    pub username: String,
    /// Endpoint kind
    pub kind: ConnectionKind,
    /// Connected at
    pub connected_at: DateTime<Utc>,
    /// Last activity
    pub last_activity: DateTime<Utc>,
    /// Is alive
    pub alive: bool,
}
