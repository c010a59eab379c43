//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agora_core::models::ChatMessage;
use agora_core::types::{PageResponse, UserId};
use agora_realtime::MetricsSnapshot;
use agora_realtime::message::NotificationResult;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// The caller's notifications, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationListResponse {
    /// Unread count.
    pub notifications_count: u64,
    /// Requested page.
    pub results: PageResponse<NotificationResult>,
}

/// A discussion page between the caller and another user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionResponse {
    /// Messages from the other user the caller has not seen.
    pub unread_count: u64,
    /// Requested page, newest first.
    pub results: PageResponse<ChatMessage>,
}

/// One conversation in the caller's discussion list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionPartnerItem {
    /// The other participant.
    pub id: UserId,
    /// Their username.
    pub username: String,
    /// Their avatar.
    pub avatar: String,
    /// Messages from them the caller has not seen.
    pub unread_count: u64,
    /// Time of the latest message in either direction.
    pub last_message_at: DateTime<Utc>,
}

/// Number of rows changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedResponse {
    /// Rows marked as read.
    pub marked: u64,
}

/// Intake acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAcceptedResponse {
    /// Whether the event reached the dispatch queue.
    pub queued: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Status.
    pub status: String,
    /// Open WebSocket connections.
    pub ws_connections: usize,
    /// Users with at least one open connection.
    pub online_users: usize,
    /// Non-empty rooms.
    pub rooms: usize,
    /// Engine counters.
    pub metrics: MetricsSnapshot,
}
