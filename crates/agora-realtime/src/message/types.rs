//! Wire types pushed to and received from clients.
//!
//! The outbound shapes are fixed by the clients: notification rooms get
//! `{"payload": {"notifications_count": n, "results": {...}}}`, chat rooms
//! get `{"alert": "...", "message": {...}}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use agora_core::models::{PostSummary, UserProfile, UserSummary};
use agora_core::types::{MessageId, NotificationId, UserId};

/// Frames the server pushes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    /// Pushed to `notifications:<user>`.
    Notification {
        /// Denormalized notification and running unread count.
        payload: NotificationPayload,
    },
    /// Pushed to `chat:<user>`.
    Chat {
        /// Human-readable alert line.
        alert: String,
        /// The stored message.
        message: ChatMessagePayload,
    },
}

/// Body of a notification push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Recipient's unread count after this notification was stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications_count: Option<u64>,
    /// The notification itself.
    pub results: NotificationResult,
}

/// A notification rendered for display without a follow-up fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Notification row ID.
    pub id: NotificationId,
    /// The acting user.
    pub user: UserSummary,
    /// Related post rendered for the recipient.
    pub post: Option<PostSummary>,
    /// Actor's avatar reference.
    pub avatar: String,
    /// Rendered text.
    pub message: String,
    /// Read flag.
    pub is_read: bool,
    /// When the row was written.
    pub timestamp: DateTime<Utc>,
}

/// A direct message as pushed to the recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessagePayload {
    /// Message row ID.
    pub id: MessageId,
    /// Body.
    pub content: String,
    /// Sender profile.
    pub sender: UserProfile,
    /// Read flag.
    pub is_read: bool,
    /// When the message was stored.
    pub created_at: DateTime<Utc>,
}

/// A chat send request from the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct InboundChatMessage {
    /// Who receives the message.
    pub recipient_id: UserId,
    /// Message body.
    #[validate(length(min = 1, max = 4096))]
    pub content: String,
}
