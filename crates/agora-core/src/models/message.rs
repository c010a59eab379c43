//! Direct message rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{MessageId, UserId};

/// A persisted direct message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message ID.
    pub id: MessageId,
    /// Sender.
    pub sender_id: UserId,
    /// Receiver.
    pub receiver_id: UserId,
    /// Body text.
    pub content: String,
    /// Whether the receiver has seen it.
    pub is_read: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Someone the reader has exchanged messages with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionPartner {
    /// The other participant.
    pub user_id: UserId,
    /// Messages from the partner the reader has not seen.
    pub unread_count: u64,
    /// Time of the latest message in either direction.
    pub last_message_at: DateTime<Utc>,
}
