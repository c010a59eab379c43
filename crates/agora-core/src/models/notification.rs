//! Durable notification rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{NotificationId, PostId, UserId};

/// A persisted notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification ID.
    pub id: NotificationId,
    /// The acting user.
    pub user_id: UserId,
    /// The user being notified.
    pub target_user_id: UserId,
    /// Related post, if any.
    pub post_id: Option<PostId>,
    /// Rendered text.
    pub message: String,
    /// Read flag.
    pub is_read: bool,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

/// Insert payload for [`Notification`]; id and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    /// The acting user.
    pub user_id: UserId,
    /// The user being notified.
    pub target_user_id: UserId,
    /// Related post, if any.
    pub post_id: Option<PostId>,
    /// Rendered text.
    pub message: String,
}
