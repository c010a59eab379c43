//! Per-recipient dispatch results.

use serde::Serialize;

use agora_core::types::{NotificationId, UserId};

/// What happened for one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecipientStatus {
    /// Stored and pushed to at least one live connection.
    Delivered {
        /// Connections the payload was queued on.
        pushes: usize,
    },
    /// Stored; the recipient had no live connection.
    Offline,
    /// The recipient (or the actor) does not exist; nothing stored.
    Unresolvable,
    /// The durable write failed; nothing pushed.
    PersistFailed {
        /// Store error message.
        reason: String,
    },
}

/// Result for one recipient of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientOutcome {
    /// The recipient.
    pub recipient: UserId,
    /// Stored row, when the write succeeded.
    pub notification_id: Option<NotificationId>,
    /// Unread count read back after the write; `None` when the write
    /// failed or the read did not succeed. A stored row is still pushed,
    /// without the count.
    pub unread_count: Option<u64>,
    /// Final status.
    pub status: RecipientStatus,
}

impl RecipientOutcome {
    pub(crate) fn unresolvable(recipient: UserId) -> Self {
        Self {
            recipient,
            notification_id: None,
            unread_count: None,
            status: RecipientStatus::Unresolvable,
        }
    }

    pub(crate) fn persist_failed(recipient: UserId, reason: impl Into<String>) -> Self {
        Self {
            recipient,
            notification_id: None,
            unread_count: None,
            status: RecipientStatus::PersistFailed {
                reason: reason.into(),
            },
        }
    }

    /// Whether at least one connection received the payload.
    pub fn delivered(&self) -> bool {
        matches!(self.status, RecipientStatus::Delivered { .. })
    }

    /// Whether the durable row exists.
    pub fn persisted(&self) -> bool {
        matches!(
            self.status,
            RecipientStatus::Delivered { .. } | RecipientStatus::Offline
        )
    }
}

/// Result of one `dispatch` call, one entry per resolved recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    /// Per-recipient results, in no particular order.
    pub recipients: Vec<RecipientOutcome>,
}

impl DeliveryOutcome {
    /// Outcome for one recipient.
    pub fn get(&self, recipient: UserId) -> Option<&RecipientOutcome> {
        self.recipients.iter().find(|r| r.recipient == recipient)
    }

    /// Recipients that got at least one push.
    pub fn delivered_count(&self) -> usize {
        self.recipients.iter().filter(|r| r.delivered()).count()
    }

    /// Recipients with a durable row.
    pub fn persisted_count(&self) -> usize {
        self.recipients.iter().filter(|r| r.persisted()).count()
    }

    /// Total pushes across all recipients.
    pub fn push_count(&self) -> usize {
        self.recipients
            .iter()
            .map(|r| match r.status {
                RecipientStatus::Delivered { pushes } => pushes,
                _ => 0,
            })
            .sum()
    }

    /// Whether no recipient was resolved.
    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}
