//! Durable write for one recipient.

use tracing::warn;

use agora_core::models::{NewNotification, Notification};
use agora_core::result::AppResult;
use agora_core::traits::NotificationStore;

/// A stored row and the unread count read back after it.
#[derive(Debug, Clone)]
pub struct Persisted {
    /// The stored row.
    pub notification: Notification,
    /// Unread count including this row; `None` when the read failed.
    pub unread_count: Option<u64>,
}

/// Stores the notification, then reads the recipient's unread count.
///
/// Only the write can fail the call. The row exists once it returns, so a
/// failed count read is reported as a missing count instead.
pub async fn persist_and_count(
    store: &dyn NotificationStore,
    new: NewNotification,
) -> AppResult<Persisted> {
    let target = new.target_user_id;
    let notification = store.create_notification(new).await?;
    let unread_count = match store.count_unread(target).await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(
                recipient = %target,
                notification_id = %notification.id,
                error = %e,
                "Unread count unavailable after write"
            );
            None
        }
    };
    Ok(Persisted {
        notification,
        unread_count,
    })
}
