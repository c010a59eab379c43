//! Builders for outbound payloads.

use agora_core::models::{ChatMessage, Notification, PostSummary, UserProfile};

use super::types::{ChatMessagePayload, NotificationPayload, NotificationResult, OutboundMessage};

/// Builds a notification push from the stored row.
pub fn build_notification(
    notification: &Notification,
    actor: &UserProfile,
    post: Option<PostSummary>,
    unread_count: Option<u64>,
) -> OutboundMessage {
    OutboundMessage::Notification {
        payload: NotificationPayload {
            notifications_count: unread_count,
            results: build_result(notification, actor, post),
        },
    }
}

/// Renders a stored notification for display, as pushed or as listed.
pub fn build_result(
    notification: &Notification,
    actor: &UserProfile,
    post: Option<PostSummary>,
) -> NotificationResult {
    NotificationResult {
        id: notification.id,
        user: actor.user.clone(),
        post,
        avatar: actor.avatar.clone(),
        message: notification.message.clone(),
        is_read: notification.is_read,
        timestamp: notification.timestamp,
    }
}

/// Alert line shown for a new direct message.
pub fn chat_alert(sender_username: &str) -> String {
    format!("{sender_username} sent you a message!")
}

/// Builds a chat push from the stored message.
pub fn build_chat(message: &ChatMessage, sender: &UserProfile) -> OutboundMessage {
    OutboundMessage::Chat {
        alert: chat_alert(sender.username()),
        message: ChatMessagePayload {
            id: message.id,
            content: message.content.clone(),
            sender: sender.clone(),
            is_read: message.is_read,
            created_at: message.created_at,
        },
    }
}
