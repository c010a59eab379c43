//! Durable notification and message store.

use async_trait::async_trait;

use crate::models::{ChatMessage, DiscussionPartner, NewNotification, Notification};
use crate::result::AppResult;
use crate::types::{PageRequest, PageResponse, UserId};

/// Persistence for notification rows.
///
/// A write that returns `Ok` must be visible to `count_unread` issued
/// afterwards by the same caller.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Inserts a row and returns it with id and timestamp assigned.
    async fn create_notification(&self, new: NewNotification) -> AppResult<Notification>;

    /// Counts unread rows addressed to `target`.
    async fn count_unread(&self, target: UserId) -> AppResult<u64>;

    /// Lists rows addressed to `target`, newest first.
    async fn list_for_user(
        &self,
        target: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Marks every unread row for `target` as read; returns how many changed.
    async fn mark_all_read(&self, target: UserId) -> AppResult<u64>;
}

/// Persistence for direct messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Inserts a message and returns it with id and timestamp assigned.
    async fn create_message(
        &self,
        sender: UserId,
        receiver: UserId,
        content: &str,
    ) -> AppResult<ChatMessage>;

    /// Lists the conversation between two users, newest first.
    async fn list_discussion(
        &self,
        a: UserId,
        b: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ChatMessage>>;

    /// Lists everyone `reader` has exchanged messages with, most recent
    /// conversation first, each with its unread count.
    async fn list_partners(
        &self,
        reader: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DiscussionPartner>>;

    /// Counts messages from `sender` that `reader` has not seen.
    async fn count_unread_from(&self, reader: UserId, sender: UserId) -> AppResult<u64>;

    /// Marks messages from `sender` to `reader` as read; returns how many changed.
    async fn mark_discussion_read(&self, reader: UserId, sender: UserId) -> AppResult<u64>;
}
