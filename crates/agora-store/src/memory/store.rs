//! In-memory durable store built on `dashmap` and `tokio::sync::RwLock`.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::RwLock;
use tracing::debug;

use agora_core::models::{
    ChatMessage, DiscussionPartner, NewNotification, Notification, PostSummary, UserProfile,
};
use agora_core::result::AppResult;
use agora_core::traits::{
    FollowGraph, MessageStore, NotificationStore, PostDirectory, UserDirectory,
};
use agora_core::types::{
    MessageId, NotificationId, PageRequest, PageResponse, PostId, UserId,
};

use super::seed::PostRecord;

/// Process-local store implementing every collaborator trait.
///
/// Rows are kept in insertion order, which is also timestamp order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) users: DashMap<UserId, UserProfile>,
    pub(crate) posts: DashMap<PostId, PostRecord>,
    /// Followee → followers.
    pub(crate) followers: DashMap<UserId, HashSet<UserId>>,
    notifications: RwLock<Vec<Notification>>,
    messages: RwLock<Vec<ChatMessage>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notification rows addressed to `target`, read or not.
    pub async fn notification_count(&self, target: UserId) -> usize {
        self.notifications
            .read()
            .await
            .iter()
            .filter(|n| n.target_user_id == target)
            .count()
    }

    /// Total number of stored direct messages.
    pub async fn message_count(&self) -> usize {
        self.messages.read().await.len()
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_notification(&self, new: NewNotification) -> AppResult<Notification> {
        let notification = Notification {
            id: NotificationId::new(),
            user_id: new.user_id,
            target_user_id: new.target_user_id,
            post_id: new.post_id,
            message: new.message,
            is_read: false,
            timestamp: Utc::now(),
        };
        self.notifications.write().await.push(notification.clone());
        debug!(
            notification_id = %notification.id,
            target = %notification.target_user_id,
            "Notification stored"
        );
        Ok(notification)
    }

    async fn count_unread(&self, target: UserId) -> AppResult<u64> {
        let rows = self.notifications.read().await;
        Ok(rows
            .iter()
            .filter(|n| n.target_user_id == target && !n.is_read)
            .count() as u64)
    }

    async fn list_for_user(
        &self,
        target: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let rows = self.notifications.read().await;
        let newest_first: Vec<Notification> = rows
            .iter()
            .rev()
            .filter(|n| n.target_user_id == target)
            .cloned()
            .collect();
        Ok(PageResponse::from_slice(&newest_first, page))
    }

    async fn mark_all_read(&self, target: UserId) -> AppResult<u64> {
        let mut rows = self.notifications.write().await;
        let mut changed = 0;
        for row in rows
            .iter_mut()
            .filter(|n| n.target_user_id == target && !n.is_read)
        {
            row.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn create_message(
        &self,
        sender: UserId,
        receiver: UserId,
        content: &str,
    ) -> AppResult<ChatMessage> {
        let message = ChatMessage {
            id: MessageId::new(),
            sender_id: sender,
            receiver_id: receiver,
            content: content.to_string(),
            is_read: false,
            created_at: Utc::now(),
        };
        self.messages.write().await.push(message.clone());
        Ok(message)
    }

    async fn list_discussion(
        &self,
        a: UserId,
        b: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ChatMessage>> {
        let rows = self.messages.read().await;
        let newest_first: Vec<ChatMessage> = rows
            .iter()
            .rev()
            .filter(|m| {
                (m.sender_id == a && m.receiver_id == b) || (m.sender_id == b && m.receiver_id == a)
            })
            .cloned()
            .collect();
        Ok(PageResponse::from_slice(&newest_first, page))
    }

    async fn list_partners(
        &self,
        reader: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<DiscussionPartner>> {
        let rows = self.messages.read().await;
        let mut partners: Vec<DiscussionPartner> = Vec::new();
        for m in rows.iter().rev() {
            let other = if m.sender_id == reader {
                m.receiver_id
            } else if m.receiver_id == reader {
                m.sender_id
            } else {
                continue;
            };
            if other == reader {
                continue;
            }
            let unread = u64::from(m.sender_id == other && !m.is_read);
            match partners.iter_mut().find(|p| p.user_id == other) {
                Some(partner) => partner.unread_count += unread,
                None => partners.push(DiscussionPartner {
                    user_id: other,
                    unread_count: unread,
                    last_message_at: m.created_at,
                }),
            }
        }
        Ok(PageResponse::from_slice(&partners, page))
    }

    async fn count_unread_from(&self, reader: UserId, sender: UserId) -> AppResult<u64> {
        let rows = self.messages.read().await;
        Ok(rows
            .iter()
            .filter(|m| m.sender_id == sender && m.receiver_id == reader && !m.is_read)
            .count() as u64)
    }

    async fn mark_discussion_read(&self, reader: UserId, sender: UserId) -> AppResult<u64> {
        let mut rows = self.messages.write().await;
        let mut changed = 0;
        for row in rows
            .iter_mut()
            .filter(|m| m.sender_id == sender && m.receiver_id == reader && !m.is_read)
        {
            row.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }
}

#[async_trait]
impl FollowGraph for MemoryStore {
    async fn followers_of(&self, user: UserId) -> AppResult<Vec<UserId>> {
        Ok(self
            .followers
            .get(&user)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn is_following(&self, viewer: UserId, author: UserId) -> AppResult<bool> {
        Ok(self
            .followers
            .get(&author)
            .map(|set| set.contains(&viewer))
            .unwrap_or(false))
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_user(&self, id: UserId) -> AppResult<Option<UserProfile>> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl PostDirectory for MemoryStore {
    async fn find_post(&self, id: PostId, viewer: UserId) -> AppResult<Option<PostSummary>> {
        let Some(record) = self.posts.get(&id).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };
        let Some(author) = self.users.get(&record.author).map(|p| p.user.clone()) else {
            return Ok(None);
        };

        let is_following = viewer != record.author && self.is_following(viewer, record.author).await?;

        Ok(Some(PostSummary {
            id: record.id,
            author,
            content: record.content,
            likes: record.likes.len() as u64,
            is_liked: record.likes.contains(&viewer),
            comments_count: record.comments_count,
            is_following,
            is_public: record.is_public,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }))
    }
}
