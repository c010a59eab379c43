//! Seeding helpers for the in-memory store.
//!
//! These stand in for the account, post, like, and follow endpoints of the
//! CRUD layer so the real-time paths have data to render.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use agora_core::models::{UserProfile, UserSummary};
use agora_core::types::{PostId, UserId};

use super::store::MemoryStore;

/// Stored post row.
#[derive(Debug, Clone)]
pub struct PostRecord {
    /// Post ID.
    pub id: PostId,
    /// Author.
    pub author: UserId,
    /// Body text.
    pub content: String,
    /// Users who liked it.
    pub likes: HashSet<UserId>,
    /// Top-level comment count.
    pub comments_count: u64,
    /// Visibility flag.
    pub is_public: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last edit time.
    pub updated_at: DateTime<Utc>,
}

impl MemoryStore {
    /// Registers a user and returns its profile.
    pub fn add_user(&self, username: &str) -> UserProfile {
        let id = UserId::new();
        let profile = UserProfile::new(UserSummary {
            id,
            username: username.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: format!("{username}@example.com"),
        });
        self.users.insert(id, profile.clone());
        profile
    }

    /// Removes a user; rows that reference it stay in place.
    pub fn remove_user(&self, id: UserId) {
        self.users.remove(&id);
    }

    /// Makes `follower` follow `followee`.
    pub fn follow(&self, follower: UserId, followee: UserId) {
        self.followers.entry(followee).or_default().insert(follower);
    }

    /// Undoes [`MemoryStore::follow`].
    pub fn unfollow(&self, follower: UserId, followee: UserId) {
        if let Some(mut set) = self.followers.get_mut(&followee) {
            set.remove(&follower);
        }
    }

    /// Publishes a post.
    pub fn add_post(&self, author: UserId, content: &str) -> PostId {
        let now = Utc::now();
        let record = PostRecord {
            id: PostId::new(),
            author,
            content: content.to_string(),
            likes: HashSet::new(),
            comments_count: 0,
            is_public: true,
            created_at: now,
            updated_at: now,
        };
        let id = record.id;
        self.posts.insert(id, record);
        id
    }

    /// Records a like; returns `false` when it already existed.
    pub fn like_post(&self, user: UserId, post: PostId) -> bool {
        self.posts
            .get_mut(&post)
            .map(|mut record| record.likes.insert(user))
            .unwrap_or(false)
    }

    /// Records a top-level comment.
    pub fn add_comment(&self, post: PostId) {
        if let Some(mut record) = self.posts.get_mut(&post) {
            record.comments_count += 1;
        }
    }
}
