//! Post summary embedded in notification payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserSummary;
use crate::types::PostId;

/// A post rendered for one viewer.
///
/// `is_liked` and `is_following` are computed by the post directory at
/// lookup time for the viewer passed to it; nothing here is cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Post ID.
    pub id: PostId,
    /// Author account.
    pub author: UserSummary,
    /// Body text.
    pub content: String,
    /// Like count.
    pub likes: u64,
    /// Whether the viewer liked the post.
    pub is_liked: bool,
    /// Top-level comment count.
    pub comments_count: u64,
    /// Whether the viewer follows the author.
    pub is_following: bool,
    /// Visibility flag.
    pub is_public: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last edit time.
    pub updated_at: DateTime<Utc>,
}
