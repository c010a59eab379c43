//! User and post directories.

use async_trait::async_trait;

use crate::models::{PostSummary, UserProfile};
use crate::result::AppResult;
use crate::types::{PostId, UserId};

/// Account lookups. `Ok(None)` means the user does not exist (or was deleted).
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a user's profile.
    async fn find_user(&self, id: UserId) -> AppResult<Option<UserProfile>>;
}

/// Post lookups rendered for a viewer.
#[async_trait]
pub trait PostDirectory: Send + Sync {
    /// Finds a post, computing viewer-relative flags at call time.
    async fn find_post(&self, id: PostId, viewer: UserId) -> AppResult<Option<PostSummary>>;
}
