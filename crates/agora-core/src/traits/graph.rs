//! Follow graph lookups.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::UserId;

/// Read access to the follow graph. Queried live on every dispatch.
#[async_trait]
pub trait FollowGraph: Send + Sync {
    /// Users currently following `user`.
    async fn followers_of(&self, user: UserId) -> AppResult<Vec<UserId>>;

    /// Whether `viewer` follows `author`.
    async fn is_following(&self, viewer: UserId, author: UserId) -> AppResult<bool>;
}
