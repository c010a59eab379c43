//! Identity resolution for incoming connections.
//!
//! The lifecycle handler never sees raw credentials. Whatever sits in
//! front of it (the HTTP layer) resolves a token into an
//! [`AuthenticatedUser`] through an [`IdentityResolver`].

use async_trait::async_trait;

use agora_core::result::AppResult;
use agora_core::types::UserId;

/// Identity of an already-authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User ID.
    pub user_id: UserId,
    /// Username.
    pub username: String,
}

impl AuthenticatedUser {
    /// Creates a resolved identity.
    pub fn new(user_id: UserId, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}

/// Resolves a bearer credential into an identity.
#[async_trait]
pub trait IdentityResolver: Send + Sync + std::fmt::Debug {
    /// Returns the caller's identity, or an authentication error.
    async fn resolve(&self, token: &str) -> AppResult<AuthenticatedUser>;
}
