//! User records as seen by the fan-out layer.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Avatar used when a profile has none uploaded.
pub const DEFAULT_AVATAR: &str = "avatars/user.jpg";

/// Public account fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID.
    pub id: UserId,
    /// Unique handle.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact address.
    pub email: String,
}

/// Account plus profile decoration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID (same as `user.id`).
    pub id: UserId,
    /// Account fields.
    pub user: UserSummary,
    /// Free-form biography.
    pub bio: String,
    /// Avatar storage reference.
    pub avatar: String,
}

impl UserProfile {
    /// Builds a profile with an empty bio and the default avatar.
    pub fn new(user: UserSummary) -> Self {
        Self {
            id: user.id,
            user,
            bio: String::new(),
            avatar: DEFAULT_AVATAR.to_string(),
        }
    }

    /// Username shortcut.
    pub fn username(&self) -> &str {
        &self.user.username
    }
}
