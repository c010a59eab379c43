//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use agora_core::events::NotificationKind;
use agora_core::types::{PostId, UserId};

/// Producer intake body for `POST /api/events`.
///
/// Either `kind` (message rendered from the caller's username) or an
/// explicit `message` must be present. No `target_id` means the event
/// goes to the caller's followers.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PublishEventRequest {
    /// Known action; overrides `message` when set.
    #[serde(default)]
    pub kind: Option<NotificationKind>,
    /// Pre-rendered text.
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Message must be 1-255 characters"))]
    pub message: Option<String>,
    /// Single recipient.
    #[serde(default)]
    pub target_id: Option<UserId>,
    /// Related post.
    #[serde(default)]
    pub post_id: Option<PostId>,
}
