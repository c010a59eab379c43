//! Notification-producing events.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::UserSummary;
use crate::result::AppResult;
use crate::types::{PostId, UserId};

/// Maximum length of a rendered notification message.
pub const MAX_MESSAGE_LEN: usize = 255;

/// The actions that produce notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone liked the target's post.
    PostLiked,
    /// Someone commented on the target's post.
    PostCommented,
    /// Someone liked the target's comment.
    CommentLiked,
    /// Someone started following the target.
    UserFollowed,
    /// The actor published a post; goes to every follower.
    PostCreated,
}

impl NotificationKind {
    /// Renders the user-facing text for an actor.
    pub fn render(&self, actor_username: &str) -> String {
        match self {
            Self::PostLiked => format!("{actor_username} liked your post"),
            Self::PostCommented => format!("{actor_username} commented on your post"),
            Self::CommentLiked => format!("{actor_username} liked your comment!"),
            Self::UserFollowed => format!("{actor_username} is following you"),
            Self::PostCreated => format!("{actor_username} created a new post!"),
        }
    }

    /// Whether the kind fans out to followers instead of one target.
    pub fn is_broadcast(&self) -> bool {
        matches!(self, Self::PostCreated)
    }
}

/// An event addressed to exactly one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectedEvent {
    actor: UserId,
    target: UserId,
    message: String,
    post: Option<PostId>,
}

impl DirectedEvent {
    /// Builds a directed event. Self-addressed events are rejected.
    pub fn new(
        actor: UserId,
        target: UserId,
        message: impl Into<String>,
        post: Option<PostId>,
    ) -> AppResult<Self> {
        if actor == target {
            return Err(AppError::validation(
                "Directed event cannot target its own actor",
            ));
        }
        Ok(Self {
            actor,
            target,
            message: checked_message(message.into())?,
            post,
        })
    }

    /// The acting user.
    pub fn actor(&self) -> UserId {
        self.actor
    }

    /// The single recipient.
    pub fn target(&self) -> UserId {
        self.target
    }

    /// Rendered text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Related post.
    pub fn post(&self) -> Option<PostId> {
        self.post
    }
}

/// An event delivered to every follower of the actor, resolved at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BroadcastEvent {
    actor: UserId,
    message: String,
    post: Option<PostId>,
}

impl BroadcastEvent {
    /// Builds a follower broadcast.
    pub fn new(actor: UserId, message: impl Into<String>, post: Option<PostId>) -> AppResult<Self> {
        Ok(Self {
            actor,
            message: checked_message(message.into())?,
            post,
        })
    }

    /// The acting user.
    pub fn actor(&self) -> UserId {
        self.actor
    }

    /// Rendered text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Related post.
    pub fn post(&self) -> Option<PostId> {
        self.post
    }
}

/// A notification-producing domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// One explicit recipient.
    Directed(DirectedEvent),
    /// Every follower of the actor.
    Broadcast(BroadcastEvent),
}

impl NotificationEvent {
    /// Generic producer entry point: a target makes the event directed,
    /// no target makes it a follower broadcast.
    pub fn new(
        actor: UserId,
        message: impl Into<String>,
        target: Option<UserId>,
        post: Option<PostId>,
    ) -> AppResult<Self> {
        match target {
            Some(target) => DirectedEvent::new(actor, target, message, post).map(Self::Directed),
            None => BroadcastEvent::new(actor, message, post).map(Self::Broadcast),
        }
    }

    /// Builds the event for `kind`, rendering the message from the actor's username.
    pub fn for_kind(
        kind: NotificationKind,
        actor: &UserSummary,
        target: Option<UserId>,
        post: Option<PostId>,
    ) -> AppResult<Self> {
        let message = kind.render(&actor.username);
        match (kind.is_broadcast(), target) {
            (true, _) => BroadcastEvent::new(actor.id, message, post).map(Self::Broadcast),
            (false, Some(target)) => {
                DirectedEvent::new(actor.id, target, message, post).map(Self::Directed)
            }
            (false, None) => Err(AppError::validation(format!(
                "{kind:?} notifications need a target user"
            ))),
        }
    }

    /// `actor` liked a post written by `author`.
    pub fn post_liked(actor: &UserSummary, author: UserId, post: PostId) -> AppResult<Self> {
        Self::for_kind(NotificationKind::PostLiked, actor, Some(author), Some(post))
    }

    /// `actor` commented on a post written by `author`.
    pub fn post_commented(actor: &UserSummary, author: UserId, post: PostId) -> AppResult<Self> {
        Self::for_kind(NotificationKind::PostCommented, actor, Some(author), Some(post))
    }

    /// `actor` liked a comment written by `author` under `post`.
    pub fn comment_liked(actor: &UserSummary, author: UserId, post: PostId) -> AppResult<Self> {
        Self::for_kind(NotificationKind::CommentLiked, actor, Some(author), Some(post))
    }

    /// `actor` followed `followed`.
    pub fn user_followed(actor: &UserSummary, followed: UserId) -> AppResult<Self> {
        Self::for_kind(NotificationKind::UserFollowed, actor, Some(followed), None)
    }

    /// `actor` published `post`.
    pub fn post_created(actor: &UserSummary, post: PostId) -> AppResult<Self> {
        Self::for_kind(NotificationKind::PostCreated, actor, None, Some(post))
    }

    /// The acting user.
    pub fn actor(&self) -> UserId {
        match self {
            Self::Directed(e) => e.actor(),
            Self::Broadcast(e) => e.actor(),
        }
    }

    /// Rendered text.
    pub fn message(&self) -> &str {
        match self {
            Self::Directed(e) => e.message(),
            Self::Broadcast(e) => e.message(),
        }
    }

    /// Related post.
    pub fn post(&self) -> Option<PostId> {
        match self {
            Self::Directed(e) => e.post(),
            Self::Broadcast(e) => e.post(),
        }
    }
}

fn checked_message(message: String) -> AppResult<String> {
    if message.trim().is_empty() {
        return Err(AppError::validation("Notification message must not be empty"));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(AppError::validation(format!(
            "Notification message exceeds {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(message)
}
