//! Room identifiers.
//!
//! A room is always a (kind, user) pair. The wire-level name is produced
//! only by [`RoomId::name`].

use std::fmt;

use serde::{Deserialize, Serialize};

use agora_core::types::UserId;

/// The two per-user room kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    /// Alerts about likes, comments, follows, and new posts.
    Notifications,
    /// Direct messages addressed to the user.
    Chat,
}

impl RoomKind {
    /// Name prefix used on the wire.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Notifications => "notifications",
            Self::Chat => "chat",
        }
    }
}

/// A room owned by one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId {
    /// Room kind.
    pub kind: RoomKind,
    /// Owning user.
    pub user: UserId,
}

impl RoomId {
    /// The user's notification room.
    pub fn notifications(user: UserId) -> Self {
        Self {
            kind: RoomKind::Notifications,
            user,
        }
    }

    /// The user's chat room.
    pub fn chat(user: UserId) -> Self {
        Self {
            kind: RoomKind::Chat,
            user,
        }
    }

    /// Wire-level room name, e.g. `notifications:<uuid>`.
    pub fn name(&self) -> String {
        format!("{}:{}", self.kind.prefix(), self.user)
    }

    /// Parses a wire-level room name.
    pub fn parse(name: &str) -> Option<Self> {
        let (prefix, id) = name.split_once(':')?;
        let user: UserId = id.parse().ok()?;
        match prefix {
            "notifications" => Some(Self::notifications(user)),
            "chat" => Some(Self::chat(user)),
            _ => None,
        }
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.prefix(), self.user)
    }
}
