//! Collaborator traits implemented outside the fan-out core.
//!
//! The durable store, follow graph, and user/post directories are owned by
//! the persistence layer. The real-time engine only sees these traits,
//! bundled in [`Collaborators`], so tests and alternate backends can be
//! injected explicitly.

pub mod directory;
pub mod graph;
pub mod store;

use std::sync::Arc;

pub use directory::{PostDirectory, UserDirectory};
pub use graph::FollowGraph;
pub use store::{MessageStore, NotificationStore};

/// The full set of collaborators the real-time engine depends on.
#[derive(Clone)]
pub struct Collaborators {
    /// Durable notification rows.
    pub notifications: Arc<dyn NotificationStore>,
    /// Durable direct messages.
    pub messages: Arc<dyn MessageStore>,
    /// Who follows whom.
    pub follows: Arc<dyn FollowGraph>,
    /// Account and profile lookups.
    pub users: Arc<dyn UserDirectory>,
    /// Post lookups rendered for a viewer.
    pub posts: Arc<dyn PostDirectory>,
}

impl Collaborators {
    /// Uses one backend for every collaborator.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: NotificationStore + MessageStore + FollowGraph + UserDirectory + PostDirectory + 'static,
    {
        Self {
            notifications: backend.clone(),
            messages: backend.clone(),
            follows: backend.clone(),
            users: backend.clone(),
            posts: backend,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish()
    }
}
