//! Denormalized records exchanged with the persistence collaborator.
//!
//! These are the shapes the fan-out layer renders into push payloads; the
//! authoritative rows live behind the traits in [`crate::traits`].

pub mod message;
pub mod notification;
pub mod post;
pub mod user;

pub use message::{ChatMessage, DiscussionPartner};
pub use notification::{NewNotification, Notification};
pub use post::PostSummary;
pub use user::{UserProfile, UserSummary};
