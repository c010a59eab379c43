//! Injection seam for notification producers.

use agora_core::events::{NotificationEvent, NotificationKind};
use agora_core::models::UserSummary;
use agora_core::types::{PostId, UserId};

/// Accepts notification events without blocking the caller.
///
/// Producers hold an `Arc<dyn NotificationSink>`; delivery happens
/// elsewhere, and nothing a sink does can fail the producer's mutation.
pub trait NotificationSink: Send + Sync + std::fmt::Debug {
    /// Enqueues an event. Returns `false` when it was dropped.
    fn publish(&self, event: NotificationEvent) -> bool;

    /// Builds the event for `kind` and enqueues it.
    ///
    /// Events that fail validation (a user liking their own post, for
    /// instance) are discarded and return `false`.
    fn publish_kind(
        &self,
        kind: NotificationKind,
        actor: &UserSummary,
        target: Option<UserId>,
        post: Option<PostId>,
    ) -> bool {
        match NotificationEvent::for_kind(kind, actor, target, post) {
            Ok(event) => self.publish(event),
            Err(e) => {
                tracing::debug!(actor = %actor.id, kind = ?kind, error = %e, "Event not produced");
                false
            }
        }
    }
}
