//! Notification dispatcher: resolves recipients, writes the durable row,
//! then pushes to every live connection in each recipient's room.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, warn};

use agora_core::events::NotificationEvent;
use agora_core::models::{NewNotification, UserProfile};
use agora_core::traits::Collaborators;
use agora_core::types::UserId;

use crate::channel::RoomId;
use crate::connection::ConnectionManager;
use crate::message::builder::build_notification;
use crate::message::serializer::serialize_outbound;
use crate::metrics::RealtimeMetrics;

use super::outcome::{DeliveryOutcome, RecipientOutcome, RecipientStatus};
use super::persistence::{Persisted, persist_and_count};

/// Routes notification events to durable storage and live connections.
#[derive(Debug)]
pub struct NotificationDispatcher {
    /// Connection manager for room pushes
    connections: Arc<ConnectionManager>,
    /// Store, follow graph, and directories
    collaborators: Collaborators,
    /// Metrics
    metrics: Arc<RealtimeMetrics>,
}

impl NotificationDispatcher {
    /// Create a new dispatcher
    pub fn new(
        connections: Arc<ConnectionManager>,
        collaborators: Collaborators,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            connections,
            collaborators,
            metrics,
        }
    }

    /// Dispatch an event to every resolved recipient.
    ///
    /// Recipients are handled concurrently and independently: a failure
    /// for one never affects another, and no failure is returned as `Err`.
    pub async fn dispatch(&self, event: &NotificationEvent) -> DeliveryOutcome {
        let recipients = self.resolve_recipients(event).await;
        if recipients.is_empty() {
            debug!(actor = %event.actor(), "Event has no recipients");
            return DeliveryOutcome::default();
        }

        let actor = match self.collaborators.users.find_user(event.actor()).await {
            Ok(Some(actor)) => actor,
            Ok(None) => {
                warn!(actor = %event.actor(), "Actor not found, skipping every recipient");
                return self.all_unresolvable(recipients);
            }
            Err(e) => {
                warn!(actor = %event.actor(), error = %e, "Actor lookup failed");
                return self.all_unresolvable(recipients);
            }
        };

        let recipients = join_all(
            recipients
                .into_iter()
                .map(|recipient| self.deliver_one(event, &actor, recipient)),
        )
        .await;

        DeliveryOutcome { recipients }
    }

    /// Directed events go to their target. Broadcasts go to the actor's
    /// followers as of now, de-duplicated, never the actor.
    async fn resolve_recipients(&self, event: &NotificationEvent) -> Vec<UserId> {
        match event {
            NotificationEvent::Directed(e) => vec![e.target()],
            NotificationEvent::Broadcast(e) => {
                let followers = match self.collaborators.follows.followers_of(e.actor()).await {
                    Ok(followers) => followers,
                    Err(err) => {
                        error!(actor = %e.actor(), error = %err, "Follower lookup failed");
                        return Vec::new();
                    }
                };
                let mut seen = HashSet::new();
                followers
                    .into_iter()
                    .filter(|f| *f != e.actor() && seen.insert(*f))
                    .collect()
            }
        }
    }

    fn all_unresolvable(&self, recipients: Vec<UserId>) -> DeliveryOutcome {
        DeliveryOutcome {
            recipients: recipients
                .into_iter()
                .map(|r| {
                    self.metrics.recipient_unresolved();
                    RecipientOutcome::unresolvable(r)
                })
                .collect(),
        }
    }

    async fn deliver_one(
        &self,
        event: &NotificationEvent,
        actor: &UserProfile,
        recipient: UserId,
    ) -> RecipientOutcome {
        match self.collaborators.users.find_user(recipient).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!(recipient = %recipient, "Recipient not found, skipping");
                self.metrics.recipient_unresolved();
                return RecipientOutcome::unresolvable(recipient);
            }
            Err(e) => {
                warn!(recipient = %recipient, error = %e, "Recipient lookup failed, skipping");
                self.metrics.recipient_unresolved();
                return RecipientOutcome::unresolvable(recipient);
            }
        }

        let new = NewNotification {
            user_id: actor.id,
            target_user_id: recipient,
            post_id: event.post(),
            message: event.message().to_owned(),
        };
        let Persisted {
            notification,
            unread_count,
        } = match persist_and_count(self.collaborators.notifications.as_ref(), new).await {
            Ok(stored) => stored,
            Err(e) => {
                error!(recipient = %recipient, error = %e, "Failed to persist notification");
                self.metrics.persist_failed();
                return RecipientOutcome::persist_failed(recipient, e.message);
            }
        };
        self.metrics.notification_persisted();

        let post = match event.post() {
            Some(post_id) => match self.collaborators.posts.find_post(post_id, recipient).await {
                Ok(post) => post,
                Err(e) => {
                    warn!(post_id = %post_id, error = %e, "Post lookup failed, pushing without it");
                    None
                }
            },
            None => None,
        };

        let status = match serialize_outbound(&build_notification(&notification, actor, post, unread_count)) {
            Ok(payload) => {
                match self
                    .connections
                    .push_to_room(&RoomId::notifications(recipient), &payload)
                {
                    0 => RecipientStatus::Offline,
                    pushes => RecipientStatus::Delivered { pushes },
                }
            }
            Err(e) => {
                error!(recipient = %recipient, error = %e, "Failed to serialize notification");
                RecipientStatus::Offline
            }
        };

        RecipientOutcome {
            recipient,
            notification_id: Some(notification.id),
            unread_count,
            status,
        }
    }
}
