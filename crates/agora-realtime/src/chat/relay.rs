//! Stores a direct message and pushes it to the recipient's chat room.
//!
//! No notification row is written here; the message row is the durable
//! trace of a chat send.

use std::sync::Arc;

use tracing::{debug, info};

use agora_core::error::AppError;
use agora_core::events::ChatSendEvent;
use agora_core::models::ChatMessage;
use agora_core::result::AppResult;
use agora_core::traits::Collaborators;

use crate::channel::RoomId;
use crate::connection::ConnectionManager;
use crate::message::builder::build_chat;
use crate::message::serializer::serialize_outbound;
use crate::metrics::RealtimeMetrics;

/// Result of relaying one message.
#[derive(Debug, Clone)]
pub struct ChatDelivery {
    /// The stored message.
    pub message: ChatMessage,
    /// Recipient connections the message was queued on.
    pub pushes: usize,
}

/// Relays direct messages between users.
#[derive(Debug)]
pub struct ChatRelay {
    connections: Arc<ConnectionManager>,
    collaborators: Collaborators,
    metrics: Arc<RealtimeMetrics>,
}

impl ChatRelay {
    /// Creates a relay.
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

    /// Persists the message, then pushes it to every live chat connection
    /// of the recipient.
    pub async fn relay(&self, event: &ChatSendEvent) -> AppResult<ChatDelivery> {
        if self
            .collaborators
            .users
            .find_user(event.recipient())
            .await?
            .is_none()
        {
            return Err(AppError::not_found(format!(
                "Recipient {} not found",
                event.recipient()
            )));
        }
        let sender = self
            .collaborators
            .users
            .find_user(event.sender())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Sender {} not found", event.sender())))?;

        let message = self
            .collaborators
            .messages
            .create_message(event.sender(), event.recipient(), event.content())
            .await?;

        let payload = serialize_outbound(&build_chat(&message, &sender))?;
        let pushes = self
            .connections
            .push_to_room(&RoomId::chat(event.recipient()), &payload);
        self.metrics.chat_relayed();

        if pushes == 0 {
            debug!(recipient = %event.recipient(), "Recipient offline, message stored only");
        }
        info!(
            message_id = %message.id,
            sender = %event.sender(),
            recipient = %event.recipient(),
            pushes,
            "Chat message relayed"
        );

        Ok(ChatDelivery { message, pushes })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use agora_core::config::RealtimeConfig;
    use agora_core::error::ErrorKind;
    use agora_core::types::UserId;
    use agora_store::MemoryStore;

    use crate::channel::RoomRegistry;
    use crate::connection::{AuthenticatedUser, ConnectionKind, Frame};

    use super::*;

    fn relay(store: Arc<MemoryStore>) -> (ChatRelay, Arc<ConnectionManager>) {
        let metrics = Arc::new(RealtimeMetrics::new());
        let connections = Arc::new(ConnectionManager::new(
            RealtimeConfig::default(),
            Arc::new(RoomRegistry::new()),
            metrics.clone(),
        ));
        let relay = ChatRelay::new(
            connections.clone(),
            Collaborators::from_backend(store),
            metrics,
        );
        (relay, connections)
    }

    #[tokio::test]
    async fn test_round_trip_without_notification_row() {
        let store = Arc::new(MemoryStore::new());
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");
        let (relay, connections) = relay(store.clone());
        let (_chat, mut rx) = connections.register(
            &AuthenticatedUser::new(bob.id, bob.username()),
            ConnectionKind::Chat,
        );
        let (_notif, mut rx_notif) = connections.register(
            &AuthenticatedUser::new(bob.id, bob.username()),
            ConnectionKind::Notifications,
        );

        let event = ChatSendEvent::new(alice.id, bob.id, "hi").unwrap();
        let delivery = relay.relay(&event).await.unwrap();

        assert_eq!(delivery.pushes, 1);
        assert_eq!(store.message_count().await, 1);
        assert_eq!(store.notification_count(bob.id).await, 0);
        assert!(rx_notif.try_recv().is_err());

        let Some(Frame::Text(raw)) = rx.recv().await else {
            panic!("expected a chat frame");
        };
        let json: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["alert"], "alice sent you a message!");
        assert_eq!(json["message"]["content"], "hi");
        assert_eq!(json["message"]["sender"]["id"], alice.id.to_string());
    }

    #[tokio::test]
    async fn test_unknown_recipient_stores_nothing() {
        let store = Arc::new(MemoryStore::new());
        let alice = store.add_user("alice");
        let (relay, _) = relay(store.clone());

        let event = ChatSendEvent::new(alice.id, UserId::new(), "hi").unwrap();
        let err = relay.relay(&event).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(store.message_count().await, 0);
    }

    #[tokio::test]
    async fn test_offline_recipient_still_stored() {
        let store = Arc::new(MemoryStore::new());
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");
        let (relay, _) = relay(store.clone());

        let delivery = relay
            .relay(&ChatSendEvent::new(alice.id, bob.id, "later").unwrap())
            .await
            .unwrap();
        assert_eq!(delivery.pushes, 0);
        assert_eq!(store.message_count().await, 1);
    }
}
