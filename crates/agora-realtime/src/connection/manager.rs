//! Connection manager: registration, teardown, and room pushes.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use agora_core::config::RealtimeConfig;
use agora_core::types::{ConnectionId, UserId};

use crate::channel::{RoomId, RoomRegistry};
use crate::metrics::RealtimeMetrics;

use super::authenticator::AuthenticatedUser;
use super::handle::{ConnectionHandle, ConnectionKind, Frame};
use super::pool::ConnectionPool;

/// Manages all active WebSocket connections.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Connection pool.
    pool: ConnectionPool,
    /// Room registry.
    rooms: Arc<RoomRegistry>,
    /// Metrics.
    metrics: Arc<RealtimeMetrics>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(
        config: RealtimeConfig,
        rooms: Arc<RoomRegistry>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            pool: ConnectionPool::new(),
            rooms,
            metrics,
            config,
        }
    }

    /// Registers an authenticated connection and joins its rooms.
    ///
    /// Returns the connection handle and the receiver the socket writer drains.
    pub fn register(
        &self,
        user: &AuthenticatedUser,
        kind: ConnectionKind,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(
            user.user_id,
            user.username.clone(),
            kind,
            tx,
        ));

        let existing = self.pool.get_user_connections_of_kind(&user.user_id, kind);
        let max = self.config.max_connections_per_user.max(1);
        if existing.len() >= max {
            let excess = existing.len() + 1 - max;
            warn!(
                user_id = %user.user_id,
                count = existing.len(),
                max,
                "User at max connections, evicting oldest"
            );
            for oldest in existing.iter().take(excess) {
                if self.unregister(&oldest.id) {
                    self.metrics.connection_evicted();
                }
            }
        }

        self.pool.add(handle.clone());
        let rooms = kind.rooms_for(user.user_id);
        for room in &rooms {
            self.rooms.join(*room, handle.id);
        }
        // Evicted while joining: teardown may have missed the late joins.
        if !handle.is_alive() {
            self.rooms.leave_all(handle.id);
        }
        self.metrics.connection_opened();

        info!(
            conn_id = %handle.id,
            user_id = %user.user_id,
            kind = ?kind,
            rooms = rooms.len(),
            "WebSocket connection registered"
        );

        (handle, rx)
    }

    /// Tears a connection down: mark closed, remove from the pool, leave every room.
    ///
    /// Runs at most once per connection; later calls return `false`.
    pub fn unregister(&self, conn_id: &ConnectionId) -> bool {
        let Some(handle) = self.pool.get(conn_id) else {
            return false;
        };
        if !handle.mark_closed() {
            return false;
        }
        self.pool.remove(conn_id);
        let left = self.rooms.leave_all(*conn_id);
        self.metrics.connection_closed();

        info!(
            conn_id = %conn_id,
            user_id = %handle.user_id,
            rooms = left.len(),
            "WebSocket connection unregistered"
        );
        true
    }

    /// Pushes a serialized payload to every live member of a room.
    ///
    /// Returns the number of connections the payload was queued on.
    /// Members torn down since the snapshot are skipped silently.
    pub fn push_to_room(&self, room: &RoomId, payload: &str) -> usize {
        let members = self.rooms.members(room);
        let mut sent = 0usize;
        for conn_id in &members {
            let Some(handle) = self.pool.get(conn_id) else {
                debug!(conn_id = %conn_id, room = %room, "Member already gone, skipping push");
                continue;
            };
            if handle.send(Frame::Text(payload.to_owned())) {
                sent += 1;
            } else {
                debug!(conn_id = %conn_id, room = %room, "Push not queued");
                self.metrics.push_dropped();
            }
        }
        self.metrics.pushes_sent(sent as u64);
        sent
    }

    /// Closes all connections.
    pub fn close_all(&self) -> usize {
        let closed = self
            .pool
            .all_connections()
            .iter()
            .filter(|conn| self.unregister(&conn.id))
            .count();
        info!(count = closed, "All connections closed");
        closed
    }

    /// Looks up a live connection.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.pool.get(conn_id)
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Returns the number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }

    /// Returns all connected user IDs.
    pub fn connected_user_ids(&self) -> Vec<UserId> {
        self.pool.connected_user_ids()
    }

    /// Checks if a user is currently connected.
    pub fn is_user_connected(&self, user_id: &UserId) -> bool {
        !self.pool.get_user_connections(user_id).is_empty()
    }

    /// Room registry shared with the dispatcher.
    pub fn rooms(&self) -> &Arc<RoomRegistry> {
        &self.rooms
    }

    /// Engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(max: usize) -> ConnectionManager {
        let config = RealtimeConfig {
            max_connections_per_user: max,
            ..RealtimeConfig::default()
        };
        ConnectionManager::new(
            config,
            Arc::new(RoomRegistry::new()),
            Arc::new(RealtimeMetrics::new()),
        )
    }

    fn user(name: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(), name)
    }

    #[tokio::test]
    async fn test_register_joins_kind_rooms() {
        let manager = manager(5);
        let bob = user("bob");

        let (notif, _rx1) = manager.register(&bob, ConnectionKind::Notifications);
        let (chat, _rx2) = manager.register(&bob, ConnectionKind::Chat);

        assert_eq!(
            manager.rooms().rooms_of(notif.id),
            vec![RoomId::notifications(bob.user_id)]
        );
        assert_eq!(manager.rooms().rooms_of(chat.id), vec![RoomId::chat(bob.user_id)]);
        assert_eq!(manager.connection_count(), 2);
        assert_eq!(manager.user_count(), 1);
    }

    #[tokio::test]
    async fn test_unregister_runs_once() {
        let manager = manager(5);
        let bob = user("bob");
        let (handle, _rx) = manager.register(&bob, ConnectionKind::Notifications);

        assert!(manager.unregister(&handle.id));
        assert!(!manager.unregister(&handle.id));
        assert!(!handle.is_alive());
        assert!(manager.rooms().rooms_of(handle.id).is_empty());
        assert_eq!(manager.rooms().room_count(), 0);
        assert!(!manager.is_user_connected(&bob.user_id));
    }

    #[tokio::test]
    async fn test_push_reaches_every_member() {
        let manager = manager(5);
        let bob = user("bob");
        let (_a, mut rx_a) = manager.register(&bob, ConnectionKind::Notifications);
        let (_b, mut rx_b) = manager.register(&bob, ConnectionKind::Notifications);
        let (_c, mut rx_chat) = manager.register(&bob, ConnectionKind::Chat);

        let sent = manager.push_to_room(&RoomId::notifications(bob.user_id), "{}");
        assert_eq!(sent, 2);
        assert_eq!(rx_a.recv().await, Some(Frame::Text("{}".into())));
        assert_eq!(rx_b.recv().await, Some(Frame::Text("{}".into())));
        assert!(rx_chat.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_push_skips_closed_writer() {
        let manager = manager(5);
        let bob = user("bob");
        let (_dead, rx_dead) = manager.register(&bob, ConnectionKind::Notifications);
        let (_live, mut rx_live) = manager.register(&bob, ConnectionKind::Notifications);
        drop(rx_dead);

        let sent = manager.push_to_room(&RoomId::notifications(bob.user_id), "x");
        assert_eq!(sent, 1);
        assert_eq!(rx_live.recv().await, Some(Frame::Text("x".into())));
    }

    #[tokio::test]
    async fn test_oldest_connection_evicted() {
        let manager = manager(2);
        let bob = user("bob");
        let (first, _r1) = manager.register(&bob, ConnectionKind::Chat);
        let (second, _r2) = manager.register(&bob, ConnectionKind::Chat);
        let (third, _r3) = manager.register(&bob, ConnectionKind::Chat);

        assert!(!first.is_alive());
        assert!(first.cancellation().is_cancelled());
        assert!(manager.get(&first.id).is_none());
        assert!(manager.rooms().rooms_of(first.id).is_empty());
        assert!(second.is_alive() && third.is_alive());
        assert_eq!(manager.rooms().member_count(&RoomId::chat(bob.user_id)), 2);
    }

    #[tokio::test]
    async fn test_close_all_tears_everything_down() {
        let manager = manager(5);
        let (a, _ra) = manager.register(&user("a"), ConnectionKind::Chat);
        let (b, _rb) = manager.register(&user("b"), ConnectionKind::Notifications);

        assert_eq!(manager.close_all(), 2);
        assert!(!a.is_alive() && !b.is_alive());
        assert_eq!(manager.connection_count(), 0);
        assert_eq!(manager.rooms().room_count(), 0);
    }
}
