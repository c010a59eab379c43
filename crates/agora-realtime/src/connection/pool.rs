//! Connection pool: tracks all active connections indexed by user ID.

use std::sync::Arc;

use dashmap::DashMap;

use agora_core::types::{ConnectionId, UserId};

use super::handle::{ConnectionHandle, ConnectionKind};

/// Thread-safe pool of all active WebSocket connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    /// User ID → connection handles, oldest first.
    by_user: DashMap<UserId, Vec<Arc<ConnectionHandle>>>,
    /// Connection ID → connection handle for direct lookup.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the pool.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle.clone());
        self.by_user.entry(handle.user_id).or_default().push(handle);
    }

    /// Removes a connection from the pool.
    ///
    /// Only one caller ever receives `Some` for a given connection.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        if let Some(mut connections) = self.by_user.get_mut(&handle.user_id) {
            connections.retain(|c| c.id != *conn_id);
        }
        self.by_user
            .remove_if(&handle.user_id, |_, conns| conns.is_empty());
        Some(handle)
    }

    /// Gets all connections for a user, oldest first.
    pub fn get_user_connections(&self, user_id: &UserId) -> Vec<Arc<ConnectionHandle>> {
        self.by_user
            .get(user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Gets a user's connections of one kind, oldest first.
    pub fn get_user_connections_of_kind(
        &self,
        user_id: &UserId,
        kind: ConnectionKind,
    ) -> Vec<Arc<ConnectionHandle>> {
        self.by_user
            .get(user_id)
            .map(|entry| {
                entry
                    .value()
                    .iter()
                    .filter(|c| c.kind == kind)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    /// Returns total number of active connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Returns all connection handles.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Returns all connected user IDs.
    pub fn connected_user_ids(&self) -> Vec<UserId> {
        self.by_user.iter().map(|entry| *entry.key()).collect()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn handle(user: UserId, kind: ConnectionKind) -> Arc<ConnectionHandle> {
        let (tx, _rx) = mpsc::channel(1);
        Arc::new(ConnectionHandle::new(user, "carol".into(), kind, tx))
    }

    #[test]
    fn test_remove_happens_once() {
        let pool = ConnectionPool::new();
        let user = UserId::new();
        let conn = handle(user, ConnectionKind::Chat);
        pool.add(conn.clone());

        assert!(pool.remove(&conn.id).is_some());
        assert!(pool.remove(&conn.id).is_none());
        assert_eq!(pool.connection_count(), 0);
        assert_eq!(pool.user_count(), 0);
    }

    #[test]
    fn test_connections_filtered_by_kind() {
        let pool = ConnectionPool::new();
        let user = UserId::new();
        let first = handle(user, ConnectionKind::Notifications);
        let chat = handle(user, ConnectionKind::Chat);
        let second = handle(user, ConnectionKind::Notifications);
        pool.add(first.clone());
        pool.add(chat.clone());
        pool.add(second.clone());

        let ids: Vec<_> = pool
            .get_user_connections_of_kind(&user, ConnectionKind::Notifications)
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(pool.get_user_connections(&user).len(), 3);
        assert_eq!(pool.user_count(), 1);
    }
}
