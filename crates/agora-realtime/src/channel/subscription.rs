//! Reverse index of the rooms each connection has joined.

use std::collections::HashSet;

use dashmap::DashMap;

use agora_core::types::ConnectionId;

use super::types::RoomId;

/// Connection → rooms reverse index, used to tear a connection down in one call.
#[derive(Debug, Default)]
pub struct MembershipIndex {
    conn_to_rooms: DashMap<ConnectionId, HashSet<RoomId>>,
}

impl MembershipIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a membership.
    pub fn add(&self, conn_id: ConnectionId, room: RoomId) {
        self.conn_to_rooms.entry(conn_id).or_default().insert(room);
    }

    /// Removes a membership, dropping the entry once the connection has no rooms.
    pub fn remove(&self, conn_id: ConnectionId, room: &RoomId) {
        if let Some(mut rooms) = self.conn_to_rooms.get_mut(&conn_id) {
            rooms.remove(room);
        }
        self.conn_to_rooms
            .remove_if(&conn_id, |_, rooms| rooms.is_empty());
    }

    /// Rooms a connection has joined.
    pub fn rooms_of(&self, conn_id: ConnectionId) -> HashSet<RoomId> {
        self.conn_to_rooms
            .get(&conn_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Number of rooms a connection has joined.
    pub fn count(&self, conn_id: ConnectionId) -> usize {
        self.conn_to_rooms
            .get(&conn_id)
            .map(|entry| entry.value().len())
            .unwrap_or(0)
    }

    /// Removes and returns every membership of a connection.
    pub fn remove_all(&self, conn_id: ConnectionId) -> HashSet<RoomId> {
        self.conn_to_rooms
            .remove(&conn_id)
            .map(|(_, rooms)| rooms)
            .unwrap_or_default()
    }
}
