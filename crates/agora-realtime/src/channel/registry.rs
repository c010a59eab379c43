//! Room registry: manages all rooms and their memberships.

use dashmap::DashMap;

use agora_core::types::ConnectionId;

use super::room::Room;
use super::subscription::MembershipIndex;
use super::types::RoomId;

/// Registry of every non-empty room in the process.
///
/// Per-room mutation happens under the map's shard lock, so `join`,
/// `leave` and `members` are safe from independent tasks. Empty rooms
/// are removed with a conditional remove that re-checks emptiness under
/// the same lock, which keeps a concurrent `join` from being lost.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    /// Room → members.
    rooms: DashMap<RoomId, Room>,
    /// Connection → rooms.
    memberships: MembershipIndex,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to a room. Returns `false` if it was already a member.
    pub fn join(&self, room: RoomId, conn_id: ConnectionId) -> bool {
        let added = self
            .rooms
            .entry(room)
            .or_insert_with(|| Room::new(room))
            .join(conn_id);
        if added {
            self.memberships.add(conn_id, room);
        }
        added
    }

    /// Removes a connection from a room. Returns `false` if it was not a member.
    pub fn leave(&self, room: RoomId, conn_id: ConnectionId) -> bool {
        let removed = self
            .rooms
            .get_mut(&room)
            .map(|mut r| r.leave(conn_id))
            .unwrap_or(false);
        self.rooms.remove_if(&room, |_, r| r.is_empty());
        if removed {
            self.memberships.remove(conn_id, &room);
        }
        removed
    }

    /// Removes a connection from every room it joined, returning those rooms.
    pub fn leave_all(&self, conn_id: ConnectionId) -> Vec<RoomId> {
        let rooms: Vec<RoomId> = self.memberships.remove_all(conn_id).into_iter().collect();
        for room in &rooms {
            if let Some(mut r) = self.rooms.get_mut(room) {
                r.leave(conn_id);
            }
            self.rooms.remove_if(room, |_, r| r.is_empty());
        }
        rooms
    }

    /// Snapshot of a room's members. Later mutation does not affect the result.
    pub fn members(&self, room: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|r| r.snapshot())
            .unwrap_or_default()
    }

    /// Whether a connection is a member of a room.
    pub fn is_member(&self, room: &RoomId, conn_id: ConnectionId) -> bool {
        self.rooms
            .get(room)
            .map(|r| r.members.contains(&conn_id))
            .unwrap_or(false)
    }

    /// Rooms a connection has joined.
    pub fn rooms_of(&self, conn_id: ConnectionId) -> Vec<RoomId> {
        self.memberships.rooms_of(conn_id).into_iter().collect()
    }

    /// Number of rooms a connection has joined.
    pub fn membership_count(&self, conn_id: ConnectionId) -> usize {
        self.memberships.count(conn_id)
    }

    /// Member count of a room.
    pub fn member_count(&self, room: &RoomId) -> usize {
        self.rooms.get(room).map(|r| r.member_count()).unwrap_or(0)
    }

    /// Number of non-empty rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
