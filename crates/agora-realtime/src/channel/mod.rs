//! Rooms: named groups of live connection handles.

pub mod registry;
pub mod room;
pub mod subscription;
pub mod types;

pub use registry::RoomRegistry;
pub use types::{RoomId, RoomKind};
