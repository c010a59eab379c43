//! WebSocket connection management: handles, pool, manager, lifecycle, heartbeat.

pub mod authenticator;
pub mod handle;
pub mod heartbeat;
pub mod lifecycle;
pub mod manager;
pub mod pool;

pub use authenticator::{AuthenticatedUser, IdentityResolver};
pub use handle::{ConnectionHandle, ConnectionKind, Frame};
pub use lifecycle::{ConnectionLifecycle, ConnectionState};
pub use manager::ConnectionManager;
