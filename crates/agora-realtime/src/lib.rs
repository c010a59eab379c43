//! # agora-realtime
//!
//! Real-time fan-out engine for Agora. Provides:
//!
//! - A room registry mapping per-user notification and chat rooms to live
//!   connection handles
//! - Connection pool, handles, heartbeat, and the per-connection lifecycle
//!   state machine (`Connecting → Open → Closed`)
//! - Notification dispatch: durable write first, then best-effort push to
//!   every live connection of every resolved recipient
//! - Direct-message relay over the chat rooms
//! - A bounded queue bridging request handlers to the dispatch worker

pub mod bridge;
pub mod channel;
pub mod chat;
pub mod connection;
pub mod message;
pub mod metrics;
pub mod notification;
pub mod server;

pub use bridge::{EventBridge, NotificationSink};
pub use channel::{RoomId, RoomKind, RoomRegistry};
pub use chat::ChatRelay;
pub use connection::heartbeat::{HeartbeatConfig, run_heartbeat};
pub use connection::{
    AuthenticatedUser, ConnectionKind, ConnectionLifecycle, ConnectionManager, ConnectionState,
    Frame, IdentityResolver,
};
pub use metrics::{MetricsSnapshot, RealtimeMetrics};
pub use notification::{DeliveryOutcome, NotificationDispatcher, RecipientOutcome, RecipientStatus};
pub use server::RealtimeEngine;
