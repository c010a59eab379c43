//! Domain events consumed by the real-time fan-out layer.
//!
//! The set is closed: every event is one of the variants below and is
//! validated when it is constructed, so the dispatcher never has to
//! inspect loosely-typed payloads.

pub mod chat;
pub mod notification;

pub use chat::ChatSendEvent;
pub use notification::{BroadcastEvent, DirectedEvent, NotificationEvent, NotificationKind};
