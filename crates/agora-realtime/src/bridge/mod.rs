//! Bridges request handlers to the asynchronous dispatch path.

pub mod event_bridge;
pub mod sink;

pub use event_bridge::{EventBridge, spawn_worker};
pub use sink::NotificationSink;
