//! WebSocket message types, serialization, and validation.

pub mod builder;
pub mod serializer;
pub mod types;
pub mod validator;

pub use types::{
    ChatMessagePayload, InboundChatMessage, NotificationPayload, NotificationResult,
    OutboundMessage,
};
