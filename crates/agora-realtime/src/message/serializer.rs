//! JSON serialization for WebSocket messages.

use agora_core::result::AppResult;

use super::types::{InboundChatMessage, OutboundMessage};

/// Serialize an outbound message
pub fn serialize_outbound(msg: &OutboundMessage) -> AppResult<String> {
    Ok(serde_json::to_string(msg)?)
}

/// Deserialize an inbound chat message from JSON
pub fn deserialize_chat_inbound(text: &str) -> AppResult<InboundChatMessage> {
    Ok(serde_json::from_str(text)?)
}
