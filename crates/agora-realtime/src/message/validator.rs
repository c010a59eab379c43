//! Message validation rules.

use validator::Validate;

use agora_core::error::AppError;
use agora_core::result::AppResult;

use super::serializer::deserialize_chat_inbound;
use super::types::InboundChatMessage;

/// Validates a raw inbound frame before parsing.
pub fn validate_inbound(raw: &str, max_bytes: usize) -> AppResult<()> {
    if raw.len() > max_bytes {
        return Err(AppError::validation(format!(
            "Message exceeds maximum size of {max_bytes} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty message"));
    }

    Ok(())
}

/// Parses and validates an inbound chat frame.
pub fn parse_chat_inbound(raw: &str, max_bytes: usize) -> AppResult<InboundChatMessage> {
    validate_inbound(raw, max_bytes)?;
    let msg = deserialize_chat_inbound(raw)?;
    msg.validate()?;
    Ok(msg)
}

#[cfg(test)]
mod tests {
    use agora_core::types::UserId;

    use super::*;

    #[test]
    fn test_rejects_oversized_and_blank() {
        assert!(validate_inbound(&"x".repeat(11), 10).unwrap_err().is_validation());
        assert!(validate_inbound("   ", 10).unwrap_err().is_validation());
        assert!(validate_inbound("{}", 10).is_ok());
    }

    #[test]
    fn test_empty_content_is_invalid() {
        let raw = format!(r#"{{"recipient_id":"{}","content":""}}"#, UserId::new());
        assert!(parse_chat_inbound(&raw, 1024).unwrap_err().is_validation());
    }
}
