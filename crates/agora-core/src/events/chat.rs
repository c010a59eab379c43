//! Direct-message events.

use serde::Serialize;

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::UserId;

/// A direct message a connected user asked to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSendEvent {
    sender: UserId,
    recipient: UserId,
    content: String,
}

impl ChatSendEvent {
    /// Builds the event; blank content and messages to oneself are rejected.
    pub fn new(sender: UserId, recipient: UserId, content: impl Into<String>) -> AppResult<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(AppError::validation("Message content must not be empty"));
        }
        if sender == recipient {
            return Err(AppError::validation("Cannot send a message to yourself"));
        }
        Ok(Self {
            sender,
            recipient,
            content,
        })
    }

    /// The sending user.
    pub fn sender(&self) -> UserId {
        self.sender
    }

    /// The receiving user.
    pub fn recipient(&self) -> UserId {
        self.recipient
    }

    /// Message body.
    pub fn content(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_event() {
        let (a, b) = (UserId::new(), UserId::new());
        let event = ChatSendEvent::new(a, b, "hi").unwrap();
        assert_eq!(event.sender(), a);
        assert_eq!(event.recipient(), b);
        assert_eq!(event.content(), "hi");
    }

    #[test]
    fn test_whitespace_content_rejected() {
        assert!(ChatSendEvent::new(UserId::new(), UserId::new(), " \n").is_err());
    }

    #[test]
    fn test_message_to_self_rejected() {
        let a = UserId::new();
        assert!(ChatSendEvent::new(a, a, "hello me").is_err());
    }
}
