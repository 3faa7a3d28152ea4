//! Conversation and message types shared by the store, the controller and the backend.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque backend-assigned conversation identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Wrap an identifier string.
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the inner string.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    #[inline]
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ConversationId {
    #[inline]
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for ConversationId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error returned when parsing an empty conversation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyConversationId;

impl fmt::Display for EmptyConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("conversation id must not be empty")
    }
}

impl std::error::Error for EmptyConversationId {}

impl FromStr for ConversationId {
    type Err = EmptyConversationId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(EmptyConversationId);
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Author of a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Reply generated by the backend.
    Assistant,
}

impl MessageRole {
    /// Stable wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(value.to_string()),
        }
    }
}

/// A single chat message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Identifier, unique within its conversation.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Who wrote the message.
    pub role: MessageRole,
    /// Raw text, possibly containing markup.
    pub content: String,
    /// Creation timestamp, if the backend sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Timestamp to display, falling back to `now` when the backend omitted it.
    ///
    /// The fallback is never stored back into the message.
    #[must_use]
    pub fn display_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.created_at.unwrap_or(now)
    }

    /// Whether the message was written by the user.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

/// A conversation as returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Backend-assigned identifier.
    #[serde(rename = "_id", alias = "id")]
    pub id: ConversationId,
    /// Optional display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// When the conversation was started.
    pub start_time: DateTime<Utc>,
    /// Model the conversation was created with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Messages, oldest first.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Most recent message, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages in the conversation.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_accepts_backend_field_names() {
        let raw = serde_json::json!({
            "_id": "abc123",
            "title": "Greetings",
            "startTime": "2024-05-01T10:00:00Z",
            "messages": [
                {"_id": "m1", "role": "user", "content": "hi", "createdAt": "2024-05-01T10:00:01Z"},
                {"_id": "m2", "role": "assistant", "content": "**hello**"}
            ],
            "__v": 0
        });

        let conversation: Conversation = serde_json::from_value(raw).expect("parse");
        assert_eq!(conversation.id.as_str(), "abc123");
        assert_eq!(conversation.title.as_deref(), Some("Greetings"));
        assert_eq!(conversation.message_count(), 2);
        assert_eq!(conversation.messages[0].role, MessageRole::User);
        assert!(conversation.messages[1].created_at.is_none());
        assert_eq!(conversation.messages[1].content, "**hello**");
    }

    #[test]
    fn test_conversation_accepts_plain_id() {
        let raw = serde_json::json!({
            "id": "xyz",
            "startTime": "2024-05-01T10:00:00Z"
        });

        let conversation: Conversation = serde_json::from_value(raw).expect("parse");
        assert_eq!(conversation.id, ConversationId::from("xyz"));
        assert!(conversation.messages.is_empty());
        assert!(conversation.title.is_none());
    }

    #[test]
    fn test_display_time_fallback() {
        let now = Utc::now();
        let message = Message {
            id: "m1".to_string(),
            role: MessageRole::Assistant,
            content: "hi".to_string(),
            created_at: None,
        };
        assert_eq!(message.display_time(now), now);
        assert!(message.created_at.is_none());
    }

    #[test]
    fn test_id_parse_rejects_blank() {
        assert!(" ".parse::<ConversationId>().is_err());
        assert_eq!(
            " abc ".parse::<ConversationId>().expect("parse").as_str(),
            "abc"
        );
    }

    #[test]
    fn test_role_round_trip_str() {
        assert_eq!("user".parse::<MessageRole>(), Ok(MessageRole::User));
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
        assert!("system".parse::<MessageRole>().is_err());
    }
}
