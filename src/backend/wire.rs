//! Request and response bodies for the conversation backend.
//!
//! Create answers `{ "conversation": ... }` while update answers the bare
//! conversation. The asymmetry is kept as-is: each envelope has its own type.

use serde::{Deserialize, Serialize};

use crate::session::types::Conversation;

/// Body of a create or update request.
#[derive(Debug, Serialize)]
pub struct PromptBody<'a> {
    /// Text of the user message.
    pub prompt: &'a str,
    /// Model of the conversation.
    pub model: &'a str,
}

/// Response envelope of `POST /api/conversation`.
#[derive(Debug, Deserialize)]
pub struct CreatedConversation {
    /// The newly created conversation.
    pub conversation: Conversation,
}

/// Response of `GET /api/conversation`, either bare or wrapped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ConversationList {
    /// A bare JSON array.
    Bare(Vec<Conversation>),
    /// `{ "conversations": [...] }`.
    Wrapped {
        /// The conversations.
        conversations: Vec<Conversation>,
    },
}

impl ConversationList {
    /// Unwrap into the list of conversations.
    #[must_use]
    pub fn into_vec(self) -> Vec<Conversation> {
        match self {
            Self::Bare(conversations) | Self::Wrapped { conversations } => conversations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_body_carries_model() {
        let body = PromptBody {
            prompt: "hello",
            model: "gemini-1.5-pro",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"prompt": "hello", "model": "gemini-1.5-pro"})
        );
    }

    #[test]
    fn test_list_accepts_both_shapes() {
        let item = serde_json::json!({"_id": "a", "startTime": "2024-01-01T00:00:00Z"});

        let bare: ConversationList =
            serde_json::from_value(serde_json::json!([item.clone()])).unwrap();
        assert_eq!(bare.into_vec().len(), 1);

        let wrapped: ConversationList =
            serde_json::from_value(serde_json::json!({"conversations": [item]})).unwrap();
        assert_eq!(wrapped.into_vec()[0].id.as_str(), "a");
    }
}
