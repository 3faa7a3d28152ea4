//! Display labels for conversations and messages.

use chrono::{DateTime, Utc};

use super::types::{Conversation, ConversationId, Message, MessageRole};
use crate::time_format::format_time;

/// Title shown for a conversation without one.
pub const UNTITLED: &str = "Untitled Conversation";

/// Header shown when no conversation is displayed.
pub const NEW_CONVERSATION: &str = "New Conversation";

/// Title of a conversation, or the untitled placeholder.
#[must_use]
pub fn display_title(conversation: &Conversation) -> &str {
    conversation
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED)
}

/// Header for the displayed conversation, if any.
#[must_use]
pub fn header_title(conversation: Option<&Conversation>) -> &str {
    conversation.map_or(NEW_CONVERSATION, display_title)
}

/// "1 message", "3 messages".
#[must_use]
pub fn message_count_label(conversation: &Conversation) -> String {
    match conversation.message_count() {
        1 => "1 message".to_string(),
        n => format!("{n} messages"),
    }
}

/// Name shown next to a message.
#[must_use]
pub const fn sender_label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "You",
        MessageRole::Assistant => "Gemini AI",
    }
}

/// One line of a rendered transcript.
#[must_use]
pub fn message_line(message: &Message, now: DateTime<Utc>) -> String {
    format!(
        "[{}] {}: {}",
        format_time(message.display_time(now), now),
        sender_label(message.role),
        message.content
    )
}

/// A row of the conversation list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarEntry {
    /// Conversation addressed by the row.
    pub id: ConversationId,
    /// Title or placeholder.
    pub title: String,
    /// Relative start time.
    pub started: String,
}

impl SidebarEntry {
    /// Build a row for `conversation`.
    #[must_use]
    pub fn new(conversation: &Conversation, now: DateTime<Utc>) -> Self {
        Self {
            id: conversation.id.clone(),
            title: display_title(conversation).to_string(),
            started: format_time(conversation.start_time, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    fn conversation(title: Option<&str>, messages: usize) -> Conversation {
        Conversation {
            id: ConversationId::from("c1"),
            title: title.map(str::to_string),
            start_time: now() - Duration::hours(2),
            model: None,
            messages: (0..messages)
                .map(|i| Message {
                    id: format!("m{i}"),
                    role: MessageRole::User,
                    content: "hi".to_string(),
                    created_at: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_titles() {
        assert_eq!(display_title(&conversation(Some("Trip plans"), 0)), "Trip plans");
        assert_eq!(display_title(&conversation(Some("  "), 0)), UNTITLED);
        assert_eq!(display_title(&conversation(None, 0)), UNTITLED);
        assert_eq!(header_title(None), NEW_CONVERSATION);
    }

    #[test]
    fn test_message_count_label() {
        assert_eq!(message_count_label(&conversation(None, 0)), "0 messages");
        assert_eq!(message_count_label(&conversation(None, 1)), "1 message");
        assert_eq!(message_count_label(&conversation(None, 3)), "3 messages");
    }

    #[test]
    fn test_message_line_uses_now_fallback() {
        let now = now();
        let message = Message {
            id: "m".to_string(),
            role: MessageRole::Assistant,
            content: "**bold**".to_string(),
            created_at: None,
        };
        assert_eq!(message_line(&message, now), "[Just now] Gemini AI: **bold**");
    }

    #[test]
    fn test_sidebar_entry() {
        let entry = SidebarEntry::new(&conversation(None, 2), now());
        assert_eq!(entry.title, UNTITLED);
        assert_eq!(entry.started, "2h ago");
    }
}
