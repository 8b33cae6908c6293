//! Chat conversations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_commerce::ChatId;

use crate::message::{Message, Role};

/// Title used when a chat starts without text.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Characters of the first message kept as the title.
pub const DEFAULT_TITLE_MAX_CHARS: usize = 50;

/// An ordered conversation between the user and the responder.
///
/// Messages are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: ChatId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Chat {
    /// Start a chat titled after its first message.
    pub fn new(first_message: &str, title_max_chars: usize) -> Self {
        Self {
            id: ChatId::generate(),
            title: derive_title(first_message, title_max_chars),
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages sent by the user.
    pub fn user_message_count(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::User).count()
    }
}

/// Truncate `text` to `max_chars` characters, or fall back to
/// [`DEFAULT_TITLE`] when it is blank.
pub fn derive_title(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    text.chars().take(max_chars).collect()
}
