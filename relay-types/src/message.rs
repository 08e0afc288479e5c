//! Chat message types.

use serde::{Deserialize, Serialize};

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A human user.
    User,
    /// The assistant reply produced by the relay.
    Bot,
}

/// A single chat message.
///
/// Produced by the caller (`role: user`) and by the relay (`role: bot`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The message author.
    pub role: Role,
    /// The message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a bot message.
    #[must_use]
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
        }
    }
}
