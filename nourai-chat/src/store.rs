//! Chat-history types and the storage trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A conversation thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chat {
    /// Unique chat identifier.
    pub id: String,
    /// User-visible chat title.
    pub title: String,
    /// When the chat was created.
    pub created_at: DateTime<Utc>,
    /// When the chat last received a message or title change.
    pub updated_at: DateTime<Utc>,
}

/// The author of a stored message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// The wire/storage name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// One stored message.
///
/// A single record type covers both roles: `citations` and `sources` stay
/// `None` for user messages and are optionally attached to assistant
/// messages. Persistence is one code path regardless of which optional
/// payloads are present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Unique message identifier.
    pub id: String,
    /// The chat this message belongs to.
    pub chat_id: String,
    /// Message author.
    pub role: MessageRole,
    /// Message text.
    pub content: String,
    /// Display citations attached to an assistant message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Value>>,
    /// Source attributions attached to an assistant message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Value>>,
    /// When the message was stored.
    pub timestamp: DateTime<Utc>,
}

/// A message to append, before the store assigns id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub role: MessageRole,
    pub content: String,
    pub citations: Option<Vec<Value>>,
    pub sources: Option<Vec<Value>>,
}

impl NewMessage {
    /// A plain user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into(), citations: None, sources: None }
    }

    /// An assistant message, optionally carrying citations and sources.
    pub fn assistant(
        content: impl Into<String>,
        citations: Option<Vec<Value>>,
        sources: Option<Vec<Value>>,
    ) -> Self {
        Self { role: MessageRole::Assistant, content: content.into(), citations, sources }
    }
}

/// Keyed CRUD storage for conversation history.
///
/// Implementations must order [`list_chats`](ChatStore::list_chats) by most
/// recent update and [`messages`](ChatStore::messages) by storage time
/// ascending. Appending a message touches the parent chat's `updated_at`.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Create a new chat thread and return its id.
    async fn create_chat(&self, title: &str) -> Result<String>;

    /// List chats, most recently updated first, at most `limit`.
    async fn list_chats(&self, limit: usize) -> Result<Vec<Chat>>;

    /// The title of a chat, or `None` if the chat does not exist.
    async fn chat_title(&self, chat_id: &str) -> Result<Option<String>>;

    /// Rename a chat, touching its `updated_at`.
    ///
    /// Returns [`ChatError::NotFound`](crate::ChatError) for an unknown chat.
    async fn update_title(&self, chat_id: &str, title: &str) -> Result<()>;

    /// All messages of a chat, oldest first.
    ///
    /// Returns [`ChatError::NotFound`](crate::ChatError) for an unknown chat.
    async fn messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>>;

    /// Append a message and return its id.
    ///
    /// Returns [`ChatError::NotFound`](crate::ChatError) for an unknown chat.
    async fn append_message(&self, chat_id: &str, message: NewMessage) -> Result<String>;

    /// Delete a chat and all its messages. Returns whether a chat existed.
    async fn delete_chat(&self, chat_id: &str) -> Result<bool>;
}
