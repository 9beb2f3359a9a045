//! Error types for the `nourai-chat` crate.

use thiserror::Error;

/// Errors that can occur in chat-history operations.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The referenced chat does not exist.
    #[error("Chat not found: {0}")]
    NotFound(String),

    /// A message payload could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A convenience result type for chat-history operations.
pub type Result<T> = std::result::Result<T, ChatError>;
