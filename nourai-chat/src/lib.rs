//! Conversation history persistence for the Nourai nutrition assistant.
//!
//! Ordinary keyed CRUD storage for chat threads and their messages: create,
//! list, append, delete. The [`ChatStore`] trait abstracts the backend;
//! [`InMemoryChatStore`] serves development and tests, and the `sqlite`
//! feature adds [`SqliteChatStore`] for durable storage.
//!
//! The query core never writes here itself — persistence is a best-effort
//! side effect of the transport layer, and a storage failure must never fail
//! an already-computed answer.

pub mod error;
pub mod memory;
pub mod store;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::{ChatError, Result};
pub use memory::InMemoryChatStore;
pub use store::{Chat, ChatMessage, ChatStore, MessageRole, NewMessage};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteChatStore;
