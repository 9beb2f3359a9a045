//! In-memory chat store for development and testing.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::store::{Chat, ChatMessage, ChatStore, NewMessage};

struct ChatEntry {
    chat: Chat,
    messages: Vec<ChatMessage>,
}

/// An in-memory [`ChatStore`] backed by a `HashMap` behind an async lock.
///
/// Message order within a chat is insertion order, which matches the
/// timestamp-ascending contract since timestamps are assigned on append.
#[derive(Default)]
pub struct InMemoryChatStore {
    chats: RwLock<HashMap<String, ChatEntry>>,
}

impl InMemoryChatStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn create_chat(&self, title: &str) -> Result<String> {
        let id = format!("chat_{}", Uuid::new_v4());
        let now = Utc::now();
        let chat =
            Chat { id: id.clone(), title: title.to_string(), created_at: now, updated_at: now };

        let mut chats = self.chats.write().await;
        chats.insert(id.clone(), ChatEntry { chat, messages: Vec::new() });
        debug!(chat_id = %id, "created chat");
        Ok(id)
    }

    async fn list_chats(&self, limit: usize) -> Result<Vec<Chat>> {
        let chats = self.chats.read().await;
        let mut listed: Vec<Chat> = chats.values().map(|entry| entry.chat.clone()).collect();
        listed.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        listed.truncate(limit);
        Ok(listed)
    }

    async fn chat_title(&self, chat_id: &str) -> Result<Option<String>> {
        let chats = self.chats.read().await;
        Ok(chats.get(chat_id).map(|entry| entry.chat.title.clone()))
    }

    async fn update_title(&self, chat_id: &str, title: &str) -> Result<()> {
        let mut chats = self.chats.write().await;
        let entry =
            chats.get_mut(chat_id).ok_or_else(|| ChatError::NotFound(chat_id.to_string()))?;
        entry.chat.title = title.to_string();
        entry.chat.updated_at = Utc::now();
        Ok(())
    }

    async fn messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>> {
        let chats = self.chats.read().await;
        let entry = chats.get(chat_id).ok_or_else(|| ChatError::NotFound(chat_id.to_string()))?;
        Ok(entry.messages.clone())
    }

    async fn append_message(&self, chat_id: &str, message: NewMessage) -> Result<String> {
        let mut chats = self.chats.write().await;
        let entry =
            chats.get_mut(chat_id).ok_or_else(|| ChatError::NotFound(chat_id.to_string()))?;

        let id = format!("msg_{}", Uuid::new_v4());
        let now = Utc::now();
        entry.messages.push(ChatMessage {
            id: id.clone(),
            chat_id: chat_id.to_string(),
            role: message.role,
            content: message.content,
            citations: message.citations,
            sources: message.sources,
            timestamp: now,
        });
        entry.chat.updated_at = now;
        Ok(id)
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<bool> {
        let mut chats = self.chats.write().await;
        let existed = chats.remove(chat_id).is_some();
        debug!(chat_id, existed, "deleted chat");
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MessageRole;

    #[tokio::test]
    async fn created_chat_is_listed() {
        let store = InMemoryChatStore::new();
        let id = store.create_chat("Plan semanal").await.unwrap();

        let chats = store.list_chats(10).await.unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].id, id);
        assert_eq!(chats[0].title, "Plan semanal");
    }

    #[tokio::test]
    async fn appending_touches_updated_at_and_orders_listing() {
        let store = InMemoryChatStore::new();
        let first = store.create_chat("primero").await.unwrap();
        let second = store.create_chat("segundo").await.unwrap();

        store.append_message(&first, NewMessage::user("hola")).await.unwrap();

        let chats = store.list_chats(10).await.unwrap();
        assert_eq!(chats[0].id, first);
        assert_eq!(chats[1].id, second);
    }

    #[tokio::test]
    async fn messages_keep_append_order_and_payloads() {
        let store = InMemoryChatStore::new();
        let id = store.create_chat("chat").await.unwrap();

        store.append_message(&id, NewMessage::user("¿qué debería comer?")).await.unwrap();
        let sources = vec![serde_json::json!({"title": "Guía FAO", "similarity": "82.3%"})];
        store
            .append_message(
                &id,
                NewMessage::assistant("Una dieta variada.", None, Some(sources.clone())),
            )
            .await
            .unwrap();

        let messages = store.messages(&id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert!(messages[0].sources.is_none());
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].sources.as_deref(), Some(sources.as_slice()));
    }

    #[tokio::test]
    async fn unknown_chat_is_not_found() {
        let store = InMemoryChatStore::new();
        let result = store.append_message("chat_missing", NewMessage::user("hola")).await;
        assert!(matches!(result, Err(ChatError::NotFound(_))));
        assert!(matches!(store.messages("chat_missing").await, Err(ChatError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_chat_and_reports_existence() {
        let store = InMemoryChatStore::new();
        let id = store.create_chat("chat").await.unwrap();
        assert!(store.delete_chat(&id).await.unwrap());
        assert!(!store.delete_chat(&id).await.unwrap());
        assert!(store.chat_title(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let store = InMemoryChatStore::new();
        for i in 0..5 {
            store.create_chat(&format!("chat {i}")).await.unwrap();
        }
        assert_eq!(store.list_chats(3).await.unwrap().len(), 3);
    }
}
