//! SQLite-backed chat store.
//!
//! This module is only available when the `sqlite` feature is enabled.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::info;
use uuid::Uuid;

use crate::error::{ChatError, Result};
use crate::store::{Chat, ChatMessage, ChatStore, MessageRole, NewMessage};

/// A [`ChatStore`] persisted in SQLite via `sqlx`.
///
/// The schema is created on connect. Timestamps are stored as RFC 3339 text;
/// citation and source payloads as JSON text columns.
///
/// # Example
///
/// ```rust,ignore
/// use nourai_chat::SqliteChatStore;
///
/// let store = SqliteChatStore::connect("sqlite://data/chats.db?mode=rwc").await?;
/// let chat_id = store.create_chat("Plan semanal").await?;
/// ```
pub struct SqliteChatStore {
    pool: SqlitePool,
}

fn storage(e: sqlx::Error) -> ChatError {
    ChatError::Storage(e.to_string())
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ChatError::Storage(format!("invalid timestamp '{text}': {e}")))
}

fn parse_role(text: &str) -> Result<MessageRole> {
    match text {
        "user" => Ok(MessageRole::User),
        "assistant" => Ok(MessageRole::Assistant),
        other => Err(ChatError::Storage(format!("unknown message role '{other}'"))),
    }
}

fn parse_payload(text: Option<String>) -> Result<Option<Vec<Value>>> {
    match text {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

impl SqliteChatStore {
    /// Open (or create) the database at `url` and ensure the schema exists.
    ///
    /// A single connection keeps in-memory databases coherent and serializes
    /// writers; chat traffic is low-volume keyed CRUD.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool =
            SqlitePoolOptions::new().max_connections(1).connect(url).await.map_err(storage)?;

        let store = Self { pool };
        store.init_schema().await?;
        info!(url, "chat database ready");
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chats (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                chat_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                citations TEXT,
                sources TEXT,
                timestamp TEXT NOT NULL,
                FOREIGN KEY (chat_id) REFERENCES chats(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        for ddl in [
            "CREATE INDEX IF NOT EXISTS idx_messages_chat_id ON messages(chat_id)",
            "CREATE INDEX IF NOT EXISTS idx_messages_timestamp ON messages(timestamp)",
            "CREATE INDEX IF NOT EXISTS idx_chats_updated_at ON chats(updated_at)",
        ] {
            sqlx::query(ddl).execute(&self.pool).await.map_err(storage)?;
        }

        Ok(())
    }

    fn chat_from_row(row: &SqliteRow) -> Result<Chat> {
        let created_at: String = row.try_get("created_at").map_err(storage)?;
        let updated_at: String = row.try_get("updated_at").map_err(storage)?;
        Ok(Chat {
            id: row.try_get("id").map_err(storage)?,
            title: row.try_get("title").map_err(storage)?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }

    fn message_from_row(row: &SqliteRow) -> Result<ChatMessage> {
        let role: String = row.try_get("role").map_err(storage)?;
        let timestamp: String = row.try_get("timestamp").map_err(storage)?;
        let citations: Option<String> = row.try_get("citations").map_err(storage)?;
        let sources: Option<String> = row.try_get("sources").map_err(storage)?;
        Ok(ChatMessage {
            id: row.try_get("id").map_err(storage)?,
            chat_id: row.try_get("chat_id").map_err(storage)?,
            role: parse_role(&role)?,
            content: row.try_get("content").map_err(storage)?,
            citations: parse_payload(citations)?,
            sources: parse_payload(sources)?,
            timestamp: parse_timestamp(&timestamp)?,
        })
    }
}

#[async_trait]
impl ChatStore for SqliteChatStore {
    async fn create_chat(&self, title: &str) -> Result<String> {
        let id = format!("chat_{}", Uuid::new_v4());
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO chats (id, title, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(title)
            .bind(&now)
            .bind(&now)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        Ok(id)
    }

    async fn list_chats(&self, limit: usize) -> Result<Vec<Chat>> {
        let rows = sqlx::query(
            "SELECT id, title, created_at, updated_at FROM chats
             ORDER BY updated_at DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.iter().map(Self::chat_from_row).collect()
    }

    async fn chat_title(&self, chat_id: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT title FROM chats WHERE id = ?")
            .bind(chat_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        row.map(|r| r.try_get("title").map_err(storage)).transpose()
    }

    async fn update_title(&self, chat_id: &str, title: &str) -> Result<()> {
        let result =
            sqlx::query("UPDATE chats SET title = ?, updated_at = ? WHERE id = ?")
                .bind(title)
                .bind(Utc::now().to_rfc3339())
                .bind(chat_id)
                .execute(&self.pool)
                .await
                .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(ChatError::NotFound(chat_id.to_string()));
        }
        Ok(())
    }

    async fn messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>> {
        if self.chat_title(chat_id).await?.is_none() {
            return Err(ChatError::NotFound(chat_id.to_string()));
        }

        let rows = sqlx::query(
            "SELECT id, chat_id, role, content, citations, sources, timestamp FROM messages
             WHERE chat_id = ? ORDER BY timestamp ASC",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.iter().map(Self::message_from_row).collect()
    }

    async fn append_message(&self, chat_id: &str, message: NewMessage) -> Result<String> {
        if self.chat_title(chat_id).await?.is_none() {
            return Err(ChatError::NotFound(chat_id.to_string()));
        }

        let id = format!("msg_{}", Uuid::new_v4());
        let now = Utc::now().to_rfc3339();
        let citations =
            message.citations.as_ref().map(serde_json::to_string).transpose()?;
        let sources = message.sources.as_ref().map(serde_json::to_string).transpose()?;

        sqlx::query(
            "INSERT INTO messages (id, chat_id, role, content, citations, sources, timestamp)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(chat_id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(&citations)
        .bind(&sources)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        sqlx::query("UPDATE chats SET updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(chat_id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        Ok(id)
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<bool> {
        sqlx::query("DELETE FROM messages WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        let result = sqlx::query("DELETE FROM chats WHERE id = ?")
            .bind(chat_id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        Ok(result.rows_affected() > 0)
    }
}
