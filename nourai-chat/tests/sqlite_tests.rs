#![cfg(feature = "sqlite")]

//! Round-trip tests for the SQLite chat store against an in-memory database.

use nourai_chat::{ChatError, ChatStore, MessageRole, NewMessage, SqliteChatStore};

async fn store() -> SqliteChatStore {
    SqliteChatStore::connect("sqlite::memory:").await.unwrap()
}

#[tokio::test]
async fn chat_lifecycle_roundtrip() {
    let store = store().await;

    let id = store.create_chat("Plan semanal").await.unwrap();
    assert_eq!(store.chat_title(&id).await.unwrap().as_deref(), Some("Plan semanal"));

    store.update_title(&id, "Plan mensual").await.unwrap();
    assert_eq!(store.chat_title(&id).await.unwrap().as_deref(), Some("Plan mensual"));

    let chats = store.list_chats(10).await.unwrap();
    assert_eq!(chats.len(), 1);
    assert_eq!(chats[0].title, "Plan mensual");

    assert!(store.delete_chat(&id).await.unwrap());
    assert!(!store.delete_chat(&id).await.unwrap());
    assert!(store.chat_title(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn messages_roundtrip_with_optional_payloads() {
    let store = store().await;
    let id = store.create_chat("chat").await.unwrap();

    store.append_message(&id, NewMessage::user("¿qué debería comer?")).await.unwrap();

    let sources = vec![serde_json::json!({
        "title": "Guía alimentaria",
        "organization": "Organización de las Naciones Unidas para la Alimentación y la Agricultura",
        "similarity": "82.3%"
    })];
    store
        .append_message(
            &id,
            NewMessage::assistant("Una dieta variada y equilibrada.", None, Some(sources.clone())),
        )
        .await
        .unwrap();

    let messages = store.messages(&id).await.unwrap();
    assert_eq!(messages.len(), 2);

    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].content, "¿qué debería comer?");
    assert!(messages[0].citations.is_none());
    assert!(messages[0].sources.is_none());

    assert_eq!(messages[1].role, MessageRole::Assistant);
    assert_eq!(messages[1].sources.as_deref(), Some(sources.as_slice()));
}

#[tokio::test]
async fn deleting_a_chat_removes_its_messages() {
    let store = store().await;
    let id = store.create_chat("chat").await.unwrap();
    store.append_message(&id, NewMessage::user("hola")).await.unwrap();

    assert!(store.delete_chat(&id).await.unwrap());
    assert!(matches!(store.messages(&id).await, Err(ChatError::NotFound(_))));
}

#[tokio::test]
async fn unknown_chat_is_not_found() {
    let store = store().await;
    let result = store.append_message("chat_missing", NewMessage::user("hola")).await;
    assert!(matches!(result, Err(ChatError::NotFound(_))));
}

#[tokio::test]
async fn listing_orders_by_most_recent_update() {
    let store = store().await;
    let first = store.create_chat("primero").await.unwrap();
    let _second = store.create_chat("segundo").await.unwrap();

    // appending to the older chat moves it to the front
    store.append_message(&first, NewMessage::user("hola")).await.unwrap();

    let chats = store.list_chats(10).await.unwrap();
    assert_eq!(chats[0].id, first);
}
