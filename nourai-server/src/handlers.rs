//! Request handlers and their wire types.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use nourai_chat::{ChatMessage, NewMessage};
use nourai_rag::{Citation, ClinicalAttributes, RagError};

use crate::state::AppState;

/// Handler error: an HTTP status plus a short detail message.
///
/// Dependency failures surface as one generic status with the error's short
/// display text; internals never leak beyond that.
pub type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (status, Json(json!({ "detail": detail.into() })))
}

// ── Wire types ─────────────────────────────────────────────────────

/// Patient attributes as they arrive on the wire.
///
/// `weight`/`height` are the transport names for `weight_kg`/`height_cm`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClinicalData {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    #[serde(default)]
    pub conditions: Option<Vec<String>>,
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
    #[serde(default)]
    pub medications: Option<Vec<String>>,
    pub diet_type: Option<String>,
    pub activity_level: Option<String>,
}

impl From<ClinicalData> for ClinicalAttributes {
    fn from(data: ClinicalData) -> Self {
        ClinicalAttributes {
            age: data.age,
            gender: data.gender,
            weight_kg: data.weight,
            height_cm: data.height,
            conditions: data.conditions.unwrap_or_default(),
            allergies: data.allergies.unwrap_or_default(),
            medications: data.medications.unwrap_or_default(),
            diet_type: data.diet_type,
            activity_level: data.activity_level,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub clinical_data: Option<ClinicalData>,
    #[serde(default)]
    pub chat_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub answer: String,
    pub sources: Vec<Citation>,
}

#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct CreateChatResponse {
    pub chat_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListChatsQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ChatListResponse {
    pub chats: Vec<nourai_chat::Chat>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessagesResponse {
    pub messages: Vec<ChatMessage>,
}

// ── Handlers ───────────────────────────────────────────────────────

/// `GET /` — service name, version, and endpoint map.
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Nourai API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "query": "POST /api/query",
            "health": "GET /api/health",
            "chats": "GET /api/chats"
        }
    }))
}

/// `GET /api/health` — liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /api/query` — run one query through the RAG core.
///
/// When `chat_id` is supplied, the user query and the assistant answer are
/// persisted best-effort after the response is computed: a storage failure
/// is logged and swallowed, never failing the response.
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    if request.query.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "query must not be empty"));
    }
    if request.top_k == Some(0) {
        return Err(api_error(StatusCode::BAD_REQUEST, "top_k must be a positive integer"));
    }

    let clinical: Option<ClinicalAttributes> = request.clinical_data.map(Into::into);

    let outcome = state
        .pipeline
        .answer(&request.query, request.top_k, clinical.as_ref())
        .await
        .map_err(|e| match e {
            RagError::InvalidInput(message) => api_error(StatusCode::BAD_REQUEST, message),
            other => api_error(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        })?;

    let answer = outcome.answer_text().to_string();
    let sources = outcome.citations().to_vec();

    if let Some(chat_id) = &request.chat_id {
        persist_turn(&state, chat_id, &request.query, &answer, &sources).await;
    }

    Ok(Json(QueryResponse { query: request.query, answer, sources }))
}

/// Persist one completed query turn. Best-effort: failures are logged only.
async fn persist_turn(
    state: &AppState,
    chat_id: &str,
    query: &str,
    answer: &str,
    sources: &[Citation],
) {
    if let Err(e) = state.chats.append_message(chat_id, NewMessage::user(query)).await {
        warn!(chat_id, error = %e, "failed to persist user message");
        return;
    }

    let source_values: Option<Vec<Value>> = if sources.is_empty() {
        None
    } else {
        sources.iter().map(serde_json::to_value).collect::<Result<Vec<_>, _>>().ok()
    };

    if let Err(e) = state
        .chats
        .append_message(chat_id, NewMessage::assistant(answer, None, source_values))
        .await
    {
        warn!(chat_id, error = %e, "failed to persist assistant message");
    }
}

/// `POST /api/chats` — create a conversation thread.
pub async fn create_chat(
    State(state): State<AppState>,
    Json(request): Json<CreateChatRequest>,
) -> Result<Json<CreateChatResponse>, ApiError> {
    let chat_id = state
        .chats
        .create_chat(&request.title)
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(CreateChatResponse { chat_id }))
}

/// `GET /api/chats?limit=` — list threads, most recently updated first.
pub async fn list_chats(
    State(state): State<AppState>,
    Query(params): Query<ListChatsQuery>,
) -> Result<Json<ChatListResponse>, ApiError> {
    let chats = state
        .chats
        .list_chats(params.limit.unwrap_or(50))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(ChatListResponse { chats }))
}

/// `GET /api/chats/{id}` — all messages of one thread, oldest first.
pub async fn get_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<ChatMessagesResponse>, ApiError> {
    match state.chats.messages(&chat_id).await {
        Ok(messages) => Ok(Json(ChatMessagesResponse { messages })),
        Err(nourai_chat::ChatError::NotFound(_)) => {
            Err(api_error(StatusCode::NOT_FOUND, format!("chat '{chat_id}' not found")))
        }
        Err(e) => Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

/// `DELETE /api/chats/{id}` — delete a thread and its messages.
pub async fn delete_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .chats
        .delete_chat(&chat_id)
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(api_error(StatusCode::NOT_FOUND, format!("chat '{chat_id}' not found")))
    }
}
