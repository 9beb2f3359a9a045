//! Shared application state for the HTTP layer.

use std::sync::Arc;

use nourai_chat::ChatStore;
use nourai_rag::RagPipeline;

/// State shared by every request handler.
///
/// The pipeline is stateless per request, so one instance serves all
/// concurrent requests without additional locking.
#[derive(Clone)]
pub struct AppState {
    /// The RAG core answering queries.
    pub pipeline: Arc<RagPipeline>,
    /// The conversation-history store.
    pub chats: Arc<dyn ChatStore>,
}

impl AppState {
    /// Bundle a pipeline and a chat store into shared state.
    pub fn new(pipeline: Arc<RagPipeline>, chats: Arc<dyn ChatStore>) -> Self {
        Self { pipeline, chats }
    }
}
