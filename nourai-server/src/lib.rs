//! HTTP transport for the Nourai nutrition assistant.
//!
//! A thin axum wrapper around the RAG core and the chat-history store:
//! request/response schemas, CORS, and best-effort persistence of completed
//! query turns. All algorithmic behavior lives in `nourai-rag`.

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::app;
pub use state::AppState;

use std::net::SocketAddr;

use tracing::info;

/// Bind `addr` and serve the application until the task is cancelled.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "nourai server listening");
    axum::serve(listener, app(state)).await
}
