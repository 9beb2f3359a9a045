//! Router assembly.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the full application router with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/health", get(handlers::health))
        .route("/api/query", post(handlers::query))
        .route("/api/chats", post(handlers::create_chat).get(handlers::list_chats))
        .route("/api/chats/{id}", get(handlers::get_chat).delete(handlers::delete_chat))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
