pub mod chat;
pub mod health;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// API routes plus the chat widget's static files as the fallback.
pub fn router(state: Arc<AppState>) -> Router {
    let widget = ServeDir::new(&state.config.public_dir);

    Router::new()
        .route("/v1/chat/message", post(chat::chat_message))
        .route("/v1/health", get(health::health))
        .fallback_service(widget)
        .with_state(state)
}
