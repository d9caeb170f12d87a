use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{SlotKey, SlotSet};
use crate::services::conversation;
use crate::services::redact::redact;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatMessage {
    pub session_id: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub session_id: String,
    pub reply_id: String,
    pub text: String,
    pub slots: SlotSet,
    pub missing_info: Vec<SlotKey>,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_failed: Option<bool>,
}

/// Log-safe excerpt of user-facing text.
fn preview(text: &str, max_chars: usize) -> String {
    redact(text).chars().take(max_chars).collect()
}

// POST /v1/chat/message
pub async fn chat_message(
    State(state): State<Arc<AppState>>,
    Json(msg): Json<ChatMessage>,
) -> Result<Json<ChatReply>, AppError> {
    let session_id = msg.session_id.trim();
    if session_id.is_empty() {
        return Err(AppError::BadRequest("session_id must not be empty".to_string()));
    }

    tracing::info!(
        session_id,
        message_length = msg.text.len(),
        message_preview = %preview(&msg.text, 100),
        "user message received"
    );

    let result = conversation::process_message(&state, session_id, &msg.text).await;

    tracing::info!(
        session_id,
        is_complete = result.complete,
        missing_info_count = result.missing_info.len(),
        response_length = result.text.len(),
        "bot response generated"
    );

    if result.fallback {
        tracing::warn!(
            session_id,
            user_input = %preview(&msg.text, 300),
            bot_response = %preview(&result.text, 300),
            "fallback triggered"
        );
    }

    Ok(Json(ChatReply {
        session_id: session_id.to_string(),
        reply_id: uuid::Uuid::new_v4().to_string(),
        text: result.text,
        slots: result.slots,
        missing_info: result.missing_info,
        complete: result.complete,
        confirmed: result.confirmed,
        confirmation_failed: result.confirmation_failed,
    }))
}
