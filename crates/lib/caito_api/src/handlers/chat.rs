//! Chat relay to the language-model collaborator.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use caito_core::chat::build_history;
use serde_json::Value;
use tracing::{debug, warn};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::ChatResponse;

pub const MESSAGES_REQUIRED: &str = "Нужен список сообщений";

/// `POST /api/chat`: prepend the persona, forward the history, return the
/// single reply.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> AppResult<Json<ChatResponse>> {
    let messages = parse_messages(&body)?;
    let history = build_history(&state.config.persona, &messages);
    debug!(
        received = messages.len(),
        admitted = history.client_turns(),
        "relaying chat history"
    );

    let reply = state.chat_model.complete(&history).await.map_err(|e| {
        warn!(error = %e, "chat completion failed");
        AppError::Upstream(format!("OpenAI API error: {e}"))
    })?;

    Ok(Json(ChatResponse { message: reply }))
}

/// `messages` must be a non-empty array.
fn parse_messages(body: &[u8]) -> AppResult<Vec<Value>> {
    let required = || AppError::BadRequest(MESSAGES_REQUIRED.to_string());
    let mut value: Value = serde_json::from_slice(body).map_err(|_| required())?;
    match value.get_mut("messages").map(Value::take) {
        Some(Value::Array(messages)) if !messages.is_empty() => Ok(messages),
        _ => Err(required()),
    }
}
