//! Chat HTTP handler.
//!
//! Endpoint:
//! - POST /api/chat - Submit one user message, receive the assistant reply

use axum::Json;
use axum::extract::State;

use doula_types::turn::{ChatReply, ChatRequest};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/chat - Run one chat turn for a session.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let reply = state.chat_service.submit(&request).await?;
    Ok(Json(reply))
}
