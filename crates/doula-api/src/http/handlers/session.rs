//! Session log HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/sessions/{id}/turns - Page through a session's stored turns
//! - POST /api/sessions/{id}/turns - Append a client-authored user turn

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use doula_types::turn::Turn;

use crate::http::error::AppError;
use crate::state::AppState;

/// Query parameters for turn listing.
#[derive(Debug, Deserialize)]
pub struct TurnListQuery {
    #[serde(default = "default_turn_limit")]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

fn default_turn_limit() -> Option<i64> {
    Some(100)
}

/// Body for appending a user turn.
#[derive(Debug, Deserialize)]
pub struct AppendTurnBody {
    pub user_id: String,
    pub text: String,
}

/// GET /api/sessions/{id}/turns - Stored turns, oldest first.
pub async fn list_turns(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<TurnListQuery>,
) -> Result<Json<Vec<Turn>>, AppError> {
    if query.limit.is_some_and(|l| l < 0) || query.offset.is_some_and(|o| o < 0) {
        return Err(AppError::Validation(
            "limit and offset must not be negative".to_string(),
        ));
    }

    let turns = state
        .chat_service
        .history(&session_id, query.limit, query.offset)
        .await?;
    Ok(Json(turns))
}

/// POST /api/sessions/{id}/turns - Append a user turn written by the client.
pub async fn append_turn(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<AppendTurnBody>,
) -> Result<(StatusCode, Json<Turn>), AppError> {
    let turn = state
        .chat_service
        .record_user_turn(&session_id, &body.user_id, &body.text)
        .await?;
    Ok((StatusCode::CREATED, Json(turn)))
}
