//! Session management endpoints.
//!
//! Endpoints:
//! - POST /session/create - reset a session to a single system turn
//! - POST /session/delete - remove one session, or all with the "*" wildcard
//! - POST /session/exist  - whether a session has recorded turns
//!
//! Create is destructive: calling it on an existing session discards that
//! session's history and reseeds it with the system prompt.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::http::error::AppError;
use crate::state::AppState;

/// System prompt seeded into sessions created without an explicit one.
const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly assistant";

/// Request body for session creation.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub name: String,
    pub system_prompt: Option<String>,
}

/// Request body for session deletion and existence checks.
#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub name: String,
}

/// POST /session/create - destructively reset a session.
pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<StatusCode, AppError> {
    let prompt = body
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);
    state.chat_service.create_session(&body.name, prompt).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /session/delete - delete one session, or every session for `"*"`.
pub async fn delete_session(
    State(state): State<AppState>,
    Json(body): Json<SessionRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state.chat_service.delete_session(&body.name).await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

/// POST /session/exist - existence check, plain JSON boolean.
pub async fn session_exists(
    State(state): State<AppState>,
    Json(body): Json<SessionRequest>,
) -> Result<Json<bool>, AppError> {
    let exists = state.chat_service.session_exists(&body.name).await?;
    Ok(Json(exists))
}
