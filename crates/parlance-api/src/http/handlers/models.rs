//! Backend pass-through endpoints.
//!
//! Endpoints:
//! - GET  /models          - backend's native model-list payload
//! - GET  /models/{model}  - backend's native model metadata payload
//! - POST /embeddings      - backend's native embeddings payload
//!
//! The gateway does not reshape these payloads. Whatever the backend
//! answers, including error statuses and bodies, is relayed verbatim.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::http::error::AppError;
use crate::state::AppState;

/// Query parameters for the model-list pass-through.
#[derive(Debug, Deserialize)]
pub struct ModelsQuery {
    /// Select a configured backend by name; defaults to the first one.
    pub backend: Option<String>,
}

/// Request body for the embeddings pass-through.
#[derive(Debug, Deserialize)]
pub struct EmbeddingsRequest {
    pub model: String,
    pub prompt: String,
}

/// GET /models - list the models a backend serves.
pub async fn list_models(
    State(state): State<AppState>,
    Query(query): Query<ModelsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let router = state.chat_service.router();
    let backend = match query.backend.as_deref() {
        Some(name) => router
            .by_name(name)
            .ok_or_else(|| AppError::Validation(format!("unknown backend: '{name}'")))?,
        None => router
            .first()
            .ok_or_else(|| AppError::Validation("no backends configured".to_string()))?,
    };

    let payload = backend.list_models().await?;
    Ok(Json(payload))
}

/// GET /models/{model} - metadata for one model.
///
/// The id may carry a routing prefix (`ollama/llama3`); it is resolved
/// exactly like a chat dispatch, so the backend sees its native name.
pub async fn model_info(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let routed = state
        .chat_service
        .router()
        .route(&model)
        .ok_or_else(|| AppError::Validation("no backends configured".to_string()))?;

    let payload = routed.backend.model_info(&routed.model).await?;
    Ok(Json(payload))
}

/// POST /embeddings - embed a prompt with the routed backend.
pub async fn embeddings(
    State(state): State<AppState>,
    Json(body): Json<EmbeddingsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let routed = state
        .chat_service
        .router()
        .route(&body.model)
        .ok_or_else(|| AppError::Validation("no backends configured".to_string()))?;

    let payload = routed.backend.embeddings(&routed.model, &body.prompt).await?;
    Ok(Json(payload))
}
