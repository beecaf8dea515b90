//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Two mappings live here. Gateway-originated failures become a JSON
//! envelope `{ code, message, timestamp }` with a status of our choosing.
//! Pass-through failures ([`AppError::Upstream`]) reproduce the backend's
//! own status and body verbatim, so callers see exactly what the backend
//! said.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parlance_types::backend::BackendError;
use parlance_types::error::{ChatError, StoreError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request (empty model, unknown backend name, ...).
    Validation(String),
    /// Session store failure.
    Store(StoreError),
    /// Backend dispatch or transport failure before any output.
    Backend(BackendError),
    /// A pass-through backend answered non-2xx; status and body are
    /// relayed as-is.
    Upstream { status: u16, body: String },
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Validation(msg) => AppError::Validation(msg),
            ChatError::Store(e) => AppError::Store(e),
            // Dispatch failures are gateway errors (502) even when the
            // backend answered with a status of its own.
            ChatError::Backend(e) => AppError::Backend(e),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

/// Pass-through conversion: an HTTP answer keeps its original status and
/// body, everything else is a 502.
impl From<BackendError> for AppError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Http { status, body } => AppError::Upstream { status, body },
            other => AppError::Backend(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Upstream { status, body } = self {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            return (
                status,
                [(axum::http::header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response();
        }

        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR", e.to_string()),
            AppError::Backend(e) => (StatusCode::BAD_GATEWAY, "BACKEND_ERROR", e.to_string()),
            AppError::Upstream { .. } => unreachable!("handled above"),
        };

        let body = json!({
            "code": code,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
