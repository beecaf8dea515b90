//! Streaming chat endpoint.
//!
//! POST /chat
//!
//! Streams the model's reply as a chunked `text/plain` body, one HTTP chunk
//! per fragment, with no framing added: the concatenation of chunks is the
//! assistant's reply. A mid-stream backend failure terminates the body
//! before the terminating chunk, which callers observe as an abnormal end
//! of stream rather than a natural finish.
//!
//! Everything that can fail cleanly (validation, history load, prompt
//! commit, routing, stream open) happens before the response starts and
//! returns a normal error response instead.

use std::convert::Infallible;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::Instrument;

use parlance_types::chat::ChatRequest;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /chat - streaming chat completion.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, AppError> {
    // Routing is deterministic, so the serving backend is known before
    // dispatch and the span can carry it from the start.
    let provider = state
        .chat_service
        .router()
        .route(&request.model)
        .map(|routed| routed.backend.name().to_string())
        .unwrap_or_default();

    let span = parlance_observe::genai_attrs::chat_span(
        &provider,
        &request.model,
        request.options.temperature,
        request.options.seed,
    );

    let reply = state.chat_service.chat(request).instrument(span).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(reply.stream),
    )
        .into_response())
}

/// GET /debug/stream - transport probe.
///
/// Emits ten numbered plain-text lines at one-second intervals through the
/// same chunked-body path as `/chat`, so streaming behavior (proxy
/// buffering, client-side decoding) can be verified without a live backend.
pub async fn debug_stream() -> Response {
    let stream = async_stream::stream! {
        for i in 0..10 {
            yield Ok::<_, Infallible>(format!("Line {i}\n"));
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    };

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response()
}
