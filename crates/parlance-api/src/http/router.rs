//! Axum router configuration with middleware.
//!
//! Flat route namespace matching the gateway's wire protocol (no version
//! prefix). Middleware: CORS, request tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete gateway router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Chat streaming
        .route("/chat", post(handlers::chat::chat))
        // Session management
        .route("/session/create", post(handlers::session::create_session))
        .route("/session/delete", post(handlers::session::delete_session))
        .route("/session/exist", post(handlers::session::session_exists))
        // Backend pass-throughs. The wildcard capture keeps routing
        // prefixes working: `/models/ollama/llama3` is one model id.
        .route("/models", get(handlers::models::list_models))
        .route("/models/{*model}", get(handlers::models::model_info))
        .route("/embeddings", post(handlers::models::embeddings))
        // Probes
        .route("/health", get(health_check))
        .route("/debug/stream", get(handlers::chat::debug_stream))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - liveness probe.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use futures_util::StreamExt;
    use tower::ServiceExt;

    use parlance_core::backend::adapter::{ChatBackend, CompletionStream};
    use parlance_core::backend::box_adapter::BoxBackend;
    use parlance_core::backend::router::BackendRouter;
    use parlance_core::chat::service::ChatService;
    use parlance_infra::sqlite::history::SqliteHistoryStore;
    use parlance_infra::sqlite::pool::DatabasePool;
    use parlance_types::backend::{BackendError, CompletionEvent, CompletionRequest};
    use parlance_types::chat::{Role, Turn};
    use parlance_types::config::GatewayConfig;

    use super::*;

    /// Backend that plays back a scripted event sequence exactly once and
    /// answers pass-throughs with canned payloads naming itself.
    struct ScriptedBackend {
        name: &'static str,
        events: Mutex<Vec<Result<CompletionEvent, BackendError>>>,
    }

    impl ScriptedBackend {
        fn new(name: &'static str, events: Vec<Result<CompletionEvent, BackendError>>) -> Self {
            Self {
                name,
                events: Mutex::new(events),
            }
        }

        fn fragments(name: &'static str, texts: &[&str]) -> Self {
            let mut events: Vec<Result<CompletionEvent, BackendError>> = texts
                .iter()
                .map(|t| Ok(CompletionEvent::Fragment(t.to_string())))
                .collect();
            events.push(Ok(CompletionEvent::Done));
            Self::new(name, events)
        }
    }

    impl ChatBackend for ScriptedBackend {
        fn name(&self) -> &str {
            self.name
        }

        fn complete(&self, _request: CompletionRequest) -> CompletionStream {
            let events = std::mem::take(&mut *self.events.lock().unwrap());
            Box::pin(futures_util::stream::iter(events))
        }

        async fn list_models(&self) -> Result<serde_json::Value, BackendError> {
            Ok(serde_json::json!({
                "backend": self.name,
                "models": [{ "name": "llama3" }],
            }))
        }

        async fn model_info(&self, model: &str) -> Result<serde_json::Value, BackendError> {
            Ok(serde_json::json!({ "backend": self.name, "model": model }))
        }

        async fn embeddings(
            &self,
            model: &str,
            prompt: &str,
        ) -> Result<serde_json::Value, BackendError> {
            Ok(serde_json::json!({ "model": model, "chars": prompt.len() }))
        }
    }

    /// Backend whose pass-throughs all answer with upstream HTTP errors.
    struct FailingBackend;

    impl ChatBackend for FailingBackend {
        fn name(&self) -> &str {
            "broken"
        }

        fn complete(&self, _request: CompletionRequest) -> CompletionStream {
            Box::pin(futures_util::stream::once(async {
                Err(BackendError::Connect("connection refused".to_string()))
            }))
        }

        async fn list_models(&self) -> Result<serde_json::Value, BackendError> {
            Err(BackendError::Http {
                status: 503,
                body: r#"{"error":"overloaded"}"#.to_string(),
            })
        }

        async fn model_info(&self, _model: &str) -> Result<serde_json::Value, BackendError> {
            Err(BackendError::Http {
                status: 404,
                body: r#"{"error":"model not found"}"#.to_string(),
            })
        }

        async fn embeddings(
            &self,
            _model: &str,
            _prompt: &str,
        ) -> Result<serde_json::Value, BackendError> {
            Err(BackendError::Http {
                status: 500,
                body: "embeddings exploded".to_string(),
            })
        }
    }

    async fn test_state(backends: Vec<(Option<String>, BoxBackend)>) -> AppState {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let db_path = dir.path().join("parlance.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.expect("pool init failed");
        // Keep the tempdir alive for the duration of the test process.
        std::mem::forget(dir);

        let mut router = BackendRouter::new();
        for (prefix, backend) in backends {
            router.register(prefix, backend);
        }

        AppState {
            chat_service: Arc::new(ChatService::new(
                SqliteHistoryStore::new(pool),
                Arc::new(router),
            )),
            config: GatewayConfig::default(),
        }
    }

    async fn single_backend_state(backend: ScriptedBackend) -> AppState {
        test_state(vec![(None, BoxBackend::new(backend))]).await
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    /// Give a spawned background commit time to reach the store. The store
    /// is real SQLite here, so plain task yields are not enough.
    async fn settle_background_commit() {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }

    /// Wait until the session log holds `expected` turns (or give up and
    /// return whatever is there).
    async fn wait_for_turns(state: &AppState, session: &str, expected: usize) -> Vec<Turn> {
        for _ in 0..50 {
            let turns = state.chat_service.history(session).await.unwrap();
            if turns.len() >= expected {
                return turns;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        state.chat_service.history(session).await.unwrap()
    }

    #[tokio::test]
    async fn test_health_probe() {
        let state = single_backend_state(ScriptedBackend::fragments("b", &[])).await;
        let app = build_router(state);

        let response = app.oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn test_chat_streams_and_records_full_exchange() {
        let backend = ScriptedBackend::fragments("ollama", &["He", "llo"]);
        let state = single_backend_state(backend).await;
        let app = build_router(state.clone());

        let response = app
            .clone()
            .oneshot(post_json(
                "/session/create",
                serde_json::json!({ "name": "s", "system_prompt": "P" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .clone()
            .oneshot(post_json(
                "/chat",
                serde_json::json!({
                    "session": "s",
                    "model": "llama3",
                    "messages": [{ "role": "user", "content": "hi" }],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );

        // One body chunk per fragment, nothing added in between.
        let chunks: Vec<_> = response
            .into_body()
            .into_data_stream()
            .map(|chunk| chunk.unwrap().to_vec())
            .collect()
            .await;
        assert_eq!(chunks, vec![b"He".to_vec(), b"llo".to_vec()]);

        let turns = wait_for_turns(&state, "s", 3).await;
        assert_eq!(
            turns,
            vec![
                Turn::new(Role::System, "P"),
                Turn::new(Role::User, "hi"),
                Turn::new(Role::Assistant, "Hello"),
            ]
        );

        let response = app
            .oneshot(post_json("/session/exist", serde_json::json!({ "name": "s" })))
            .await
            .unwrap();
        assert_eq!(body_bytes(response).await, b"true");
    }

    #[tokio::test]
    async fn test_chat_ephemeral_session_leaves_no_trace() {
        let backend = ScriptedBackend::fragments("b", &["hey"]);
        let state = single_backend_state(backend).await;
        let app = build_router(state.clone());

        let response = app
            .oneshot(post_json(
                "/chat",
                serde_json::json!({
                    "model": "llama3",
                    "messages": [{ "role": "user", "content": "hi" }],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(body_bytes(response).await, b"hey");

        settle_background_commit().await;
        assert!(!state.chat_service.session_exists("empty").await.unwrap());
    }

    #[tokio::test]
    async fn test_chat_rejects_invalid_request() {
        let state = single_backend_state(ScriptedBackend::fragments("b", &[])).await;
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(post_json(
                "/chat",
                serde_json::json!({ "model": "", "messages": [{ "role": "user", "content": "hi" }] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

        let response = app
            .oneshot(post_json(
                "/chat",
                serde_json::json!({ "model": "llama3", "messages": [] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_midstream_failure_aborts_body_and_skips_commit() {
        let backend = ScriptedBackend::new(
            "flaky",
            vec![
                Ok(CompletionEvent::Fragment("half".to_string())),
                Err(BackendError::Stream("connection reset".to_string())),
            ],
        );
        let state = single_backend_state(backend).await;
        let app = build_router(state.clone());

        let response = app
            .clone()
            .oneshot(post_json(
                "/session/create",
                serde_json::json!({ "name": "s", "system_prompt": "P" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(post_json(
                "/chat",
                serde_json::json!({
                    "session": "s",
                    "model": "llama3",
                    "messages": [{ "role": "user", "content": "hi" }],
                }),
            ))
            .await
            .unwrap();

        // Headers were already sent; the failure surfaces as a broken body.
        assert_eq!(response.status(), StatusCode::OK);
        let collected = axum::body::to_bytes(response.into_body(), usize::MAX).await;
        assert!(collected.is_err(), "body should end abnormally");

        settle_background_commit().await;

        // Prompt was committed before dispatch; no partial reply follows it.
        let turns = state.chat_service.history("s").await.unwrap();
        assert_eq!(
            turns,
            vec![Turn::new(Role::System, "P"), Turn::new(Role::User, "hi")]
        );
    }

    #[tokio::test]
    async fn test_session_create_defaults_system_prompt() {
        let state = single_backend_state(ScriptedBackend::fragments("b", &[])).await;
        let app = build_router(state.clone());

        let response = app
            .oneshot(post_json("/session/create", serde_json::json!({ "name": "d" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let turns = state.chat_service.history("d").await.unwrap();
        assert_eq!(
            turns,
            vec![Turn::new(Role::System, "You are a friendly assistant")]
        );
    }

    #[tokio::test]
    async fn test_session_delete_wildcard_and_missing() {
        let state = single_backend_state(ScriptedBackend::fragments("b", &[])).await;
        let app = build_router(state);

        for name in ["a", "b"] {
            let response = app
                .clone()
                .oneshot(post_json(
                    "/session/create",
                    serde_json::json!({ "name": name }),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
        }

        let response = app
            .clone()
            .oneshot(post_json("/session/delete", serde_json::json!({ "name": "*" })))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, serde_json::json!({ "deleted": 2 }));

        let response = app
            .clone()
            .oneshot(post_json("/session/exist", serde_json::json!({ "name": "a" })))
            .await
            .unwrap();
        assert_eq!(body_bytes(response).await, b"false");

        let response = app
            .oneshot(post_json(
                "/session/delete",
                serde_json::json!({ "name": "ghost" }),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, serde_json::json!({ "deleted": 0 }));
    }

    #[tokio::test]
    async fn test_models_backend_selector() {
        let state = test_state(vec![
            (
                Some("ollama/".to_string()),
                BoxBackend::new(ScriptedBackend::fragments("ollama", &[])),
            ),
            (
                Some("openai/".to_string()),
                BoxBackend::new(ScriptedBackend::fragments("openai", &[])),
            ),
        ])
        .await;
        let app = build_router(state);

        let response = app.clone().oneshot(get_req("/models")).await.unwrap();
        assert_eq!(body_json(response).await["backend"], "ollama");

        let response = app
            .clone()
            .oneshot(get_req("/models?backend=openai"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["backend"], "openai");

        let response = app
            .oneshot(get_req("/models?backend=nope"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_model_info_resolves_routing_prefix() {
        let state = test_state(vec![(
            Some("ollama/".to_string()),
            BoxBackend::new(ScriptedBackend::fragments("ollama", &[])),
        )])
        .await;
        let app = build_router(state);

        let response = app
            .oneshot(get_req("/models/ollama/llama3:8b"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["backend"], "ollama");
        assert_eq!(body["model"], "llama3:8b", "prefix must be stripped");
    }

    #[tokio::test]
    async fn test_embeddings_pass_through() {
        let state = single_backend_state(ScriptedBackend::fragments("b", &[])).await;
        let app = build_router(state);

        let response = app
            .oneshot(post_json(
                "/embeddings",
                serde_json::json!({ "model": "all-minilm", "prompt": "hello" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "model": "all-minilm", "chars": 5 })
        );
    }

    #[tokio::test]
    async fn test_pass_through_failure_relays_status_and_body() {
        let state = test_state(vec![(None, BoxBackend::new(FailingBackend))]).await;
        let app = build_router(state);

        let response = app.clone().oneshot(get_req("/models")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_bytes(response).await, br#"{"error":"overloaded"}"#);

        let response = app.oneshot(get_req("/models/anything")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(response).await, br#"{"error":"model not found"}"#);
    }

    #[tokio::test]
    async fn test_chat_dispatch_connect_failure_is_502() {
        let state = test_state(vec![(None, BoxBackend::new(FailingBackend))]).await;
        let app = build_router(state);

        // The stub fails on stream open; the service surfaces that before
        // any output, so the caller gets a clean error response.
        let response = app
            .oneshot(post_json(
                "/chat",
                serde_json::json!({
                    "model": "llama3",
                    "messages": [{ "role": "user", "content": "hi" }],
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["code"], "BACKEND_ERROR");
    }

    #[tokio::test]
    async fn test_debug_stream_first_line() {
        let state = single_backend_state(ScriptedBackend::fragments("b", &[])).await;
        let app = build_router(state);

        let response = app.oneshot(get_req("/debug/stream")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );

        // Only the first chunk; draining all ten would wait out the delays.
        let mut chunks = response.into_body().into_data_stream();
        let first = chunks.next().await.unwrap().unwrap();
        assert_eq!(&first[..], b"Line 0\n");
    }
}
