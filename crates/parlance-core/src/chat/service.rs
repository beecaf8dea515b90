//! Chat service orchestrating history, dispatch, streaming, and commits.
//!
//! ChatService drives a chat request through its whole lifecycle: validate,
//! load session history, persist the incoming prompt, route to a backend,
//! stream fragments back while accumulating the reply, and commit the
//! assistant turn after the stream ends naturally.
//!
//! Two asymmetries here are protocol, not accidents:
//! - History is *read* for every named session, but *written* only when
//!   `record` is set -- `record=false` replays context without extending it.
//! - The prompt is committed before dispatch, the assistant turn only after
//!   the `Done` sentinel. A stream that fails or is abandoned mid-way leaves
//!   the prompt durable and no partial reply behind.

use std::pin::Pin;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tracing::{debug, error, info, warn};

use parlance_types::backend::{BackendError, CompletionEvent, CompletionRequest};
use parlance_types::chat::{ChatRequest, Role, Turn, WILDCARD_SESSION};
use parlance_types::error::{ChatError, StoreError};

use crate::backend::router::BackendRouter;
use crate::history::store::HistoryStore;

/// Fragment stream handed to the transport: opaque text pieces, one per
/// chunk, with a mid-stream failure as a terminal `Err` item.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String, BackendError>> + Send + 'static>>;

/// A started chat: the backend that serves it and the fragment stream.
pub struct ChatReply {
    pub backend: String,
    pub stream: ChatStream,
}

impl std::fmt::Debug for ChatReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatReply")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

/// Orchestrates session history and streaming chat dispatch.
///
/// Generic over [`HistoryStore`] to maintain clean architecture
/// (parlance-core never depends on parlance-infra).
pub struct ChatService<S: HistoryStore> {
    store: Arc<S>,
    router: Arc<BackendRouter>,
}

impl<S: HistoryStore + 'static> ChatService<S> {
    /// Create a new chat service over the given store and router.
    pub fn new(store: S, router: Arc<BackendRouter>) -> Self {
        Self {
            store: Arc::new(store),
            router,
        }
    }

    /// Access the backend router (pass-through endpoints use it directly).
    pub fn router(&self) -> &BackendRouter {
        &self.router
    }

    // --- Session management ---

    /// Reset a session to a single system turn.
    pub async fn create_session(&self, name: &str, system_prompt: &str) -> Result<(), StoreError> {
        self.store.create(name, system_prompt).await?;
        info!(session = %name, "Session created");
        Ok(())
    }

    /// Delete one session, or every session when `name` is the `"*"`
    /// wildcard. Returns the number of sessions removed.
    pub async fn delete_session(&self, name: &str) -> Result<u64, StoreError> {
        if name == WILDCARD_SESSION {
            let removed = self.store.delete_all().await?;
            info!(count = removed, "All sessions deleted");
            Ok(removed)
        } else {
            let existed = self.store.delete(name).await?;
            info!(session = %name, existed, "Session deleted");
            Ok(u64::from(existed))
        }
    }

    /// Whether a session has any recorded turns.
    pub async fn session_exists(&self, name: &str) -> Result<bool, StoreError> {
        self.store.exists(name).await
    }

    /// The session's full turn log, oldest first.
    pub async fn history(&self, name: &str) -> Result<Vec<Turn>, StoreError> {
        self.store.read(name).await
    }

    // --- Chat lifecycle ---

    /// Run a chat request up to the point of streaming.
    ///
    /// Everything that can fail cleanly -- validation, history load, prompt
    /// commit, routing, stream open -- happens here, before the caller sees
    /// any output. The returned stream then forwards backend fragments
    /// as-is; its only failure mode is an `Err` item that ends the response
    /// abnormally.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        if request.model.is_empty() {
            return Err(ChatError::Validation("model must not be empty".to_string()));
        }
        if request.messages.is_empty() {
            return Err(ChatError::Validation(
                "messages must not be empty".to_string(),
            ));
        }

        let ephemeral = request.is_ephemeral();
        let record = request.record && !ephemeral;

        // Read history for every named session, even when record=false.
        let mut messages = if ephemeral {
            Vec::new()
        } else {
            self.store.read(&request.session).await?
        };
        debug!(
            session = %request.session,
            history_turns = messages.len(),
            new_turns = request.messages.len(),
            "History loaded"
        );
        messages.extend(request.messages.iter().cloned());

        // Commit the prompt before dispatch so it survives a failed
        // generation. Only the incoming turns are appended -- history is
        // already in the log.
        if record {
            for turn in &request.messages {
                self.store.append(&request.session, turn).await?;
            }
        }

        let routed = self
            .router
            .route(&request.model)
            .ok_or_else(|| ChatError::Validation("no backends configured".to_string()))?;
        let backend_name = routed.backend.name().to_string();
        debug!(
            backend = %backend_name,
            model = %routed.model,
            "Dispatching chat completion"
        );

        let mut completion = routed.backend.complete(CompletionRequest {
            model: routed.model,
            messages,
            options: request.options,
        });

        // Pull the first event before the response starts. Both adapter
        // families deliver open failures (refused connection, upstream
        // non-2xx) as the first stream item, so peeking turns them into a
        // failed dispatch instead of a broken 200 stream.
        let first = match completion.next().await {
            Some(Err(e)) => {
                warn!(backend = %backend_name, error = %e, "Backend dispatch failed");
                return Err(ChatError::Backend(e));
            }
            other => other,
        };

        let store = Arc::clone(&self.store);
        let session = request.session.clone();

        let stream = async_stream::stream! {
            let mut assistant = String::new();
            let mut finished = false;
            let mut completion = std::pin::pin!(completion);
            let mut next_event = first;

            while let Some(event) = next_event.take() {
                match event {
                    Ok(CompletionEvent::Fragment(text)) => {
                        // Heartbeat / role-only deltas carry no text.
                        if !text.is_empty() {
                            assistant.push_str(&text);
                            yield Ok(text);
                        }
                    }
                    Ok(CompletionEvent::Done) => {
                        finished = true;
                        break;
                    }
                    Err(e) => {
                        warn!(session = %session, error = %e, "Backend stream failed mid-generation");
                        yield Err(e);
                        return;
                    }
                }
                next_event = completion.next().await;
            }

            if finished && record && !assistant.is_empty() {
                // Background commit: must never delay the final flush. It
                // may race a caller disconnect; that is safe.
                let turn = Turn::new(Role::Assistant, assistant);
                let reply_len = turn.content.len();
                tokio::spawn(async move {
                    match store.append(&session, &turn).await {
                        Ok(()) => {
                            info!(session = %session, reply_len, "Assistant turn recorded");
                        }
                        Err(e) => {
                            error!(session = %session, error = %e, "Failed to record assistant turn");
                        }
                    }
                });
            }
        };

        Ok(ChatReply {
            backend: backend_name,
            stream: Box::pin(stream),
        })
    }
}
