//! Ollama backend adapter.
//!
//! Ollama's chat API streams NDJSON: one JSON object per line, the last one
//! carrying `done: true`. This adapter speaks it through
//! `reqwest::blocking`, so every HTTP pull happens on a worker thread
//! offloaded via [`blocking_stream`] rather than on the async reactor. The
//! blocking client is constructed inside the worker closure; building one on
//! a runtime thread panics.
//!
//! Pass-through operations (`/api/tags`, `/api/show`, `/api/embeddings`)
//! reuse the same blocking client through `spawn_blocking`, one shot each.

pub mod types;

use std::io::{BufRead, BufReader};
use std::time::Duration;

use parlance_core::backend::adapter::{ChatBackend, CompletionStream};
use parlance_core::backend::bridge::blocking_stream;
use parlance_types::backend::{BackendError, CompletionEvent, CompletionRequest};

use self::types::{ChatChunk, ChatPayload, EmbeddingsPayload, ShowPayload};

/// Fragment buffer between the worker thread and the async consumer.
/// When it fills, the worker stops pulling from Ollama until the consumer
/// catches up.
const FRAGMENT_BUFFER: usize = 64;

/// Backend adapter for the Ollama HTTP API.
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    name: String,
    base_url: String,
}

impl OllamaBackend {
    /// Create a new Ollama backend.
    ///
    /// # Arguments
    ///
    /// * `name` - Configured backend name (shows up in routing and logs)
    /// * `base_url` - Daemon address, e.g. "http://localhost:11434"
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// One-shot blocking request, offloaded to the blocking thread pool.
    ///
    /// A non-2xx reply becomes [`BackendError::Http`] with the upstream
    /// status and body kept verbatim, so the gateway can reproduce it.
    async fn passthrough(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, BackendError> {
        let url = self.url(path);
        tokio::task::spawn_blocking(move || {
            let client = reqwest::blocking::Client::new();
            let request = match &body {
                Some(payload) => client.post(&url).json(payload),
                None => client.get(&url),
            };

            let response = request
                .send()
                .map_err(|e| BackendError::Connect(e.to_string()))?;
            let status = response.status();
            let text = response
                .text()
                .map_err(|e| BackendError::Stream(e.to_string()))?;

            if !status.is_success() {
                return Err(BackendError::Http {
                    status: status.as_u16(),
                    body: text,
                });
            }

            serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
        })
        .await
        .map_err(|e| BackendError::Stream(format!("worker task failed: {e}")))?
    }
}

/// Decode one NDJSON line into a completion event.
fn decode_chunk(line: &str) -> Result<CompletionEvent, BackendError> {
    let chunk: ChatChunk =
        serde_json::from_str(line).map_err(|e| BackendError::Decode(e.to_string()))?;

    if let Some(message) = chunk.error {
        return Err(BackendError::Stream(message));
    }
    if chunk.done {
        return Ok(CompletionEvent::Done);
    }

    let content = chunk.message.map(|m| m.content).unwrap_or_default();
    Ok(CompletionEvent::Fragment(content))
}

impl ChatBackend for OllamaBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn complete(&self, request: CompletionRequest) -> CompletionStream {
        let url = self.url("/api/chat");
        let payload = ChatPayload {
            model: request.model,
            messages: request.messages,
            stream: true,
            options: request.options.into(),
        };

        let stream = blocking_stream(FRAGMENT_BUFFER, move || {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(300)) // 5 min timeout for long generations
                .build()
                .map_err(|e| BackendError::Connect(e.to_string()))?;

            let response = client
                .post(&url)
                .json(&payload)
                .send()
                .map_err(|e| BackendError::Connect(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(BackendError::Http {
                    status: status.as_u16(),
                    body,
                });
            }

            // Response implements io::Read; lines() pulls lazily, so the
            // bounded channel's backpressure reaches all the way to the
            // socket.
            let lines = BufReader::new(response).lines().filter_map(|line| match line {
                Ok(line) if line.trim().is_empty() => None,
                Ok(line) => Some(decode_chunk(&line)),
                Err(e) => Some(Err(BackendError::Stream(e.to_string()))),
            });

            Ok(lines)
        });

        Box::pin(stream)
    }

    async fn list_models(&self) -> Result<serde_json::Value, BackendError> {
        self.passthrough("/api/tags", None).await
    }

    async fn model_info(&self, model: &str) -> Result<serde_json::Value, BackendError> {
        let payload = serde_json::to_value(ShowPayload {
            name: model.to_string(),
        })
        .map_err(|e| BackendError::Decode(e.to_string()))?;
        self.passthrough("/api/show", Some(payload)).await
    }

    async fn embeddings(&self, model: &str, prompt: &str) -> Result<serde_json::Value, BackendError> {
        let payload = serde_json::to_value(EmbeddingsPayload {
            model: model.to_string(),
            prompt: prompt.to_string(),
        })
        .map_err(|e| BackendError::Decode(e.to_string()))?;
        self.passthrough("/api/embeddings", Some(payload)).await
    }
}
