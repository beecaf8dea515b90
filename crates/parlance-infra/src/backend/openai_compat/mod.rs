//! OpenAI-compatible backend adapter.
//!
//! One adapter serves OpenAI itself and the broad compatible ecosystem
//! (vLLM, llama.cpp server, LM Studio, LiteLLM proxies) via a configurable
//! base URL. The chat completion streams natively over SSE; pass-through
//! operations are plain JSON round-trips with status and body preserved
//! verbatim on failure.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

pub mod streaming;
pub mod types;

use std::time::Duration;

use reqwest_eventsource::EventSource;
use secrecy::{ExposeSecret, SecretString};

use parlance_core::backend::adapter::{ChatBackend, CompletionStream};
use parlance_types::backend::{BackendError, CompletionRequest};

use self::streaming::completion_events;
use self::types::{ChatCompletionPayload, EmbeddingsPayload};

/// Backend adapter for any OpenAI-compatible chat completions API.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// the bearer header is built. The struct does not derive `Debug`, so it
/// cannot leak through logging.
pub struct OpenAiCompatBackend {
    client: reqwest::Client,
    name: String,
    base_url: String,
    api_key: Option<SecretString>,
}

impl OpenAiCompatBackend {
    /// Create a new OpenAI-compatible backend.
    ///
    /// # Arguments
    ///
    /// * `name` - Configured backend name (shows up in routing and logs)
    /// * `base_url` - API root without the `/v1` suffix, e.g.
    ///   "https://api.openai.com"
    /// * `api_key` - Bearer token; `None` for unauthenticated local servers
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<SecretString>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // 5 min timeout for long generations
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request builder with the bearer token applied when configured.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, self.url(path));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }
        builder
    }

    /// One-shot JSON round-trip with verbatim failure propagation.
    async fn passthrough(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, BackendError> {
        let mut builder = self.request(method, path);
        if let Some(payload) = &body {
            builder = builder.json(payload);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::Connect(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Stream(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

impl ChatBackend for OpenAiCompatBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn complete(&self, request: CompletionRequest) -> CompletionStream {
        let payload = ChatCompletionPayload {
            model: request.model,
            messages: request.messages,
            stream: true,
            temperature: Some(request.options.temperature),
        };

        let builder = self
            .request(reqwest::Method::POST, "/v1/chat/completions")
            .json(&payload);

        // EventSource::new only fails on an uncloneable request; with a
        // buffered JSON body that means a programming error, surfaced the
        // same way dispatch failures are.
        match EventSource::new(builder) {
            Ok(event_source) => completion_events(event_source),
            Err(e) => Box::pin(futures_util::stream::once(async move {
                Err(BackendError::Connect(e.to_string()))
            })),
        }
    }

    async fn list_models(&self) -> Result<serde_json::Value, BackendError> {
        self.passthrough(reqwest::Method::GET, "/v1/models", None).await
    }

    async fn model_info(&self, model: &str) -> Result<serde_json::Value, BackendError> {
        self.passthrough(reqwest::Method::GET, &format!("/v1/models/{model}"), None)
            .await
    }

    async fn embeddings(&self, model: &str, prompt: &str) -> Result<serde_json::Value, BackendError> {
        let payload = serde_json::to_value(EmbeddingsPayload {
            model: model.to_string(),
            input: prompt.to_string(),
        })
        .map_err(|e| BackendError::Decode(e.to_string()))?;
        self.passthrough(reqwest::Method::POST, "/v1/embeddings", Some(payload))
            .await
    }
}
