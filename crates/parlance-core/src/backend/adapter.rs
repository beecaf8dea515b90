//! ChatBackend trait definition.
//!
//! This is the core abstraction that all model backends implement.
//! Uses RPITIT for the pass-through operations and `Pin<Box<dyn Stream>>`
//! for `complete` (streams need to be object-safe for the BoxBackend
//! wrapper).

use std::pin::Pin;

use futures_util::Stream;

use parlance_types::backend::{BackendError, CompletionEvent, CompletionRequest};

/// A backend completion stream: text fragments terminated by the
/// [`CompletionEvent::Done`] sentinel, with failures as `Err` items.
pub type CompletionStream =
    Pin<Box<dyn Stream<Item = Result<CompletionEvent, BackendError>> + Send + 'static>>;

/// Trait for model backends (Ollama, OpenAI-compatible, etc.).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition) for the
/// pass-through operations. `complete` returns a boxed stream because
/// streams need to be object-safe for [`BoxBackend`].
///
/// Implementations live in parlance-infra. Two families exist: natively
/// async backends build the stream directly; backends with only a blocking
/// client build it through [`bridge::blocking_stream`], which keeps every
/// pull off the async runtime's reactor threads. Callers never see the
/// difference.
///
/// [`BoxBackend`]: super::box_adapter::BoxBackend
/// [`bridge::blocking_stream`]: super::bridge::blocking_stream
pub trait ChatBackend: Send + Sync {
    /// Configured backend name (e.g. "ollama", "openai").
    fn name(&self) -> &str;

    /// Start a streaming chat completion.
    ///
    /// Dispatch failures (connection refused, non-2xx on open) surface as
    /// the first and only item of the stream.
    fn complete(&self, request: CompletionRequest) -> CompletionStream;

    /// The backend's native model-list payload, passed through untouched.
    fn list_models(
        &self,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, BackendError>> + Send;

    /// The backend's native metadata payload for one model, passed through
    /// untouched.
    fn model_info(
        &self,
        model: &str,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, BackendError>> + Send;

    /// The backend's native embeddings payload, passed through untouched.
    fn embeddings(
        &self,
        model: &str,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<serde_json::Value, BackendError>> + Send;
}
