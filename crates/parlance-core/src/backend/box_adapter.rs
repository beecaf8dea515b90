//! BoxBackend -- object-safe dynamic dispatch wrapper for ChatBackend.
//!
//! The usual workaround for RPITIT traits not being object-safe:
//! 1. Define an object-safe `ChatBackendDyn` trait with boxed futures
//! 2. Blanket-impl `ChatBackendDyn` for all `T: ChatBackend`
//! 3. `BoxBackend` wraps `Box<dyn ChatBackendDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use parlance_types::backend::{BackendError, CompletionRequest};

use super::adapter::{ChatBackend, CompletionStream};

/// Object-safe version of [`ChatBackend`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn ChatBackendDyn`).
/// A blanket implementation is provided for all types implementing
/// `ChatBackend`.
pub trait ChatBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn complete_boxed(&self, request: CompletionRequest) -> CompletionStream;

    fn list_models_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, BackendError>> + Send + 'a>>;

    fn model_info_boxed<'a>(
        &'a self,
        model: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, BackendError>> + Send + 'a>>;

    fn embeddings_boxed<'a>(
        &'a self,
        model: &'a str,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, BackendError>> + Send + 'a>>;
}

/// Blanket implementation: any `ChatBackend` automatically implements
/// `ChatBackendDyn`.
impl<T: ChatBackend> ChatBackendDyn for T {
    fn name(&self) -> &str {
        ChatBackend::name(self)
    }

    fn complete_boxed(&self, request: CompletionRequest) -> CompletionStream {
        self.complete(request)
    }

    fn list_models_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, BackendError>> + Send + 'a>> {
        Box::pin(self.list_models())
    }

    fn model_info_boxed<'a>(
        &'a self,
        model: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, BackendError>> + Send + 'a>> {
        Box::pin(self.model_info(model))
    }

    fn embeddings_boxed<'a>(
        &'a self,
        model: &'a str,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, BackendError>> + Send + 'a>> {
        Box::pin(self.embeddings(model, prompt))
    }
}

/// Type-erased backend for runtime selection.
///
/// Since `ChatBackend` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxBackend` provides equivalent methods that delegate to the
/// inner `ChatBackendDyn` trait object.
pub struct BoxBackend {
    inner: Box<dyn ChatBackendDyn + Send + Sync>,
}

impl BoxBackend {
    /// Wrap a concrete `ChatBackend` in a type-erased box.
    pub fn new<T: ChatBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    /// Configured backend name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Start a streaming chat completion.
    pub fn complete(&self, request: CompletionRequest) -> CompletionStream {
        self.inner.complete_boxed(request)
    }

    /// The backend's native model-list payload.
    pub async fn list_models(&self) -> Result<serde_json::Value, BackendError> {
        self.inner.list_models_boxed().await
    }

    /// The backend's native metadata payload for one model.
    pub async fn model_info(&self, model: &str) -> Result<serde_json::Value, BackendError> {
        self.inner.model_info_boxed(model).await
    }

    /// The backend's native embeddings payload.
    pub async fn embeddings(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<serde_json::Value, BackendError> {
        self.inner.embeddings_boxed(model, prompt).await
    }
}
