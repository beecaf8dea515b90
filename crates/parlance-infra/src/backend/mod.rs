//! LLM backend implementations.
//!
//! Contains concrete implementations of the [`ChatBackend`] trait defined
//! in `parlance-core`: the Ollama native API (blocking client, bridged) and
//! the OpenAI-compatible API (native async SSE).
//!
//! Also provides the backend factory ([`create_backend`]) that constructs
//! the right adapter from a [`BackendConfig`], and [`build_router`], which
//! assembles the routing table in configuration order.

pub mod ollama;
pub mod openai_compat;

use secrecy::SecretString;

use parlance_core::backend::box_adapter::BoxBackend;
use parlance_core::backend::router::BackendRouter;
use parlance_types::backend::BackendKind;
use parlance_types::config::BackendConfig;

use self::ollama::OllamaBackend;
use self::openai_compat::OpenAiCompatBackend;

/// Create a [`BoxBackend`] from a [`BackendConfig`].
///
/// Construction is infallible: an OpenAI-compatible backend without an API
/// key is a valid configuration (local vLLM and llama.cpp servers run
/// unauthenticated), and Ollama never takes one.
pub fn create_backend(config: &BackendConfig) -> BoxBackend {
    match config.kind {
        BackendKind::Ollama => {
            BoxBackend::new(OllamaBackend::new(&config.name, &config.base_url))
        }
        BackendKind::OpenAiCompat => {
            let api_key = config
                .api_key
                .as_ref()
                .map(|key| SecretString::from(key.clone()));
            BoxBackend::new(OpenAiCompatBackend::new(
                &config.name,
                &config.base_url,
                api_key,
            ))
        }
    }
}

/// Assemble the routing table from configuration, in declaration order.
///
/// Order matters twice: the first matching prefix wins, and models without
/// any prefix go to the first entry.
pub fn build_router(backends: &[BackendConfig]) -> BackendRouter {
    let mut router = BackendRouter::new();
    for config in backends {
        tracing::debug!(
            name = %config.name,
            kind = %config.kind,
            prefix = config.prefix.as_deref().unwrap_or(""),
            base_url = %config.base_url,
            "Backend registered"
        );
        router.register(config.prefix.clone(), create_backend(config));
    }
    router
}
