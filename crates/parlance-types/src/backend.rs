//! Backend adapter types: completion requests, stream events, and errors.
//!
//! These types model the provider-agnostic surface every backend adapter
//! implements. Fragments are opaque text; the gateway never parses or
//! reframes them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::chat::{GenerationOptions, Turn};

/// A streaming completion request as seen by a backend adapter.
///
/// `model` is the backend-native identifier -- any routing prefix has
/// already been stripped by the router.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Turn>,
    pub options: GenerationOptions,
}

/// Events emitted by a backend completion stream.
///
/// End of generation is always signalled by the explicit [`Done`] sentinel
/// rather than by exhausting the stream, so callers can distinguish a
/// natural finish from a torn connection.
///
/// [`Done`]: CompletionEvent::Done
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionEvent {
    /// One piece of generated text. May be empty: some backends emit
    /// heartbeat and role-only deltas, which adapters pass through and the
    /// orchestrator drops instead of forwarding.
    Fragment(String),
    /// The backend reported natural end of generation.
    Done,
}

/// Errors from backend adapter operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend answered with a non-2xx status. For pass-through
    /// operations the gateway propagates `status` and `body` verbatim.
    #[error("backend returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("backend connection failed: {0}")]
    Connect(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("decode error: {0}")]
    Decode(String),
}

/// Kind of backend adapter to construct for a configured backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Ollama,
    #[serde(rename = "openai_compat")]
    OpenAiCompat,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Ollama => write!(f, "ollama"),
            BackendKind::OpenAiCompat => write!(f, "openai_compat"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(BackendKind::Ollama),
            "openai_compat" => Ok(BackendKind::OpenAiCompat),
            other => Err(format!("invalid backend kind: '{other}'")),
        }
    }
}
