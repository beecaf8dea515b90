//! Ollama native API types.
//!
//! Request/response structures for the Ollama HTTP API (`/api/chat` and
//! friends). These are Ollama-specific wire shapes, not the generic types
//! from `parlance-types` -- though a [`Turn`] already serializes to the
//! `{role, content}` object Ollama expects, so messages reuse it directly.

use serde::{Deserialize, Serialize};

use parlance_types::chat::{GenerationOptions, Turn};

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatPayload {
    pub model: String,
    pub messages: Vec<Turn>,
    pub stream: bool,
    pub options: OptionsPayload,
}

/// The `options` object Ollama accepts on generation requests.
///
/// Both the seed and the temperature go through; Ollama honors them natively.
#[derive(Debug, Clone, Serialize)]
pub struct OptionsPayload {
    pub seed: i64,
    pub temperature: f64,
}

impl From<GenerationOptions> for OptionsPayload {
    fn from(options: GenerationOptions) -> Self {
        Self {
            seed: options.seed,
            temperature: options.temperature,
        }
    }
}

/// One NDJSON line of a streamed `/api/chat` response.
///
/// Mid-stream lines carry `message.content` with `done: false`; the final
/// line has `done: true` and timing fields we ignore. A server-side failure
/// arrives as a line with only an `error` field.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub message: Option<ChunkMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// The `message` object inside a chat chunk.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkMessage {
    #[serde(default)]
    pub content: String,
}

/// Request body for `POST /api/show`.
#[derive(Debug, Clone, Serialize)]
pub struct ShowPayload {
    pub name: String,
}

/// Request body for `POST /api/embeddings`.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingsPayload {
    pub model: String,
    pub prompt: String,
}
