//! OpenAI chat-completions wire types.
//!
//! Request/response structures for `/v1/chat/completions` as served by
//! OpenAI and the compatible ecosystem (vLLM, llama.cpp server, LM Studio,
//! and others). Only the streaming subset this gateway needs is modeled;
//! everything else in the chunks is ignored by serde.

use serde::{Deserialize, Serialize};

use parlance_types::chat::Turn;

/// Request body for `POST /v1/chat/completions` with `stream: true`.
///
/// The seed knob is deliberately absent: support for it varies across
/// compatible servers, and a silently ignored parameter is worse than a
/// documented gap. Temperature is universal and goes through.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionPayload {
    pub model: String,
    pub messages: Vec<Turn>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// One SSE `data:` payload of a streamed chat completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

impl ChatCompletionChunk {
    /// The text delta of the first choice, if any.
    ///
    /// Role-only openers, usage-only trailers, and finish-reason chunks all
    /// come back as `None`.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.delta.content.as_deref())
    }
}

/// A single choice inside a streaming chunk.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The incremental delta of a choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

/// Request body for `POST /v1/embeddings`.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingsPayload {
    pub model: String,
    pub input: String,
}
