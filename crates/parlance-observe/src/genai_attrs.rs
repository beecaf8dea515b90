//! OpenTelemetry GenAI Semantic Convention attribute constants.
//!
//! These follow the OTel GenAI Semantic Conventions specification for consistent
//! LLM call instrumentation across the codebase. All constants are string slices
//! usable as `tracing::Span::record` field names.

// --- Required attributes ---

/// The name of the operation being performed (e.g., "chat").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (the configured backend name, e.g., "ollama").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

// --- Recommended attributes ---

/// The model ID requested (e.g., "llama3.1").
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// The sampling temperature for the request.
pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";

/// The sampling seed for the request.
pub const GEN_AI_REQUEST_SEED: &str = "gen_ai.request.seed";

// --- Operation name values ---

/// Standard chat completion operation.
pub const OP_CHAT: &str = "chat";

/// Build the span covering a single chat completion dispatch.
///
/// Fields are declared empty in the macro and recorded through the attribute
/// constants so the names stay aligned with the convention in one place.
pub fn chat_span(provider: &str, model: &str, temperature: f64, seed: i64) -> tracing::Span {
    let span = tracing::info_span!(
        "chat",
        gen_ai.operation.name = OP_CHAT,
        gen_ai.provider.name = tracing::field::Empty,
        gen_ai.request.model = tracing::field::Empty,
        gen_ai.request.temperature = tracing::field::Empty,
        gen_ai.request.seed = tracing::field::Empty,
    );
    span.record(GEN_AI_PROVIDER_NAME, provider);
    span.record(GEN_AI_REQUEST_MODEL, model);
    span.record(GEN_AI_REQUEST_TEMPERATURE, temperature);
    span.record(GEN_AI_REQUEST_SEED, seed);
    span
}
