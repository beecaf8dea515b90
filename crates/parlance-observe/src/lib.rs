//! Observability for Parlance: tracing subscriber setup and GenAI
//! semantic-convention instrumentation helpers.

pub mod genai_attrs;
pub mod tracing_setup;
