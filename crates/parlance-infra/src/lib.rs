//! Infrastructure layer for Parlance.
//!
//! Contains implementations of the ports defined in `parlance-core`:
//! SQLite session history storage and the concrete LLM backend adapters
//! (Ollama, OpenAI-compatible), plus the gateway config loader.

pub mod backend;
pub mod config;
pub mod sqlite;
