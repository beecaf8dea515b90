//! Chat protocol types: turns, generation options, and the chat request.
//!
//! A [`Turn`] is the unit of conversation both on the wire and in the
//! session store -- every stored log entry is one JSON-encoded turn, and
//! the `/chat` request body carries a list of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reserved session name meaning "no persistence".
///
/// Requests against the ephemeral session never touch the store: no history
/// is read and nothing is recorded, regardless of the `record` flag.
pub const EPHEMERAL_SESSION: &str = "empty";

/// Reserved name accepted by session deletion meaning "every session".
pub const WILDCARD_SESSION: &str = "*";

/// Role of a turn in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

/// A single conversation turn.
///
/// This is both the request wire shape and the stored log-entry shape; the
/// two must stay identical so history entries decode straight into the
/// message set sent to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    /// Convenience constructor.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Sampling options forwarded to the backend.
///
/// Unsupported options are silently dropped per backend. In particular,
/// `seed` is only forwarded on backends whose native API accepts it and may
/// be a no-op for a given request depending on where the model is served.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default = "default_seed")]
    pub seed: i64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_seed() -> i64 {
    101
}

fn default_temperature() -> f64 {
    0.0
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            temperature: default_temperature(),
        }
    }
}

/// Request body for the streaming `/chat` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Session name; defaults to the ephemeral sentinel.
    #[serde(default = "default_session")]
    pub session: String,
    /// Whether to record this exchange in the session log.
    #[serde(default = "default_record")]
    pub record: bool,
    /// Model identifier, optionally carrying a backend routing prefix.
    pub model: String,
    /// New turns for this exchange (history is merged in server-side).
    pub messages: Vec<Turn>,
    #[serde(default)]
    pub options: GenerationOptions,
}

fn default_session() -> String {
    EPHEMERAL_SESSION.to_string()
}

fn default_record() -> bool {
    true
}

impl ChatRequest {
    /// True when this request targets the reserved no-persistence session.
    pub fn is_ephemeral(&self) -> bool {
        self.session == EPHEMERAL_SESSION
    }
}
