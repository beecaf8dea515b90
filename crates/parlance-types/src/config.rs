//! Gateway configuration, deserialized from `config.toml`.
//!
//! Resolved once at startup. The defaults reproduce a single local Ollama
//! backend with the SQLite store in the data directory, so a bare install
//! works with no config file at all.

use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;

/// Top-level configuration for the gateway process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub backends: Vec<BackendConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            backends: vec![BackendConfig::default()],
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Session store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Override the SQLite database URL; when absent the store lives at
    /// `{data_dir}/parlance.db`.
    pub database_url: Option<String>,
}

/// One configured model backend.
///
/// Order matters: the router scans backends in configuration order and the
/// first prefix match wins. A model id with no matching prefix is sent to
/// the first configured backend unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name used in logs and for explicit selection (`/models?backend=`).
    pub name: String,
    pub kind: BackendKind,
    pub base_url: String,
    /// Routing prefix stripped from model ids before dispatch
    /// (e.g. `"ollama/"`). Optional for single-backend deployments.
    #[serde(default)]
    pub prefix: Option<String>,
    /// Bearer token for backends that require one. Wrapped in a
    /// `SecretString` at adapter construction; kept plain here so the
    /// types crate stays serde-only.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            name: "ollama".to_string(),
            kind: BackendKind::Ollama,
            base_url: "http://localhost:11434".to_string(),
            prefix: Some("ollama/".to_string()),
            api_key: None,
        }
    }
}
