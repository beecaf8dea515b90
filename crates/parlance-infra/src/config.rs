//! Gateway configuration loader for Parlance.
//!
//! Reads `config.toml` from the data directory (`~/.parlance/` in production)
//! and deserializes it into [`GatewayConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed, so a bare install serves the local
//! Ollama daemon without any configuration.

use std::path::{Path, PathBuf};

use parlance_types::config::GatewayConfig;

/// Load gateway configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GatewayConfig::default()`]
///   (one local Ollama backend on `localhost:11434`).
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> GatewayConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GatewayConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GatewayConfig::default();
        }
    };

    match toml::from_str::<GatewayConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GatewayConfig::default()
        }
    }
}

/// Resolve the data directory from `PARLANCE_DATA_DIR`, falling back to
/// `~/.parlance`.
pub fn resolve_data_dir() -> PathBuf {
    match std::env::var("PARLANCE_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".parlance")
        }
    }
}
