//! Application state wiring the gateway services together.
//!
//! The chat service is generic over the history store trait; AppState pins
//! it to the concrete SQLite implementation and owns the shared handles the
//! HTTP handlers need.

use std::sync::Arc;

use parlance_core::chat::service::ChatService;
use parlance_infra::backend::build_router;
use parlance_infra::config::{load_config, resolve_data_dir};
use parlance_infra::sqlite::history::SqliteHistoryStore;
use parlance_infra::sqlite::pool::{default_database_url, DatabasePool};
use parlance_types::config::GatewayConfig;

/// Chat service generic pinned to the SQLite history store.
pub type ConcreteChatService = ChatService<SqliteHistoryStore>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: GatewayConfig,
}

impl AppState {
    /// Initialize the application state: resolve the data directory, load
    /// configuration, connect to the store, and construct the backends.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        let db_url = config
            .store
            .database_url
            .clone()
            .unwrap_or_else(default_database_url);
        let db_pool = DatabasePool::new(&db_url).await?;

        let store = SqliteHistoryStore::new(db_pool);
        let router = Arc::new(build_router(&config.backends));
        let chat_service = ChatService::new(store, router);

        Ok(Self {
            chat_service: Arc::new(chat_service),
            config,
        })
    }
}
