//! SQLite session history store.
//!
//! Implements `HistoryStore` from `parlance-core` using sqlx with split
//! read/write pools. Each session is an append-only run of rows in the
//! `chat_history` table, keyed `chat_history:<name>` and ordered by the
//! autoincrement `seq` column. Turns are stored as JSON text and decoded
//! on read; a row that fails to decode is a hard error, not a skip, since
//! silently dropping turns would corrupt the conversation sent upstream.

use parlance_core::history::store::HistoryStore;
use parlance_types::chat::{Role, Turn};
use parlance_types::error::StoreError;
use sqlx::Row;

use super::pool::DatabasePool;

/// Prefix shared by every session's storage key.
const KEY_PREFIX: &str = "chat_history:";

/// SQLite-backed implementation of `HistoryStore`.
pub struct SqliteHistoryStore {
    pool: DatabasePool,
}

impl SqliteHistoryStore {
    /// Create a new history store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn key(session: &str) -> String {
        format!("{KEY_PREFIX}{session}")
    }
}

fn encode_turn(turn: &Turn) -> Result<String, StoreError> {
    serde_json::to_string(turn).map_err(|e| StoreError::Query(format!("failed to encode turn: {e}")))
}

impl HistoryStore for SqliteHistoryStore {
    async fn exists(&self, session: &str) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM chat_history WHERE key = ?) AS present")
            .bind(Self::key(session))
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let present: i64 = row
            .try_get("present")
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(present != 0)
    }

    async fn create(&self, session: &str, system_prompt: &str) -> Result<(), StoreError> {
        let key = Self::key(session);
        let system_turn = encode_turn(&Turn::new(Role::System, system_prompt))?;

        // Reset, then seed with the system turn. The writer pool is a single
        // connection, so the two statements cannot interleave with another
        // create on the same key.
        sqlx::query("DELETE FROM chat_history WHERE key = ?")
            .bind(&key)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        sqlx::query("INSERT INTO chat_history (key, turn) VALUES (?, ?)")
            .bind(&key)
            .bind(&system_turn)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, session: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM chat_history WHERE key = ?")
            .bind(Self::key(session))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let rows = sqlx::query("SELECT DISTINCT key FROM chat_history WHERE key LIKE ?")
            .bind(format!("{KEY_PREFIX}%"))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        // Per-key deletes, mirroring a scan-and-delete: sessions created
        // after the scan survive, which is acceptable for a reset operation.
        let mut removed = 0u64;
        for row in &rows {
            let key: String = row
                .try_get("key")
                .map_err(|e| StoreError::Query(e.to_string()))?;
            sqlx::query("DELETE FROM chat_history WHERE key = ?")
                .bind(&key)
                .execute(&self.pool.writer)
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;
            removed += 1;
        }

        Ok(removed)
    }

    async fn read(&self, session: &str) -> Result<Vec<Turn>, StoreError> {
        let rows = sqlx::query("SELECT turn FROM chat_history WHERE key = ? ORDER BY seq")
            .bind(Self::key(session))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let raw: String = row
                .try_get("turn")
                .map_err(|e| StoreError::Query(e.to_string()))?;
            let turn: Turn =
                serde_json::from_str(&raw).map_err(|e| StoreError::Decode(e.to_string()))?;
            turns.push(turn);
        }

        Ok(turns)
    }

    async fn append(&self, session: &str, turn: &Turn) -> Result<(), StoreError> {
        let encoded = encode_turn(turn)?;

        sqlx::query("INSERT INTO chat_history (key, turn) VALUES (?, ?)")
            .bind(Self::key(session))
            .bind(&encoded)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }
}
