//! HistoryStore trait definition.
//!
//! The session store is an append-only ordered log of turns per named
//! session. Implementations live in parlance-infra (e.g.
//! `SqliteHistoryStore`). Uses native async fn in traits (RPITIT, Rust
//! 2024 edition).
//!
//! Absence is not an error anywhere on this trait: reading a session that
//! was never created yields an empty log, deleting one is a no-op, and
//! existence checks simply return false.

use parlance_types::chat::Turn;
use parlance_types::error::StoreError;

/// Store trait for per-session ordered turn logs.
pub trait HistoryStore: Send + Sync {
    /// Whether the session's log has at least one entry.
    fn exists(
        &self,
        session: &str,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;

    /// Destructive reset: drop the session's log, then seed it with a
    /// single system turn carrying `system_prompt`.
    ///
    /// Creating an existing session discards its history.
    fn create(
        &self,
        session: &str,
        system_prompt: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Remove the session's log. Returns whether anything existed.
    fn delete(
        &self,
        session: &str,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;

    /// Remove every session in the store (best-effort sequential; no
    /// cross-session atomicity). Returns the number of sessions removed.
    fn delete_all(&self) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;

    /// All turns in insertion order; empty for unknown sessions.
    ///
    /// An entry that does not decode as a [`Turn`] fails the whole read
    /// with [`StoreError::Decode`].
    fn read(
        &self,
        session: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Turn>, StoreError>> + Send;

    /// Append one turn atomically. Appends to the same session are
    /// observed in call order.
    fn append(
        &self,
        session: &str,
        turn: &Turn,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
