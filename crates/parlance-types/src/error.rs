use thiserror::Error;

use crate::backend::BackendError;

/// Errors from session store operations (used by trait definitions in
/// parlance-core).
///
/// A missing session is never an error: reads return an empty log, deletes
/// are no-ops, and existence checks return false.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("corrupt log entry: {0}")]
    Decode(String),
}

/// Errors surfaced by the chat orchestrator before streaming begins.
///
/// Mid-stream failures are not `ChatError`s -- they travel as `Err` items
/// inside the fragment stream and end the response abnormally.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}
