//! Database error types for xfer-db.

use thiserror::Error;
use xfer_core::enums::RequestStatus;
use xfer_core::errors::CoreError;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unusable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// The referenced row does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Domain error surfaced while decoding rows.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a status transition did not happen.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// The request does not exist.
    #[error("Request {0} not found")]
    NotFound(i64),

    /// The stored status is not the one the caller expected.
    #[error("Transition conflict on request {request_id}: expected {expected}, found {actual}")]
    Conflict {
        request_id: i64,
        expected: RequestStatus,
        actual: RequestStatus,
    },

    /// The target status can never be written.
    #[error("Invalid transition target: {0}")]
    InvalidStatus(RequestStatus),

    /// The store failed; nothing was changed.
    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

impl From<libsql::Error> for TransitionError {
    fn from(error: libsql::Error) -> Self {
        Self::Storage(DatabaseError::LibSql(error))
    }
}
