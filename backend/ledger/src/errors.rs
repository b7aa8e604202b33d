//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Contract or vendor absent; the caller surfaces this as a 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected input; the message carries the offending values so the
    /// caller can render a precise 400.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Concurrent-write signal from the storage layer; the caller should
    /// retry once rather than swallow it.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A stored row failed to parse (malformed amount or timestamp).
    #[error("Data error: {0}")]
    Data(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

// SQLite primary result codes for a locked database; sqlx exposes them as
// string error codes.
const SQLITE_BUSY: &str = "5";
const SQLITE_LOCKED: &str = "6";

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if let Some(code) = db.code() {
                if code == SQLITE_BUSY || code == SQLITE_LOCKED {
                    return LedgerError::Conflict(db.message().to_string());
                }
            }
        }
        LedgerError::Database(err)
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
