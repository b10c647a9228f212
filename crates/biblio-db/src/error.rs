//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Lending rule violated (CoreError)     SQLite Error (sqlx::Error)      │
//! │       │                                      │                          │
//! │       ▼                                      ▼                          │
//! │  DbError::Domain                  DbError::{QueryFailed, ...}          │
//! │       │                                      │                          │
//! │       └──────────────────┬───────────────────┘                          │
//! │                          ▼                                              │
//! │  CliError (in apps/cli) ← code + message for the operator              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use biblio_core::CoreError;
use thiserror::Error;

/// Storage errors.
///
/// Domain outcomes (not found, duplicate, already loaned, ...) travel in
/// [`DbError::Domain`]; every other variant is an infrastructure failure.
#[derive(Debug, Error)]
pub enum DbError {
    /// A lending or registry rule was violated.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// A UNIQUE or PRIMARY KEY constraint rejected a write.
    ///
    /// `MemberRepository::register` turns this into
    /// `CoreError::DuplicateMember`; it only escapes for other tables.
    /// SQLite names the column but not the value.
    #[error("Duplicate value for {field}")]
    UniqueViolation { field: String },

    /// The database file could not be opened, or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// An embedded migration could not be applied.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A borrow/return transaction could not begin or commit.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Anything else reported by sqlx (decode errors, I/O, ...).
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
        }
    }

    /// Returns the domain error, if this is one.
    pub fn domain(&self) -> Option<&CoreError> {
        match self {
            DbError::Domain(err) => Some(err),
            _ => None,
        }
    }

    /// Checks if this error reports an unknown book or member.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.domain(),
            Some(CoreError::BookNotFound(_)) | Some(CoreError::MemberNotFound(_))
        )
    }
}

/// ```text
/// sqlx::Error::Database (UNIQUE)  → DbError::UniqueViolation
/// sqlx::Error::Database (other)   → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut       → DbError::PoolExhausted
/// sqlx::Error::PoolClosed         → DbError::ConnectionFailed
/// anything else                   → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>"; a TEXT primary
                // key reports the same message.
                match msg.strip_prefix("UNIQUE constraint failed: ") {
                    Some(field) => DbError::duplicate(field),
                    None => DbError::QueryFailed(msg.to_string()),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
