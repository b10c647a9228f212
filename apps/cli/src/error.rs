//! # Console Error Type
//!
//! Unified error type for console commands and menu actions.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Console                            │
//! │                                                                         │
//! │  Command / menu action                                                 │
//! │  Result<(), CliError>                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Rule violated? ─── DbError::Domain(CoreError) ──► CliError (kept msg) │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Storage failed? ── DbError::QueryFailed(..) ───► tracing::error! +    │
//! │         │                                         generic CliError     │
//! │         ▼                                                               │
//! │  Success                                                               │
//! │                                                                         │
//! │  Menu:     recoverable errors are printed and the loop goes on         │
//! │  One-shot: every error is printed and mapped to an exit code           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use biblio_core::{CoreError, ValidationError};
use biblio_db::DbError;
use serde::Serialize;

use crate::config::ConfigError;

/// Error returned by console commands.
///
/// ## Serialization
/// With `--json`, failures are printed as:
/// ```json
/// {
///   "code": "LIMIT_EXCEEDED",
///   "message": "12345678Z already has 3 books on loan"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for console failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown book or member
    NotFound,

    /// Malformed or missing input
    ValidationError,

    /// Duplicate member, book already lent or not lent
    Conflict,

    /// Borrower already holds the maximum number of books
    LimitExceeded,

    /// Storage failure
    DatabaseError,

    /// Unusable configuration
    ConfigError,

    /// Input ended before a prompt was answered
    Cancelled,

    /// Console I/O failure
    Internal,
}

impl ErrorCode {
    /// Process exit status for one-shot commands.
    ///
    /// Rule violations exit with 1; environment failures with 2.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCode::NotFound
            | ErrorCode::ValidationError
            | ErrorCode::Conflict
            | ErrorCode::LimitExceeded
            | ErrorCode::Cancelled => 1,
            ErrorCode::DatabaseError | ErrorCode::ConfigError | ErrorCode::Internal => 2,
        }
    }
}

impl CliError {
    /// Creates a new console error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }

    /// Whether the interactive menu can report this and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::NotFound
                | ErrorCode::ValidationError
                | ErrorCode::Conflict
                | ErrorCode::LimitExceeded
        )
    }
}

/// Converts database errors to console errors.
impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(e) => CliError::from(e),
            DbError::UniqueViolation { field } => {
                CliError::new(ErrorCode::Conflict, format!("Duplicate value for {}", field))
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                CliError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to console errors.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::MemberNotFound(_) | CoreError::BookNotFound(_) => ErrorCode::NotFound,
            CoreError::DuplicateMember(_)
            | CoreError::AlreadyLoaned { .. }
            | CoreError::NotLoaned(_) => ErrorCode::Conflict,
            CoreError::BorrowLimitExceeded { .. } => ErrorCode::LimitExceeded,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        match err {
            // Drop the "Validation error:" prefix; the field name says enough.
            CoreError::Validation(e) => CliError::from(e),
            other => CliError::new(code, other.to_string()),
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            return CliError::new(ErrorCode::Cancelled, "Input ended");
        }
        tracing::error!("Console I/O failed: {}", err);
        CliError::internal(format!("Console I/O failed: {}", err))
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}
