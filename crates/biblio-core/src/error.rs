//! # Error Types
//!
//! Domain-specific error types for biblio-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  biblio-core errors (this file)                                        │
//! │  ├── CoreError        - Lending and registry rule violations           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  biblio-db errors (separate crate)                                     │
//! │  └── DbError          - Wraps CoreError + storage failures             │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - Code + message shown to the operator           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → CliError → Console      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are fatal. Every variant describes a violated precondition;
//! the caller reports it and carries on.

use thiserror::Error;

use crate::types::{BookId, Identity};

// =============================================================================
// Core Error
// =============================================================================

/// Lending and registry rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A member with this identity is already registered.
    #[error("A member with identity {0} already exists")]
    DuplicateMember(String),

    /// No member is registered under this identity.
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    /// No book carries this id (never existed or was removed).
    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    /// The book is already on loan.
    ///
    /// ## User Workflow
    /// ```text
    /// borrow(book 7, 87654321X)
    ///      │
    ///      ▼
    /// book 7 is on loan to 12345678Z
    ///      │
    ///      ▼
    /// AlreadyLoaned { book_id: 7, borrower: 12345678Z }
    /// ```
    #[error("Book {book_id} is already on loan to {borrower}")]
    AlreadyLoaned { book_id: BookId, borrower: Identity },

    /// The book is available, so there is nothing to return.
    #[error("Book {0} is not on loan")]
    NotLoaned(BookId),

    /// The identity already holds the maximum number of books.
    #[error("{identity} already has {limit} books on loan")]
    BorrowLimitExceeded { identity: Identity, limit: u32 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g. a malformed identity).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::AlreadyLoaned {
            book_id: BookId::new(7),
            borrower: Identity::parse("12345678Z").unwrap(),
        };
        assert_eq!(err.to_string(), "Book 7 is already on loan to 12345678Z");

        let err = CoreError::BorrowLimitExceeded {
            identity: Identity::parse("12345678Z").unwrap(),
            limit: 3,
        };
        assert_eq!(err.to_string(), "12345678Z already has 3 books on loan");

        assert_eq!(
            CoreError::NotLoaned(BookId::new(2)).to_string(),
            "Book 2 is not on loan"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "title".to_string(),
        };
        assert_eq!(err.to_string(), "title is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "identity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
