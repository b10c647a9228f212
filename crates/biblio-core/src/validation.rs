//! # Validation Module
//!
//! Input validation utilities for Biblio.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console (apps/cli)                                           │
//! │  ├── Trims input, re-prompts on empty fields                           │
//! │  └── Parses identities before register/borrow                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Identity format rule                                              │
//! │  └── Required-field checks                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── PRIMARY KEY on members.identity                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use biblio_core::validation::{is_valid_identity, validate_required};
//!
//! assert!(is_valid_identity("12345678Z"));
//! assert!(validate_required("title", "  ").is_err());
//! ```

use crate::error::ValidationError;
use crate::{IDENTITY_CHECK_LETTERS, IDENTITY_DIGITS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identity
// =============================================================================

/// Returns true iff `identity` is 8 ASCII digits followed by a check letter.
///
/// ## Rules
/// - Exactly 9 characters
/// - Characters 1-8 are ASCII digits
/// - Character 9 is an uppercase letter other than `I`, `O`, `U`
///
/// Only the format is checked. Whether the letter matches the digits is
/// not, so `12345678A` is accepted.
///
/// ## Example
/// ```rust
/// use biblio_core::validation::is_valid_identity;
///
/// assert!(is_valid_identity("12345678A"));
/// assert!(!is_valid_identity("1234567A"));  // 7 digits
/// assert!(!is_valid_identity("12345678a")); // lowercase
/// assert!(!is_valid_identity("12345678O")); // excluded letter
/// ```
pub fn is_valid_identity(identity: &str) -> bool {
    let bytes = identity.as_bytes();

    if bytes.len() != IDENTITY_DIGITS + 1 {
        return false;
    }

    let (digits, letter) = bytes.split_at(IDENTITY_DIGITS);

    digits.iter().all(u8::is_ascii_digit) && IDENTITY_CHECK_LETTERS.as_bytes().contains(&letter[0])
}

/// Validates an identity, describing what is wrong when it fails.
///
/// ## Rules
/// - Must not be empty
/// - Must satisfy [`is_valid_identity`]
///
/// Input is not trimmed here; trimming belongs to the caller.
pub fn validate_identity(identity: &str) -> ValidationResult<()> {
    if identity.is_empty() {
        return Err(ValidationError::Required {
            field: "identity".to_string(),
        });
    }

    if !is_valid_identity(identity) {
        return Err(ValidationError::InvalidFormat {
            field: "identity".to_string(),
            reason: "expected 8 digits followed by a check letter (e.g. 12345678Z)".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Free-text Fields
// =============================================================================

/// Validates that a free-text field (name, title, author) is not blank.
///
/// ## Example
/// ```rust
/// use biblio_core::validation::validate_required;
///
/// assert!(validate_required("author", "Mercè Rodoreda").is_ok());
/// assert!(validate_required("author", "").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
