//! # biblio-core: Pure Lending Rules for Biblio
//!
//! This crate is the **heart** of Biblio. It contains the loan/inventory
//! state machine and the identity rule as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Biblio Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Console (apps/cli)                           │   │
//! │  │    prompts, menus, listing, configuration                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ biblio-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐   ┌────────────┐   ┌────────────┐            │   │
//! │  │   │   types    │   │  lending   │   │ validation │            │   │
//! │  │   │  Identity  │   │  Policy    │   │  identity  │            │   │
//! │  │   │ Book/Member│   │ LoanState  │   │  format    │            │   │
//! │  │   └────────────┘   └────────────┘   └────────────┘            │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  biblio-db (Database Layer)                     │   │
//! │  │         SQLite repositories, migrations, LendingService         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records and identifiers (Member, Book, Identity, BookId)
//! - [`lending`] - Loan state and the borrow/return decision rules
//! - [`error`] - Domain error types
//! - [`validation`] - Identity format rule and required-field checks
//!
//! ## Example Usage
//!
//! ```rust
//! use biblio_core::{BookId, Identity, LendingPolicy, LoanState};
//!
//! let member = Identity::parse("12345678Z").unwrap();
//! let policy = LendingPolicy::default();
//!
//! // An available book may be lent to a member holding no other books.
//! assert!(policy
//!     .check_borrow(BookId::new(1), &LoanState::Available, &member, 0)
//!     .is_ok());
//!
//! // The same member at the limit is refused.
//! assert!(policy
//!     .check_borrow(BookId::new(2), &LoanState::Available, &member, 3)
//!     .is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lending;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use lending::{LendingPolicy, LoanState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of books a single identity may hold at once.
///
/// ## Business Reason
/// Keeps a small collection circulating. Can be overridden through
/// [`LendingPolicy::with_max_loans`] when a deployment needs another value.
pub const MAX_LOANS_PER_MEMBER: u32 = 3;

/// Check letters accepted at the end of an identity.
///
/// The 26 uppercase letters minus `I`, `O` and `U`, which are left out of
/// the scheme because they read too much like digits.
pub const IDENTITY_CHECK_LETTERS: &str = "ABCDEFGHJKLMNPQRSTVWXYZ";

/// Number of leading digits in an identity.
pub const IDENTITY_DIGITS: usize = 8;
