//! # Lending Rules
//!
//! The loan state machine and the decisions that gate its two transitions.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Book Loan State                                  │
//! │                                                                         │
//! │                      borrow(id, identity)                               │
//! │                 ┌──────────────────────────┐                            │
//! │                 │                          ▼                            │
//! │          ┌─────────────┐           ┌──────────────────┐                │
//! │  add ──► │  Available  │           │ OnLoan(identity) │                │
//! │          └─────────────┘           └──────────────────┘                │
//! │                 ▲                          │                            │
//! │                 └──────────────────────────┘                            │
//! │                        return(id)                                       │
//! │                                                                         │
//! │  borrow checks, in order:                                              │
//! │   1. book exists           → BookNotFound                              │
//! │   2. book is Available     → AlreadyLoaned                             │
//! │   3. identity loans < max  → BorrowLimitExceeded                       │
//! │                                                                         │
//! │  return checks, in order:                                              │
//! │   1. book exists           → BookNotFound                              │
//! │   2. book is OnLoan        → NotLoaned                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Existence is checked by the storage layer before these functions run; what
//! remains here is pure and needs no database to test.
//!
//! The limit counts loans held by an identity across the whole catalog. It
//! does not ask whether that identity is a registered member.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::types::{BookId, Identity};
use crate::MAX_LOANS_PER_MEMBER;

// =============================================================================
// Loan State
// =============================================================================

/// Whether a book is on the shelf or lent out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "borrower", rename_all = "snake_case")]
pub enum LoanState {
    /// On the shelf.
    #[default]
    Available,
    /// Lent to this identity.
    OnLoan(Identity),
}

impl LoanState {
    /// Returns the borrower, if any.
    pub fn borrower(&self) -> Option<&Identity> {
        match self {
            LoanState::Available => None,
            LoanState::OnLoan(identity) => Some(identity),
        }
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        matches!(self, LoanState::Available)
    }
}

impl From<Option<Identity>> for LoanState {
    fn from(borrower: Option<Identity>) -> Self {
        match borrower {
            Some(identity) => LoanState::OnLoan(identity),
            None => LoanState::Available,
        }
    }
}

impl From<LoanState> for Option<Identity> {
    fn from(state: LoanState) -> Self {
        match state {
            LoanState::Available => None,
            LoanState::OnLoan(identity) => Some(identity),
        }
    }
}

impl fmt::Display for LoanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanState::Available => write!(f, "Available"),
            LoanState::OnLoan(identity) => write!(f, "On loan to {}", identity),
        }
    }
}

// =============================================================================
// Lending Policy
// =============================================================================

/// Borrow/return decision rules.
///
/// ## Example
/// ```rust
/// use biblio_core::{BookId, LendingPolicy, LoanState};
///
/// let policy = LendingPolicy::default();
/// assert_eq!(policy.max_loans_per_member(), 3);
///
/// // Returning a book that is on the shelf is refused.
/// assert!(policy.check_return(BookId::new(1), &LoanState::Available).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LendingPolicy {
    max_loans_per_member: u32,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        LendingPolicy {
            max_loans_per_member: MAX_LOANS_PER_MEMBER,
        }
    }
}

impl LendingPolicy {
    /// Creates a policy with a custom borrowing limit.
    pub fn with_max_loans(max_loans_per_member: u32) -> Self {
        LendingPolicy {
            max_loans_per_member,
        }
    }

    /// Returns the borrowing limit.
    #[inline]
    pub fn max_loans_per_member(&self) -> u32 {
        self.max_loans_per_member
    }

    /// Decides whether a book in `state` may be lent to `borrower`, who
    /// currently holds `outstanding` books.
    ///
    /// The loan-state check runs first: a book already on loan is reported as
    /// such even when the borrower is also at the limit.
    pub fn check_borrow(
        &self,
        book_id: BookId,
        state: &LoanState,
        borrower: &Identity,
        outstanding: i64,
    ) -> CoreResult<()> {
        if let LoanState::OnLoan(current) = state {
            return Err(CoreError::AlreadyLoaned {
                book_id,
                borrower: current.clone(),
            });
        }

        if outstanding >= i64::from(self.max_loans_per_member) {
            return Err(CoreError::BorrowLimitExceeded {
                identity: borrower.clone(),
                limit: self.max_loans_per_member,
            });
        }

        Ok(())
    }

    /// Decides whether a book in `state` may be returned.
    ///
    /// ## Returns
    /// The identity the book was lent to.
    pub fn check_return(&self, book_id: BookId, state: &LoanState) -> CoreResult<Identity> {
        match state {
            LoanState::OnLoan(identity) => Ok(identity.clone()),
            LoanState::Available => Err(CoreError::NotLoaned(book_id)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
