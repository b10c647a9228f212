//! # Domain Types
//!
//! Core records and identifiers used throughout Biblio.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐          ┌─────────────────────────────┐      │
//! │  │       Member        │          │            Book             │      │
//! │  │  ─────────────────  │          │  ─────────────────────────  │      │
//! │  │  identity (PK)  ◄───┼──────────┼─ borrower_identity (opt.)   │      │
//! │  │  given_name         │  0..1    │  id (BookId, auto)          │      │
//! │  │  family_name        │          │  title, author              │      │
//! │  └─────────────────────┘          └─────────────────────────────┘      │
//! │                                                                         │
//! │  The book → member link is a label, not an owning reference:           │
//! │  loan counts are derived by querying books, never stored on Member.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records only carry instance-scoped helpers. Keyed lookups and table-wide
//! operations belong to the repositories in `biblio-db`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::lending::LoanState;
use crate::validation::{validate_identity, ValidationResult};

// =============================================================================
// Identity
// =============================================================================

/// A member's personal identifier: 8 digits and a check letter.
///
/// ## Construction
/// Raw input goes through [`Identity::parse`], which applies the format
/// rule. Values decoded from the database are trusted as stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Parses and validates an identity.
    ///
    /// ## Example
    /// ```rust
    /// use biblio_core::Identity;
    ///
    /// assert!(Identity::parse("12345678Z").is_ok());
    /// assert!(Identity::parse("12345678z").is_err());
    /// ```
    pub fn parse(raw: &str) -> ValidationResult<Self> {
        validate_identity(raw)?;
        Ok(Identity(raw.to_string()))
    }

    /// Returns the identity as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identity::parse(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_identity(&value)?;
        Ok(Identity(value))
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Book Id
// =============================================================================

/// System-assigned book identifier.
///
/// Assigned by storage in increasing order and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct BookId(i64);

impl BookId {
    /// Wraps a raw id.
    #[inline]
    pub const fn new(id: i64) -> Self {
        BookId(id)
    }

    /// Returns the raw id.
    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(BookId)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "book id".to_string(),
                reason: format!("'{}' is not a whole number", s.trim()),
            })
    }
}

impl From<i64> for BookId {
    fn from(id: i64) -> Self {
        BookId(id)
    }
}

// =============================================================================
// Member
// =============================================================================

/// A registered library member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Member {
    /// Primary key. Immutable once registered.
    pub identity: Identity,

    pub given_name: String,

    pub family_name: String,

    /// When the member was registered.
    pub created_at: DateTime<Utc>,

    /// When the name fields were last changed.
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Returns "given family".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

/// Console listing format: `Given Family : 12345678Z`.
impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} : {}",
            self.given_name, self.family_name, self.identity
        )
    }
}

// =============================================================================
// Book
// =============================================================================

/// A catalogued book and its current borrower, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Book {
    pub id: BookId,

    pub title: String,

    pub author: String,

    /// Current borrower. `None` means the book is available.
    pub borrower_identity: Option<Identity>,

    /// When the book was catalogued.
    pub created_at: DateTime<Utc>,

    /// Last title/author change or loan transition.
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Returns the loan state derived from `borrower_identity`.
    pub fn loan_state(&self) -> LoanState {
        LoanState::from(self.borrower_identity.clone())
    }

    /// Checks if the book can be lent right now.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.borrower_identity.is_none()
    }
}

/// Console listing format:
/// `ID: 3, Title: Solitud, Author: Víctor Català, Status: Available`.
impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Title: {}, Author: {}, Status: {}",
            self.id,
            self.title,
            self.author,
            self.loan_state()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book(borrower: Option<&str>) -> Book {
        let now = Utc::now();
        Book {
            id: BookId::new(3),
            title: "Solitud".to_string(),
            author: "Víctor Català".to_string(),
            borrower_identity: borrower.map(|b| Identity::parse(b).unwrap()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_identity_parse() {
        let identity = Identity::parse("12345678Z").unwrap();
        assert_eq!(identity.as_str(), "12345678Z");
        assert_eq!(identity.to_string(), "12345678Z");

        assert!(Identity::parse("1234567Z").is_err());
        assert!("12345678Z".parse::<Identity>().is_ok());
    }

    #[test]
    fn test_identity_serde_validates() {
        let json = serde_json::to_string(&Identity::parse("12345678Z").unwrap()).unwrap();
        assert_eq!(json, "\"12345678Z\"");

        assert!(serde_json::from_str::<Identity>("\"12345678Z\"").is_ok());
        assert!(serde_json::from_str::<Identity>("\"bogus\"").is_err());
    }

    #[test]
    fn test_book_id_from_str() {
        assert_eq!("42".parse::<BookId>().unwrap(), BookId::new(42));
        assert_eq!(" 7 ".parse::<BookId>().unwrap().get(), 7);
        assert!("seven".parse::<BookId>().is_err());
        assert!("".parse::<BookId>().is_err());
    }

    #[test]
    fn test_book_loan_state() {
        let available = sample_book(None);
        assert!(available.is_available());
        assert_eq!(available.loan_state(), LoanState::Available);

        let lent = sample_book(Some("12345678Z"));
        assert!(!lent.is_available());
        assert_eq!(
            lent.loan_state(),
            LoanState::OnLoan(Identity::parse("12345678Z").unwrap())
        );
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(
            sample_book(None).to_string(),
            "ID: 3, Title: Solitud, Author: Víctor Català, Status: Available"
        );
        assert_eq!(
            sample_book(Some("12345678Z")).to_string(),
            "ID: 3, Title: Solitud, Author: Víctor Català, Status: On loan to 12345678Z"
        );

        let now = Utc::now();
        let member = Member {
            identity: Identity::parse("12345678Z").unwrap(),
            given_name: "Mercè".to_string(),
            family_name: "Rodoreda".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(member.to_string(), "Mercè Rodoreda : 12345678Z");
        assert_eq!(member.full_name(), "Mercè Rodoreda");
    }
}
