//! # Lending Service
//!
//! Runs the borrow and return transitions against the catalog.
//!
//! ## Borrow Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    borrow(book_id, identity)                            │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   │                                                                     │
//! │   ├── SELECT borrower_identity FROM books WHERE id = ?                 │
//! │   │      └── no row?            → BookNotFound                          │
//! │   │                                                                     │
//! │   ├── SELECT COUNT(*) FROM books WHERE borrower_identity = ?           │
//! │   │                                                                     │
//! │   ├── LendingPolicy::check_borrow(state, count)                        │
//! │   │      ├── on loan?           → AlreadyLoaned                         │
//! │   │      └── count >= limit?    → BorrowLimitExceeded                   │
//! │   │                                                                     │
//! │   └── UPDATE books SET borrower_identity = ?                           │
//! │          WHERE id = ? AND borrower_identity IS NULL                    │
//! │             └── 0 rows?         → AlreadyLoaned (lost a race)           │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Return follows the same shape with `check_return` and a guard of
//! `borrower_identity IS NOT NULL`. Dropping the transaction on any error
//! path rolls it back.
//!
//! The borrower does not have to be a registered member, and the identity
//! format is not checked again here: `Identity` values can only be built
//! through `Identity::parse` or read back from storage.

use biblio_core::{BookId, CoreError, Identity, LendingPolicy, LoanState};
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Orchestrates loans across the catalog.
///
/// ## Usage
/// ```rust,ignore
/// let lending = db.lending();
///
/// lending.borrow(book_id, &identity).await?;
/// lending.return_book(book_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct LendingService {
    pool: SqlitePool,
    policy: LendingPolicy,
}

impl LendingService {
    /// Creates a new LendingService.
    pub fn new(pool: SqlitePool, policy: LendingPolicy) -> Self {
        LendingService { pool, policy }
    }

    /// Returns the rules this service enforces.
    pub fn policy(&self) -> LendingPolicy {
        self.policy
    }

    /// Lends a book to `borrower`.
    ///
    /// ## Errors
    /// Checked in this order:
    /// 1. `CoreError::BookNotFound` - unknown id
    /// 2. `CoreError::AlreadyLoaned` - book is on loan
    /// 3. `CoreError::BorrowLimitExceeded` - borrower already holds the maximum
    pub async fn borrow(&self, book_id: BookId, borrower: &Identity) -> DbResult<()> {
        debug!(book_id = %book_id, borrower = %borrower, "Borrowing book");

        let mut tx = self.begin().await?;

        let state = load_loan_state(&mut tx, book_id).await?;

        let outstanding: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE borrower_identity = ?1")
                .bind(borrower)
                .fetch_one(&mut *tx)
                .await?;

        self.policy
            .check_borrow(book_id, &state, borrower, outstanding)?;

        let result = sqlx::query(
            r#"
            UPDATE books SET
                borrower_identity = ?2,
                updated_at = ?3
            WHERE id = ?1 AND borrower_identity IS NULL
            "#,
        )
        .bind(book_id)
        .bind(borrower)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Someone else lent it between our read and our write.
            let current = load_loan_state(&mut tx, book_id).await?;
            return Err(match current {
                LoanState::OnLoan(holder) => CoreError::AlreadyLoaned {
                    book_id,
                    borrower: holder,
                },
                LoanState::Available => CoreError::BookNotFound(book_id),
            }
            .into());
        }

        commit(tx).await?;

        info!(
            book_id = %book_id,
            borrower = %borrower,
            outstanding = outstanding + 1,
            "Book lent"
        );
        Ok(())
    }

    /// Takes a book back onto the shelf.
    ///
    /// ## Errors
    /// Checked in this order:
    /// 1. `CoreError::BookNotFound` - unknown id
    /// 2. `CoreError::NotLoaned` - book is already available
    ///
    /// ## Returns
    /// The identity the book had been lent to.
    pub async fn return_book(&self, book_id: BookId) -> DbResult<Identity> {
        debug!(book_id = %book_id, "Returning book");

        let mut tx = self.begin().await?;

        let state = load_loan_state(&mut tx, book_id).await?;
        let previous = self.policy.check_return(book_id, &state)?;

        let result = sqlx::query(
            r#"
            UPDATE books SET
                borrower_identity = NULL,
                updated_at = ?2
            WHERE id = ?1 AND borrower_identity IS NOT NULL
            "#,
        )
        .bind(book_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotLoaned(book_id).into());
        }

        commit(tx).await?;

        info!(book_id = %book_id, borrower = %previous, "Book returned");
        Ok(previous)
    }

    async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

/// Reads a book's loan state inside `tx`.
async fn load_loan_state(
    tx: &mut Transaction<'static, Sqlite>,
    book_id: BookId,
) -> DbResult<LoanState> {
    let borrower: Option<Option<Identity>> =
        sqlx::query_scalar("SELECT borrower_identity FROM books WHERE id = ?1")
            .bind(book_id)
            .fetch_optional(&mut **tx)
            .await?;

    match borrower {
        Some(borrower) => Ok(LoanState::from(borrower)),
        None => Err(CoreError::BookNotFound(book_id).into()),
    }
}

async fn commit(tx: Transaction<'static, Sqlite>) -> DbResult<()> {
    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
