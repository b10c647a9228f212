//! # Book Repository
//!
//! Database operations for the book catalog.
//!
//! ## Key Operations
//! - Cataloguing (ids assigned by SQLite, never reused)
//! - Title/author updates
//! - Loan state lookups and per-identity loan counts
//!
//! Changing who holds a book is not done here; see [`crate::lending`].

use biblio_core::{Book, BookId, CoreError, Identity};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

/// Column list shared by every book query, in `Book` field order.
const BOOK_COLUMNS: &str = "id, title, author, borrower_identity, created_at, updated_at";

/// Repository for book database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = BookRepository::new(pool);
///
/// let id = repo.add("Incerta glòria", "Joan Sales").await?;
/// assert!(repo.loan_state_of(id).await?.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Catalogues a new, available book.
    ///
    /// Title and author are stored as given; rejecting blank values is up to
    /// the caller.
    ///
    /// ## Returns
    /// The id assigned by the database.
    pub async fn add(&self, title: &str, author: &str) -> DbResult<BookId> {
        debug!(title = %title, author = %author, "Adding book");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO books (title, author, borrower_identity, created_at, updated_at)
            VALUES (?1, ?2, NULL, ?3, ?3)
            "#,
        )
        .bind(title)
        .bind(author)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = BookId::new(result.last_insert_rowid());
        info!(book_id = %id, "Book added");

        Ok(id)
    }

    /// Removes a book, whether or not it is on loan.
    ///
    /// ## Returns
    /// * `Ok(())` - Book removed
    /// * `Err(DbError::Domain(CoreError::BookNotFound(_)))` - Unknown id
    pub async fn remove(&self, id: BookId) -> DbResult<()> {
        debug!(book_id = %id, "Removing book");

        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::BookNotFound(id).into());
        }

        info!(book_id = %id, "Book removed");
        Ok(())
    }

    /// Updates a book's title and/or author.
    ///
    /// `None` leaves the corresponding field unchanged. The loan state is
    /// never touched.
    pub async fn update(
        &self,
        id: BookId,
        title: Option<&str>,
        author: Option<&str>,
    ) -> DbResult<()> {
        debug!(book_id = %id, "Updating book");

        let result = sqlx::query(
            r#"
            UPDATE books SET
                title = COALESCE(?2, title),
                author = COALESCE(?3, author),
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(author)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::BookNotFound(id).into());
        }

        Ok(())
    }

    /// Lists all books by ascending id.
    pub async fn list(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = books.len(), "Listed books");
        Ok(books)
    }

    /// Gets a book by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Book))` - Book found
    /// * `Ok(None)` - Book not found
    pub async fn get(&self, id: BookId) -> DbResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Returns the current borrower of a book.
    ///
    /// ## Returns
    /// * `Ok(None)` - Book is available
    /// * `Ok(Some(identity))` - Book is on loan
    /// * `Err(DbError::Domain(CoreError::BookNotFound(_)))` - Unknown id
    pub async fn loan_state_of(&self, id: BookId) -> DbResult<Option<Identity>> {
        let borrower: Option<Option<Identity>> =
            sqlx::query_scalar("SELECT borrower_identity FROM books WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        borrower.ok_or_else(|| CoreError::BookNotFound(id).into())
    }

    /// Counts the books currently lent to `identity`.
    ///
    /// Works for any identity, registered or not.
    pub async fn outstanding_loans(&self, identity: &Identity) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE borrower_identity = ?1")
                .bind(identity)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Lists the books currently lent to `identity`.
    pub async fn loans_of(&self, identity: &Identity) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE borrower_identity = ?1 ORDER BY id"
        ))
        .bind(identity)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Counts catalogued books.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use biblio_core::{BookId, CoreError, Identity};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_add_is_available() {
        let db = db().await;
        let books = db.books();

        let id = books.add("T", "A").await.unwrap();

        assert_eq!(books.loan_state_of(id).await.unwrap(), None);
        let book = books.get(id).await.unwrap().unwrap();
        assert_eq!(book.title, "T");
        assert_eq!(book.author, "A");
        assert!(book.is_available());
    }

    #[tokio::test]
    async fn test_add_is_permissive() {
        let db = db().await;

        // Blank values are the caller's concern.
        let id = db.books().add("", "").await.unwrap();
        assert!(db.books().get(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_ids_increase_and_are_not_reused() {
        let db = db().await;
        let books = db.books();

        let first = books.add("Primer", "Autor").await.unwrap();
        let second = books.add("Segon", "Autor").await.unwrap();
        assert!(second > first);

        books.remove(second).await.unwrap();
        let third = books.add("Tercer", "Autor").await.unwrap();
        assert!(third > second);
    }

    #[tokio::test]
    async fn test_remove_unknown_book() {
        let db = db().await;

        let err = db.books().remove(BookId::new(99)).await.unwrap_err();
        assert!(matches!(err.domain(), Some(CoreError::BookNotFound(id)) if *id == BookId::new(99)));
    }

    #[tokio::test]
    async fn test_removed_book_is_not_found_everywhere() {
        let db = db().await;
        let books = db.books();

        let id = books.add("Els sorrells", "Anònim").await.unwrap();
        books.remove(id).await.unwrap();

        assert!(books.get(id).await.unwrap().is_none());
        assert!(books.loan_state_of(id).await.unwrap_err().is_not_found());
        assert!(books.update(id, Some("x"), None).await.unwrap_err().is_not_found());
        assert!(books.remove(id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let db = db().await;
        let books = db.books();

        let id = books.add("Nabí", "Josep Carner").await.unwrap();

        books.update(id, Some("Nabí (1941)"), None).await.unwrap();
        let book = books.get(id).await.unwrap().unwrap();
        assert_eq!(book.title, "Nabí (1941)");
        assert_eq!(book.author, "Josep Carner");

        books.update(id, None, Some("J. Carner")).await.unwrap();
        let book = books.get(id).await.unwrap().unwrap();
        assert_eq!(book.title, "Nabí (1941)");
        assert_eq!(book.author, "J. Carner");
    }

    #[tokio::test]
    async fn test_update_keeps_loan_state() {
        let db = db().await;
        let member = Identity::parse("12345678Z").unwrap();

        let id = db.books().add("Vida privada", "Josep M. de Sagarra").await.unwrap();
        db.lending().borrow(id, &member).await.unwrap();

        db.books().update(id, Some("Vida privada (ed. 2)"), None).await.unwrap();
        assert_eq!(db.books().loan_state_of(id).await.unwrap(), Some(member));
    }

    #[tokio::test]
    async fn test_list_and_loans_of() {
        let db = db().await;
        let books = db.books();
        let member = Identity::parse("12345678Z").unwrap();

        let a = books.add("A", "x").await.unwrap();
        let b = books.add("B", "y").await.unwrap();
        let c = books.add("C", "z").await.unwrap();

        db.lending().borrow(c, &member).await.unwrap();
        db.lending().borrow(a, &member).await.unwrap();

        let ids: Vec<BookId> = books.list().await.unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![a, b, c]);

        let lent: Vec<BookId> = books
            .loans_of(&member)
            .await
            .unwrap()
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(lent, vec![a, c]);
        assert_eq!(books.outstanding_loans(&member).await.unwrap(), 2);
        assert_eq!(books.count().await.unwrap(), 3);
    }
}
