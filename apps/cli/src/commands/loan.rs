//! # Loan Commands
//!
//! Lending and returns. All rules are enforced by
//! [`biblio_db::LendingService`]; this layer only adapts errors.

use biblio_core::{BookId, Identity};
use biblio_db::Database;
use tracing::info;

use crate::error::CliError;

/// Lends `book_id` to `identity`.
pub async fn borrow(db: &Database, book_id: BookId, identity: &Identity) -> Result<(), CliError> {
    db.lending().borrow(book_id, identity).await?;
    info!(book_id = %book_id, identity = %identity, "Lent from console");
    Ok(())
}

/// Takes `book_id` back and returns who had it.
pub async fn return_book(db: &Database, book_id: BookId) -> Result<Identity, CliError> {
    let borrower = db.lending().return_book(book_id).await?;
    info!(book_id = %book_id, identity = %borrower, "Returned at console");
    Ok(borrower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{execute, Commands};
    use crate::error::ErrorCode;
    use biblio_core::LendingPolicy;
    use biblio_db::DbConfig;

    #[tokio::test]
    async fn test_borrow_and_return_messages() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let identity = Identity::parse("12345678Z").unwrap();
        let id = db.books().add("Pa negre", "Emili Teixidor").await.unwrap();

        let mut out = Vec::new();
        execute(
            &db,
            Commands::Borrow {
                book_id: id,
                identity: identity.clone(),
            },
            false,
            &mut out,
        )
        .await
        .unwrap();
        execute(&db, Commands::Return { book_id: id }, false, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            format!("Book {id} lent to 12345678Z.\nBook {id} returned by 12345678Z.\n")
        );
    }

    #[tokio::test]
    async fn test_rule_violations_map_to_codes() {
        let config = DbConfig::in_memory().lending_policy(LendingPolicy::with_max_loans(1));
        let db = Database::new(config).await.unwrap();
        let anna = Identity::parse("12345678Z").unwrap();
        let jordi = Identity::parse("87654321X").unwrap();

        let first = db.books().add("Solitud", "Víctor Català").await.unwrap();
        let second = db.books().add("Aloma", "Mercè Rodoreda").await.unwrap();

        borrow(&db, first, &anna).await.unwrap();

        let err = borrow(&db, first, &jordi).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let err = borrow(&db, second, &anna).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::LimitExceeded);

        let err = return_book(&db, second).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let err = return_book(&db, BookId::new(99)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        assert_eq!(return_book(&db, first).await.unwrap(), anna);
    }
}
