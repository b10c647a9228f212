//! # Book Commands
//!
//! Catalog actions shared by `biblio book ...` and the menu.

use biblio_core::validation::validate_required;
use biblio_core::{Book, BookId, CoreError};
use biblio_db::Database;
use std::io::Write;
use tracing::debug;

use super::{non_blank, BookCommand};
use crate::error::CliError;
use crate::terminal::print;

/// Catalogues a book; blank titles or authors are rejected.
pub async fn add(db: &Database, title: &str, author: &str) -> Result<BookId, CliError> {
    let (title, author) = (title.trim(), author.trim());

    validate_required("title", title)?;
    validate_required("author", author)?;

    Ok(db.books().add(title, author).await?)
}

/// Replaces the non-blank fields and returns the stored record.
pub async fn update(
    db: &Database,
    id: BookId,
    title: Option<&str>,
    author: Option<&str>,
) -> Result<Book, CliError> {
    let books = db.books();

    books.update(id, non_blank(title), non_blank(author)).await?;

    status(db, id).await
}

/// Fetches a book, failing when the id is unknown.
pub async fn status(db: &Database, id: BookId) -> Result<Book, CliError> {
    db.books()
        .get(id)
        .await?
        .ok_or_else(|| CoreError::BookNotFound(id).into())
}

/// Runs a `biblio book` subcommand.
pub async fn run<W: Write>(
    db: &Database,
    command: BookCommand,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    debug!(?command, "Book command");

    match command {
        BookCommand::Add { title, author } => {
            let id = add(db, &title, &author).await?;
            writeln!(out, "Book added with id {}.", id)?;
        }
        BookCommand::List => {
            let books = db.books().list().await?;
            print::books(out, "Books", "No books.", &books, json)?;
        }
        BookCommand::Remove { book_id } => {
            db.books().remove(book_id).await?;
            writeln!(out, "Book {} removed.", book_id)?;
        }
        BookCommand::Update {
            book_id,
            title,
            author,
        } => {
            let book = update(db, book_id, title.as_deref(), author.as_deref()).await?;
            writeln!(out, "Book updated: {}", book)?;
        }
        BookCommand::Status { book_id } => {
            let book = status(db, book_id).await?;
            print::book(out, &book, json)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use biblio_core::Identity;
    use biblio_db::DbConfig;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn run_to_string(
        db: &Database,
        command: BookCommand,
        json: bool,
    ) -> Result<String, CliError> {
        let mut out = Vec::new();
        run(db, command, json, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_add_rejects_blank_fields() {
        let db = db().await;

        let err = add(&db, "   ", "Anònim").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "title is required");

        let id = add(&db, " Terra baixa ", "Àngel Guimerà").await.unwrap();
        assert_eq!(status(&db, id).await.unwrap().title, "Terra baixa");
    }

    #[tokio::test]
    async fn test_list_output() {
        let db = db().await;

        let text = run_to_string(&db, BookCommand::List, false).await.unwrap();
        assert_eq!(text, "--- Books ---\nNo books.\n");

        let id = add(&db, "Solitud", "Víctor Català").await.unwrap();
        let text = run_to_string(&db, BookCommand::List, false).await.unwrap();
        assert_eq!(
            text,
            format!("--- Books ---\nID: {id}, Title: Solitud, Author: Víctor Català, Status: Available\n")
        );
    }

    #[tokio::test]
    async fn test_status_json() {
        let db = db().await;
        let member = Identity::parse("12345678Z").unwrap();
        let id = add(&db, "Aloma", "Mercè Rodoreda").await.unwrap();
        db.lending().borrow(id, &member).await.unwrap();

        let text = run_to_string(&db, BookCommand::Status { book_id: id }, true)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["title"], "Aloma");
        assert_eq!(value["borrower_identity"], "12345678Z");
    }

    #[tokio::test]
    async fn test_unknown_book() {
        let db = db().await;
        let missing = BookId::new(42);

        for command in [
            BookCommand::Remove { book_id: missing },
            BookCommand::Status { book_id: missing },
            BookCommand::Update {
                book_id: missing,
                title: Some("x".into()),
                author: None,
            },
        ] {
            let err = run_to_string(&db, command, false).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::NotFound);
            assert_eq!(err.message, "Book not found: 42");
        }
    }

    #[tokio::test]
    async fn test_update_blank_keeps_value() {
        let db = db().await;
        let id = add(&db, "Nabí", "Josep Carner").await.unwrap();

        let book = update(&db, id, Some(""), Some("J. Carner")).await.unwrap();
        assert_eq!(book.title, "Nabí");
        assert_eq!(book.author, "J. Carner");
    }
}
