//! Listing output, as plain lines or JSON.

use biblio_core::{Book, Member};
use serde::Serialize;
use std::io::{self, Write};

use crate::error::CliError;

/// Writes the member listing: one `Given Family : identity` line each.
pub fn members<W: Write>(out: &mut W, members: &[Member], json: bool) -> io::Result<()> {
    if json {
        return write_json(out, &members);
    }

    writeln!(out, "--- Members ---")?;
    if members.is_empty() {
        writeln!(out, "No members.")?;
    }
    for member in members {
        writeln!(out, "{}", member)?;
    }
    Ok(())
}

/// Writes a book listing under `heading`, or `empty` when there is none.
pub fn books<W: Write>(
    out: &mut W,
    heading: &str,
    empty: &str,
    books: &[Book],
    json: bool,
) -> io::Result<()> {
    if json {
        return write_json(out, &books);
    }

    writeln!(out, "--- {} ---", heading)?;
    if books.is_empty() {
        writeln!(out, "{}", empty)?;
    }
    for book in books {
        writeln!(out, "{}", book)?;
    }
    Ok(())
}

/// Writes a single book with its loan state.
pub fn book<W: Write>(out: &mut W, book: &Book, json: bool) -> io::Result<()> {
    if json {
        return write_json(out, book);
    }
    writeln!(out, "{}", book)
}

/// Writes a failure for the operator.
pub fn error<W: Write>(out: &mut W, err: &CliError, json: bool) -> io::Result<()> {
    if json {
        return write_json(out, err);
    }
    writeln!(out, "Error: {}", err.message)
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
