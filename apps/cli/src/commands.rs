//! # Command Line
//!
//! `clap` definitions for the `biblio` binary and dispatch to the handlers.
//!
//! ```text
//! biblio [--db PATH] [--config PATH] [--json] [-v] <COMMAND>
//!
//!   member add|list|remove|update|loans
//!   book   add|list|remove|update|status
//!   borrow <BOOK_ID> <IDENTITY>
//!   return <BOOK_ID>
//!   menu                      (also the default)
//! ```

pub mod book;
pub mod loan;
pub mod member;

use biblio_core::{BookId, Identity};
use biblio_db::Database;
use clap::{ArgAction, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "biblio", version)]
#[command(about = "Members, books and loans of a small lending library.")]
pub struct CommandLine {
    /// Database file (overrides BIBLIO_DB_PATH and the config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Config file (default: biblio.toml in the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print listings, status and errors as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output on stderr (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Register, list, update and remove members
    #[command(subcommand, alias = "m")]
    Member(MemberCommand),
    /// Catalogue, list, update and remove books
    #[command(subcommand, alias = "b")]
    Book(BookCommand),
    /// Lend a book to an identity
    Borrow { book_id: BookId, identity: Identity },
    /// Take a lent book back
    Return { book_id: BookId },
    /// Interactive menu
    Menu,
}

#[derive(Debug, Subcommand)]
pub enum MemberCommand {
    /// Register a member
    Add {
        identity: String,
        given_name: String,
        family_name: String,
    },
    /// List members in registration order
    List,
    /// Remove a member (their loans stay outstanding)
    Remove { identity: String },
    /// Change a member's names; omitted fields are kept
    Update {
        identity: String,
        #[arg(long)]
        given_name: Option<String>,
        #[arg(long)]
        family_name: Option<String>,
    },
    /// List the books lent to an identity
    Loans { identity: Identity },
}

#[derive(Debug, Subcommand)]
pub enum BookCommand {
    /// Catalogue a book
    Add { title: String, author: String },
    /// List books by id
    List,
    /// Remove a book
    Remove { book_id: BookId },
    /// Change a book's title or author; omitted fields are kept
    Update {
        book_id: BookId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },
    /// Show a book and who holds it
    Status { book_id: BookId },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Runs a one-shot command, writing its output to `out`.
///
/// [`Commands::Menu`] is handled by the caller, which owns the console.
pub async fn execute<W: Write>(
    db: &Database,
    command: Commands,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    match command {
        Commands::Member(cmd) => member::run(db, cmd, json, out).await,
        Commands::Book(cmd) => book::run(db, cmd, json, out).await,
        Commands::Borrow { book_id, identity } => {
            loan::borrow(db, book_id, &identity).await?;
            writeln!(out, "Book {} lent to {}.", book_id, identity)?;
            Ok(())
        }
        Commands::Return { book_id } => {
            let borrower = loan::return_book(db, book_id).await?;
            writeln!(out, "Book {} returned by {}.", book_id, borrower)?;
            Ok(())
        }
        Commands::Menu => Err(CliError::internal("the menu needs an interactive console")),
    }
}

/// Turns a blank replacement into "keep the current value".
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CommandLine {
        CommandLine::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn test_no_command_means_menu() {
        let cli = parse(&["biblio"]);
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["biblio", "book", "list", "--json", "--db", "/tmp/x.db", "-vv"]);

        assert!(matches!(cli.command, Some(Commands::Book(BookCommand::List))));
        assert!(cli.json);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_borrow_arguments_are_typed() {
        let cli = parse(&["biblio", "borrow", "7", "12345678Z"]);
        match cli.command {
            Some(Commands::Borrow { book_id, identity }) => {
                assert_eq!(book_id, BookId::new(7));
                assert_eq!(identity.as_str(), "12345678Z");
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(CommandLine::try_parse_from(["biblio", "borrow", "x", "12345678Z"]).is_err());
        assert!(CommandLine::try_parse_from(["biblio", "borrow", "7", "12345678z"]).is_err());
    }

    #[test]
    fn test_member_update_flags() {
        let cli = parse(&["biblio", "m", "update", "12345678Z", "--family-name", "Vila"]);
        match cli.command {
            Some(Commands::Member(MemberCommand::Update {
                identity,
                given_name,
                family_name,
            })) => {
                assert_eq!(identity, "12345678Z");
                assert_eq!(given_name, None);
                assert_eq!(family_name.as_deref(), Some("Vila"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_member_add_keeps_raw_identity() {
        // Format errors are reported by the handler, not by clap.
        let cli = parse(&["biblio", "member", "add", "bad", "Anna", "Puig"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Member(MemberCommand::Add { .. }))
        ));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" Aloma ")), Some("Aloma"));
    }

    #[test]
    fn test_verify_command_definition() {
        use clap::CommandFactory;
        CommandLine::command().debug_assert();
    }
}
