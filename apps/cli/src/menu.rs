//! # Interactive Menu
//!
//! The numbered menu shown by `biblio` / `biblio menu`.
//!
//! ## Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  print options ─► read choice ─► prompt for fields ─► run action       │
//! │        ▲                                                  │             │
//! │        │          rule violated: print "Error: ..."       │             │
//! │        └──────────────────────────────────────────────────┘             │
//! │                                                                         │
//! │  Leaves on "Exit", on end of input, or on a storage failure            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use biblio_core::CoreError;
use biblio_db::Database;
use tracing::debug;

use crate::commands::{book, loan, member};
use crate::error::{CliError, ErrorCode};
use crate::terminal::{print, Prompt};

/// Menu entries, numbered from 1 in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    AddMember,
    ListMembers,
    RemoveMember,
    AddBook,
    ListBooks,
    RemoveBook,
    LendBook,
    ReturnBook,
    UpdateMember,
    UpdateBook,
    Exit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 11] = [
        MenuOption::AddMember,
        MenuOption::ListMembers,
        MenuOption::RemoveMember,
        MenuOption::AddBook,
        MenuOption::ListBooks,
        MenuOption::RemoveBook,
        MenuOption::LendBook,
        MenuOption::ReturnBook,
        MenuOption::UpdateMember,
        MenuOption::UpdateBook,
        MenuOption::Exit,
    ];

    /// Parses a 1-based menu number.
    pub fn from_choice(choice: &str) -> Option<Self> {
        let n: usize = choice.trim().parse().ok()?;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::AddMember => "Add member",
            MenuOption::ListMembers => "List members",
            MenuOption::RemoveMember => "Remove member",
            MenuOption::AddBook => "Add book",
            MenuOption::ListBooks => "List books",
            MenuOption::RemoveBook => "Remove book",
            MenuOption::LendBook => "Lend book",
            MenuOption::ReturnBook => "Return book",
            MenuOption::UpdateMember => "Update member",
            MenuOption::UpdateBook => "Update book",
            MenuOption::Exit => "Exit",
        }
    }
}

/// Runs the menu until the operator exits or input ends.
///
/// ## Returns
/// * `Ok(())` - Exit chosen or input exhausted
/// * `Err(CliError)` - Storage or console failure; rule violations are
///   printed and never returned
pub async fn run<P: Prompt>(db: &Database, prompter: &mut P) -> Result<(), CliError> {
    loop {
        show_options(prompter)?;

        let choice = match prompter.ask("Option") {
            Ok(choice) => choice,
            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(err.into()),
        };

        let Some(option) = MenuOption::from_choice(&choice) else {
            prompter.say("Invalid option!")?;
            continue;
        };

        if option == MenuOption::Exit {
            prompter.say("Exiting...")?;
            break;
        }

        debug!(?option, "Menu option chosen");

        match perform(db, prompter, option).await {
            Ok(()) => {}
            Err(err) if err.code == ErrorCode::Cancelled => break,
            Err(err) if err.is_recoverable() => print::error(prompter.output(), &err, false)?,
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

fn show_options<P: Prompt>(prompter: &mut P) -> Result<(), CliError> {
    prompter.say("")?;
    prompter.say("===== Library =====")?;
    for (n, option) in MenuOption::ALL.iter().enumerate() {
        prompter.say(format_args!("{:>2}. {}", n + 1, option.label()))?;
    }
    Ok(())
}

async fn perform<P: Prompt>(
    db: &Database,
    prompter: &mut P,
    option: MenuOption,
) -> Result<(), CliError> {
    match option {
        MenuOption::AddMember => {
            let given_name = prompter.ask_required("Given name")?;
            let family_name = prompter.ask_required("Family name")?;
            let identity = prompter.ask_identity("Identity")?;
            member::add(db, identity.as_str(), &given_name, &family_name).await?;
            prompter.say("Member added.")?;
        }
        MenuOption::ListMembers => {
            let members = db.members().list().await?;
            print::members(prompter.output(), &members, false)?;
        }
        MenuOption::RemoveMember => {
            let identity = prompter.ask_required("Identity")?;
            if member::remove(db, &identity).await? {
                prompter.say("Member removed.")?;
            } else {
                prompter.say(format_args!("No member with identity {}.", identity))?;
            }
        }
        MenuOption::AddBook => {
            let title = prompter.ask_required("Title")?;
            let author = prompter.ask_required("Author")?;
            let id = book::add(db, &title, &author).await?;
            prompter.say(format_args!("Book added with id {}.", id))?;
        }
        MenuOption::ListBooks => {
            let books = db.books().list().await?;
            print::books(prompter.output(), "Books", "No books.", &books, false)?;
        }
        MenuOption::RemoveBook => {
            let id = prompter.ask_book_id("Book id")?;
            db.books().remove(id).await?;
            prompter.say("Book removed.")?;
        }
        MenuOption::LendBook => {
            let id = prompter.ask_book_id("Book id")?;
            let identity = prompter.ask_identity("Borrower identity")?;
            loan::borrow(db, id, &identity).await?;
            prompter.say("Book lent.")?;
        }
        MenuOption::ReturnBook => {
            let id = prompter.ask_book_id("Book id")?;
            loan::return_book(db, id).await?;
            prompter.say("Book returned.")?;
        }
        MenuOption::UpdateMember => {
            let identity = prompter.ask_required("Identity")?;
            let current = db
                .members()
                .get(&identity)
                .await?
                .ok_or_else(|| CoreError::MemberNotFound(identity.clone()))?;
            let given_name = prompter.ask_replacement("Given name", &current.given_name)?;
            let family_name = prompter.ask_replacement("Family name", &current.family_name)?;
            member::update(db, &identity, given_name.as_deref(), family_name.as_deref()).await?;
            prompter.say("Member updated.")?;
        }
        MenuOption::UpdateBook => {
            let id = prompter.ask_book_id("Book id")?;
            let current = book::status(db, id).await?;
            let title = prompter.ask_replacement("Title", &current.title)?;
            let author = prompter.ask_replacement("Author", &current.author)?;
            book::update(db, id, title.as_deref(), author.as_deref()).await?;
            prompter.say("Book updated.")?;
        }
        MenuOption::Exit => {}
    }

    Ok(())
}
