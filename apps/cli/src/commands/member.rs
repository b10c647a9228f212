//! # Member Commands
//!
//! Registry actions shared by `biblio member ...` and the menu.
//!
//! Input is trimmed and checked here before it reaches the repository, which
//! stores names as given.

use biblio_core::validation::{validate_identity, validate_required};
use biblio_core::{Book, CoreError, Identity, Member};
use biblio_db::Database;
use std::io::Write;
use tracing::debug;

use super::{non_blank, MemberCommand};
use crate::error::CliError;
use crate::terminal::print;

/// Registers a member after checking every field.
pub async fn add(
    db: &Database,
    identity: &str,
    given_name: &str,
    family_name: &str,
) -> Result<Member, CliError> {
    let (identity, given_name, family_name) =
        (identity.trim(), given_name.trim(), family_name.trim());

    validate_required("given name", given_name)?;
    validate_required("family name", family_name)?;
    validate_identity(identity)?;

    Ok(db.members().register(identity, given_name, family_name).await?)
}

/// Removes a member. `false` means nobody had that identity.
pub async fn remove(db: &Database, identity: &str) -> Result<bool, CliError> {
    Ok(db.members().remove(identity.trim()).await?)
}

/// Replaces the non-blank name fields and returns the stored record.
pub async fn update(
    db: &Database,
    identity: &str,
    given_name: Option<&str>,
    family_name: Option<&str>,
) -> Result<Member, CliError> {
    let identity = identity.trim();
    let members = db.members();

    members
        .update(identity, non_blank(given_name), non_blank(family_name))
        .await?;

    members
        .get(identity)
        .await?
        .ok_or_else(|| CoreError::MemberNotFound(identity.to_string()).into())
}

/// Books currently lent to `identity`, registered or not.
pub async fn loans(db: &Database, identity: &Identity) -> Result<Vec<Book>, CliError> {
    Ok(db.books().loans_of(identity).await?)
}

/// Runs a `biblio member` subcommand.
pub async fn run<W: Write>(
    db: &Database,
    command: MemberCommand,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    debug!(?command, "Member command");

    match command {
        MemberCommand::Add {
            identity,
            given_name,
            family_name,
        } => {
            let member = add(db, &identity, &given_name, &family_name).await?;
            writeln!(out, "Member added: {}", member)?;
        }
        MemberCommand::List => {
            let members = db.members().list().await?;
            print::members(out, &members, json)?;
        }
        MemberCommand::Remove { identity } => {
            if remove(db, &identity).await? {
                writeln!(out, "Member removed.")?;
            } else {
                writeln!(out, "No member with identity {}.", identity.trim())?;
            }
        }
        MemberCommand::Update {
            identity,
            given_name,
            family_name,
        } => {
            let member = update(db, &identity, given_name.as_deref(), family_name.as_deref())
                .await?;
            writeln!(out, "Member updated: {}", member)?;
        }
        MemberCommand::Loans { identity } => {
            let books = loans(db, &identity).await?;
            let heading = format!("Loans of {}", identity);
            print::books(out, &heading, "No books on loan.", &books, json)?;
        }
    }

    Ok(())
}
