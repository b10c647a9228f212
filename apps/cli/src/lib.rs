//! # Biblio Console
//!
//! Console front end for the lending system: one-shot commands and the
//! interactive menu.
//!
//! ## Module Organization
//! ```text
//! biblio_cli/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── commands.rs     ◄─── clap command line
//! ├── commands/
//! │   ├── member.rs   ◄─── Registry actions
//! │   ├── book.rs     ◄─── Catalog actions
//! │   └── loan.rs     ◄─── Borrow / return
//! ├── menu.rs         ◄─── Numbered interactive menu
//! ├── terminal/
//! │   ├── logging.rs  ◄─── tracing subscriber
//! │   ├── prompt.rs   ◄─── Prompt trait, line prompts
//! │   ├── interactive.rs ◄─ dialoguer prompts
//! │   └── print.rs    ◄─── Listings (text or JSON)
//! ├── config.rs       ◄─── Database path & lending limit
//! └── error.rs        ◄─── CliError for the operator
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod menu;
pub mod terminal;

use biblio_core::LendingPolicy;
use biblio_db::{Database, DbConfig};
use std::io::{self, IsTerminal, Write};
use tracing::info;

use commands::{CommandLine, Commands};
use config::AppConfig;
use error::CliError;
use terminal::{ConsolePrompter, LinePrompter};

/// Runs one invocation of the console.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Console Startup                                   │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • --db > BIBLIO_DB_PATH > biblio.toml > data directory              │
/// │     • BIBLIO_MAX_LOANS > biblio.toml > 3                                │
/// │                                                                         │
/// │  2. Open Database ────────────────────────────────────────────────────► │
/// │     • Create the parent directory if needed                            │
/// │     • SQLite with WAL mode, run pending migrations                      │
/// │                                                                         │
/// │  3. Dispatch ─────────────────────────────────────────────────────────► │
/// │     • One-shot command, or the menu (dialoguer on a terminal)           │
/// │                                                                         │
/// │  4. Close the pool, whatever the outcome                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: CommandLine) -> Result<(), CliError> {
    let config = AppConfig::load(cli.db, cli.config.as_deref())?;
    let db = open_database(&config).await?;

    info!(path = %config.database_path.display(), "Database ready");

    let result = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu if io::stdin().is_terminal() => {
            menu::run(&db, &mut ConsolePrompter::new()).await
        }
        Commands::Menu => {
            // dialoguer needs a terminal; scripted input is read line by line.
            let mut prompter = LinePrompter::new(io::stdin().lock(), io::stdout());
            menu::run(&db, &mut prompter).await
        }
        command => {
            let mut out = io::stdout().lock();
            let result = commands::execute(&db, command, cli.json, &mut out).await;
            result.and_then(|()| out.flush().map_err(CliError::from))
        }
    };

    db.close().await;
    result
}

/// Opens the configured database, creating its directory first.
pub async fn open_database(config: &AppConfig) -> Result<Database, CliError> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CliError::new(
                    error::ErrorCode::ConfigError,
                    format!("Cannot create {}: {}", parent.display(), e),
                )
            })?;
        }
    }

    let db_config = DbConfig::new(&config.database_path)
        .lending_policy(LendingPolicy::with_max_loans(config.max_loans_per_member));

    Ok(Database::new(db_config).await?)
}
