//! # Biblio Console Entry Point
//!
//! ```text
//! biblio                         interactive menu
//! biblio book list --json        one-shot command
//! RUST_LOG=debug biblio ...      verbose logs on stderr
//! ```
//!
//! The actual setup is in lib.rs so it can be tested.

use biblio_cli::commands::CommandLine;
use biblio_cli::terminal::{logging, print};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = CommandLine::parse_args();
    let json = cli.json;

    logging::init_tracing(cli.verbose);

    match biblio_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Report failures on stderr; stdout carries command output only.
            let _ = print::error(&mut std::io::stderr(), &err, json);
            ExitCode::from(err.code.exit_code())
        }
    }
}
