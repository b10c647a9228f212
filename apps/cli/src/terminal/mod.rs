//! Console plumbing: logging setup, prompting and listing output.

pub mod interactive;
pub mod logging;
pub mod print;
pub mod prompt;

pub use interactive::ConsolePrompter;
pub use prompt::{LinePrompter, Prompt};
