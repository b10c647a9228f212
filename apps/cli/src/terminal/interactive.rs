//! Terminal prompts via dialoguer.
//!
//! Validation runs inside `Input::validate_with`, so a rejected answer is
//! reported under the prompt and asked again without leaving dialoguer.

use biblio_core::{BookId, Identity};
use console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use std::io;

use super::prompt::Prompt;

/// Prompts on the controlling terminal.
pub struct ConsolePrompter {
    theme: ColorfulTheme,
    term: Term,
}

impl ConsolePrompter {
    pub fn new() -> Self {
        ConsolePrompter {
            theme: ColorfulTheme::default(),
            term: Term::stdout(),
        }
    }

    fn input(&self, label: &str) -> Input<'_, String> {
        Input::with_theme(&self.theme).with_prompt(label.to_string())
    }
}

impl Default for ConsolePrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for ConsolePrompter {
    type Output = Term;

    fn output(&mut self) -> &mut Term {
        &mut self.term
    }

    fn ask(&mut self, label: &str) -> io::Result<String> {
        let answer = self
            .input(label)
            .allow_empty(true)
            .interact_text_on(&self.term)?;
        Ok(answer.trim().to_string())
    }

    fn ask_required(&mut self, label: &str) -> io::Result<String> {
        let answer = self
            .input(label)
            .validate_with(|answer: &String| required(label, answer).map(|_| ()))
            .interact_text_on(&self.term)?;
        required(label, &answer).map_err(invalid_answer)
    }

    fn ask_identity(&mut self, label: &str) -> io::Result<Identity> {
        let answer = self
            .input(label)
            .validate_with(|answer: &String| identity(answer).map(|_| ()))
            .interact_text_on(&self.term)?;
        identity(&answer).map_err(invalid_answer)
    }

    fn ask_book_id(&mut self, label: &str) -> io::Result<BookId> {
        let answer = self
            .input(label)
            .validate_with(|answer: &String| book_id(answer).map(|_| ()))
            .interact_text_on(&self.term)?;
        book_id(&answer).map_err(invalid_answer)
    }

    fn ask_replacement(&mut self, label: &str, current: &str) -> io::Result<Option<String>> {
        let answer = self
            .input(label)
            .default(current.to_string())
            .interact_text_on(&self.term)?;
        Ok(replacement(&answer, current))
    }
}

fn required(label: &str, answer: &str) -> Result<String, String> {
    let answer = answer.trim();
    if answer.is_empty() {
        Err(format!("{} cannot be empty.", label))
    } else {
        Ok(answer.to_string())
    }
}

fn identity(answer: &str) -> Result<Identity, String> {
    Identity::parse(answer.trim()).map_err(|e| e.to_string())
}

fn book_id(answer: &str) -> Result<BookId, String> {
    answer.trim().parse::<BookId>().map_err(|e| e.to_string())
}

/// The default is the current value, so accepting it means "no change".
fn replacement(answer: &str, current: &str) -> Option<String> {
    let answer = answer.trim();
    if answer.is_empty() || answer == current {
        None
    } else {
        Some(answer.to_string())
    }
}

fn invalid_answer(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}
