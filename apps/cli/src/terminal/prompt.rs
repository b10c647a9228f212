//! # Prompts
//!
//! Question/answer seam for the interactive menu.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Prompt (trait)                                                         │
//! │     ├── ConsolePrompter  dialoguer on a terminal (interactive.rs)       │
//! │     └── LinePrompter     line reader for piped input and tests          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Every answer is trimmed
//! - Required answers are asked again while empty
//! - Identities and book ids are asked again while malformed
//! - Replacement answers may be empty, meaning "keep the current value"
//! - End of input surfaces as `io::ErrorKind::UnexpectedEof`

use biblio_core::{BookId, Identity};
use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Asks the operator for menu input.
pub trait Prompt {
    type Output: Write;

    /// Direct access to the output, for listings.
    fn output(&mut self) -> &mut Self::Output;

    /// Writes one line.
    fn say(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output(), "{}", message)
    }

    /// Asks once and returns the trimmed answer, possibly empty.
    fn ask(&mut self, label: &str) -> io::Result<String>;

    /// Asks until the answer is not empty.
    fn ask_required(&mut self, label: &str) -> io::Result<String>;

    /// Asks until the answer is a well-formed identity.
    fn ask_identity(&mut self, label: &str) -> io::Result<Identity>;

    /// Asks until the answer is a book id.
    fn ask_book_id(&mut self, label: &str) -> io::Result<BookId>;

    /// Asks for a new value, showing the current one.
    ///
    /// ## Returns
    /// * `Ok(None)` - Empty answer, keep `current`
    /// * `Ok(Some(value))` - Replacement value
    fn ask_replacement(&mut self, label: &str, current: &str) -> io::Result<Option<String>>;
}

/// Reads answers line by line from `input`, writes questions to `output`.
///
/// Used when stdin is not a terminal, where dialoguer cannot run.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LinePrompter { input, output }
    }

    /// Gives back the reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    fn ask_parsed<T>(
        &mut self,
        label: &str,
        parse: impl Fn(&str) -> Result<T, biblio_core::ValidationError>,
    ) -> io::Result<T> {
        loop {
            let answer = self.ask_required(label)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(err) => self.say(format_args!("Error: {}", err))?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompter<R, W> {
    type Output = W;

    fn output(&mut self) -> &mut W {
        &mut self.output
    }

    fn ask(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input ended"));
        }

        Ok(line.trim().to_string())
    }

    fn ask_required(&mut self, label: &str) -> io::Result<String> {
        loop {
            let answer = self.ask(label)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.say(format_args!("{} cannot be empty.", label))?;
        }
    }

    fn ask_identity(&mut self, label: &str) -> io::Result<Identity> {
        self.ask_parsed(label, Identity::parse)
    }

    fn ask_book_id(&mut self, label: &str) -> io::Result<BookId> {
        self.ask_parsed(label, str::parse::<BookId>)
    }

    fn ask_replacement(&mut self, label: &str, current: &str) -> io::Result<Option<String>> {
        let answer = self.ask(&format!("{} [{}]", label, current))?;
        Ok(if answer.is_empty() { None } else { Some(answer) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    type TestPrompter = LinePrompter<Cursor<Vec<u8>>, Vec<u8>>;

    fn prompter(input: &str) -> TestPrompter {
        LinePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(prompter: TestPrompter) -> String {
        String::from_utf8(prompter.into_parts().1).unwrap()
    }

    #[test]
    fn test_ask_trims() {
        let mut p = prompter("  Mercè Rodoreda \n");

        assert_eq!(p.ask("Author").unwrap(), "Mercè Rodoreda");
        assert_eq!(output(p), "Author: ");
    }

    #[test]
    fn test_ask_at_end_of_input() {
        let mut p = prompter("");

        let err = p.ask("Title").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_ask_required_reprompts_on_empty() {
        let mut p = prompter("\n   \nSolitud\n");

        assert_eq!(p.ask_required("Title").unwrap(), "Solitud");

        let out = output(p);
        assert_eq!(out.matches("Title: ").count(), 3);
        assert_eq!(out.matches("Title cannot be empty.").count(), 2);
    }

    #[test]
    fn test_ask_identity_reprompts_on_malformed() {
        let mut p = prompter("1234567Z\n12345678z\n12345678Z\n");

        let identity = p.ask_identity("Identity").unwrap();
        assert_eq!(identity.as_str(), "12345678Z");
        assert_eq!(output(p).matches("Error: identity has invalid format").count(), 2);
    }

    #[test]
    fn test_ask_book_id() {
        let mut p = prompter("seven\n 7 \n");

        assert_eq!(p.ask_book_id("Book id").unwrap(), BookId::new(7));
        assert!(output(p).contains("Error: "));
    }

    #[test]
    fn test_ask_replacement() {
        let mut p = prompter("\n  Aloma \n");

        assert_eq!(p.ask_replacement("Title", "Solitud").unwrap(), None);
        assert_eq!(
            p.ask_replacement("Title", "Solitud").unwrap(),
            Some("Aloma".to_string())
        );
        assert!(output(p).starts_with("Title [Solitud]: "));
    }

    #[test]
    fn test_eof_while_reprompting() {
        let mut p = prompter("\n");

        let err = p.ask_required("Title").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
