//! Operator input.
//!
//! The driver asks two kinds of questions: yes/no confirmations and the
//! choice of which side of a pair to delete. [`Prompter`] abstracts them so
//! the driver can be exercised with scripted answers.

use std::io::{self, BufRead, Write};

use yansi::Paint;

use super::state::Side;

/// Source of operator decisions.
pub trait Prompter {
    /// Ask a yes/no question. Returns `true` only for an explicit yes.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if input cannot be read (including end of input).
    fn confirm(&mut self, question: &str) -> io::Result<bool>;

    /// Ask which directory's copies to delete. `None` means the answer was invalid.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if input cannot be read (including end of input).
    fn choose_target(&mut self, first: &str, second: &str) -> io::Result<Option<Side>>;
}

/// Interpret a confirmation answer: `y` or `yes`, any case.
#[must_use]
pub fn parse_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Line-oriented prompter over any reader and writer.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter on the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    /// Create a prompter over `input` and `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> io::Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }
        Ok(line)
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{} {} ", question.bold(), "[y/N]".dim())?;
        let answer = self.read_answer()?;
        Ok(parse_confirmation(&answer))
    }

    fn choose_target(&mut self, first: &str, second: &str) -> io::Result<Option<Side>> {
        writeln!(self.output, "{}", "Delete the copies in which folder?".bold())?;
        writeln!(self.output, "  {} {first}", "1)".yellow())?;
        writeln!(self.output, "  {} {second}", "2)".yellow())?;
        write!(self.output, "{} ", "Selection (anything else aborts):".dim())?;
        let answer = self.read_answer()?;
        Ok(Side::from_selector(&answer))
    }
}
