//! Line-oriented prompts on a terminal

use super::{Credentials, Prompter};
use std::io::{self, BufRead, IsTerminal, Write};

/// Reads a secret after showing `prompt`, without echoing what is typed
pub type SecretReader = fn(&str) -> io::Result<String>;

fn read_hidden(prompt: &str) -> io::Result<String> {
    rpassword::prompt_password(prompt)
}

/// Trims a query and joins its words with underscores
pub fn normalize_query(raw: &str) -> String {
    raw.trim().replace(' ', "_")
}

/// Prompter that reads answers line by line
///
/// Any answer other than `y` (case-insensitive) counts as "no", as does
/// end of input. The password goes through the secret reader when one is
/// set and through the line input otherwise.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
    secret_reader: Option<SecretReader>,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter on the process's stdin and stdout
    ///
    /// When stdin is a terminal the password is read without echo.
    pub fn stdio() -> Self {
        let stdin = io::stdin();
        let hide = stdin.is_terminal();
        let prompter = Self::new(stdin.lock(), io::stdout());
        if hide {
            prompter.with_secret_reader(read_hidden)
        } else {
            prompter
        }
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            secret_reader: None,
        }
    }

    /// Reads the password with `reader` instead of the line input
    pub fn with_secret_reader(mut self, reader: SecretReader) -> Self {
        self.secret_reader = Some(reader);
        self
    }

    fn ask_secret(&mut self, question: &str) -> io::Result<Option<String>> {
        match self.secret_reader {
            Some(read) => read(question).map(Some),
            None => self.ask(question),
        }
    }

    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn confirm(&mut self, question: &str) -> bool {
        match self.ask(question) {
            Ok(Some(answer)) => answer.eq_ignore_ascii_case("y"),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Failed to read answer: {}", e);
                false
            }
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn credentials(&mut self) -> io::Result<Credentials> {
        let username = self.ask("Enter your username: ")?.unwrap_or_default();
        let password = self.ask_secret("Enter your password: ")?.unwrap_or_default();
        Ok(Credentials::new(username, password))
    }

    fn search_query(&mut self) -> Option<String> {
        match self.ask("Enter the sound you want to search for: ") {
            Ok(Some(raw)) => Some(normalize_query(&raw)).filter(|q| !q.is_empty()),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read query: {}", e);
                None
            }
        }
    }

    fn continue_to_next_page(&mut self, next_page: u32) -> bool {
        self.confirm(&format!(
            "Do you want to continue to page {}? (y/n): ",
            next_page
        ))
    }

    fn search_again(&mut self) -> bool {
        self.confirm("Do you want to search for another sound? (y/n): ")
    }
}
