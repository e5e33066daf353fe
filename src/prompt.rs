//! Interactive input for fields that were not given on the command line.
//!
//! [`Prompter`] is the seam between the field set and the terminal.
//! [`TerminalPrompter`] talks to the user through `console::Term`; tests
//! substitute a scripted implementation.

use std::io;

use console::Term;

/// Reads answers from the user. `prompt` is shown verbatim.
pub trait Prompter {
    /// Read one line. When `required` is set, keep asking until the answer
    /// is non-empty.
    fn read_line(&mut self, prompt: &str, required: bool) -> io::Result<String>;

    /// Read one line, returning `default` for an empty answer.
    fn read_line_with_default(&mut self, prompt: &str, default: &str) -> io::Result<String>;

    /// Read one line without echoing it.
    fn read_password(&mut self, prompt: &str) -> io::Result<String>;

    /// Ask a yes/no question until the answer is one of `y`, `yes`, `n`
    /// or `no`.
    fn read_yes_no(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Parse a yes/no answer, ignoring case and surrounding whitespace.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Prompts on stderr and reads from the controlling terminal.
#[derive(Debug, Clone)]
pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.term.write_str(prompt)?;
        self.term.flush()?;
        self.term.read_line()
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str, required: bool) -> io::Result<String> {
        loop {
            let answer = self.ask(prompt)?;
            if !required || !answer.is_empty() {
                return Ok(answer);
            }
        }
    }

    fn read_line_with_default(&mut self, prompt: &str, default: &str) -> io::Result<String> {
        let prompt = if default.is_empty() {
            prompt.to_string()
        } else {
            format!("{prompt}[{default}] ")
        };
        let answer = self.ask(&prompt)?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    fn read_password(&mut self, prompt: &str) -> io::Result<String> {
        self.term.write_str(prompt)?;
        self.term.flush()?;
        self.term.read_secure_line()
    }

    fn read_yes_no(&mut self, prompt: &str) -> io::Result<bool> {
        loop {
            let answer = self.ask(&format!("{prompt}(y/n) "))?;
            if let Some(yes) = parse_yes_no(&answer) {
                return Ok(yes);
            }
        }
    }
}
