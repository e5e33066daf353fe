//! Terminal styling for usage text.
//!
//! Usage rendering only needs three effects: bold flag names, dim defaults
//! and a red required marker. [`PlainStyler`] returns text unchanged so
//! output can be compared byte for byte; [`ConsoleStyler`] emits ANSI codes
//! through `console`.

use console::{Style, Term};

/// Applies the text effects used by usage rendering.
pub trait Styler {
    fn bold(&self, text: &str) -> String;
    fn dim(&self, text: &str) -> String;
    fn red(&self, text: &str) -> String;
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStyler;

impl Styler for PlainStyler {
    fn bold(&self, text: &str) -> String {
        text.to_string()
    }

    fn dim(&self, text: &str) -> String {
        text.to_string()
    }

    fn red(&self, text: &str) -> String {
        text.to_string()
    }
}

/// ANSI styling via `console`.
#[derive(Debug, Clone)]
pub struct ConsoleStyler {
    bold: Style,
    dim: Style,
    red: Style,
}

impl ConsoleStyler {
    /// Always emit escape codes, regardless of the attached terminal.
    pub fn new() -> Self {
        Self {
            bold: Style::new().bold().force_styling(true),
            dim: Style::new().dim().force_styling(true),
            red: Style::new().red().force_styling(true),
        }
    }

    /// Use `ConsoleStyler` when stdout supports colors, else [`PlainStyler`].
    pub fn detect() -> Box<dyn Styler> {
        if Term::stdout().features().colors_supported() {
            Box::new(Self::new())
        } else {
            Box::new(PlainStyler)
        }
    }
}

impl Default for ConsoleStyler {
    fn default() -> Self {
        Self::new()
    }
}

impl Styler for ConsoleStyler {
    fn bold(&self, text: &str) -> String {
        self.bold.apply_to(text).to_string()
    }

    fn dim(&self, text: &str) -> String {
        self.dim.apply_to(text).to_string()
    }

    fn red(&self, text: &str) -> String {
        self.red.apply_to(text).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_is_identity() {
        assert_eq!(PlainStyler.bold("--port"), "--port");
        assert_eq!(PlainStyler.red("*"), "*");
    }

    #[test]
    fn console_wraps_in_escape_codes() {
        let styled = ConsoleStyler::new().bold("--port");
        assert!(styled.contains("\x1b["));
        assert!(styled.contains("--port"));
        assert_eq!(console::strip_ansi_codes(&styled), "--port");
    }
}
