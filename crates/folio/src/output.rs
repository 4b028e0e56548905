//! Terminal output.
//!
//! Command results go to stdout and stay pipeable; status lines go to stderr,
//! colored when stderr is a terminal.

use std::io;

use console::{Style, Term};

/// Split stdout/stderr writer.
pub(crate) struct Output {
    stdout: Term,
    stderr: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
            green: Style::new().green().for_stderr(),
            yellow: Style::new().yellow().for_stderr(),
            red: Style::new().red().for_stderr(),
        }
    }

    /// Write a command result to stdout.
    pub(crate) fn emit(&self, text: &str) -> io::Result<()> {
        self.stdout.write_str(text)?;
        self.stdout.flush()
    }

    /// Status line.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.stderr.write_line(msg);
    }

    /// Status line in green.
    pub(crate) fn success(&self, msg: &str) {
        self.styled(&self.green, msg);
    }

    /// Status line in yellow.
    pub(crate) fn warning(&self, msg: &str) {
        self.styled(&self.yellow, msg);
    }

    /// Status line in red.
    pub(crate) fn error(&self, msg: &str) {
        self.styled(&self.red, msg);
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self.stderr.write_line(&style.apply_to(msg).to_string());
    }
}
