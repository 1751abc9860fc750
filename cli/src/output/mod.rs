//! Console output: status lines, spinners and the progress reporter.

pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Styling and terminal state shared by every command.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Suppress everything except errors.
    pub quiet: bool,
}

impl OutputContext {
    /// Colors are used only on a TTY, and never with `no_color` or `NO_COLOR`.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var_os("NO_COLOR").is_none();
        Self {
            styles: Styles::for_terminal(use_colors),
            is_tty,
            quiet,
        }
    }

    /// Spinners need a TTY and are hidden in quiet mode.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    fn status(&self, symbol: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", symbol.style(style));
        }
    }

    pub fn success(&self, msg: &str) {
        self.status("✓", self.styles.success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.status("⚠", self.styles.warning, msg);
    }

    pub fn info(&self, msg: &str) {
        self.status("ℹ", self.styles.info, msg);
    }

    pub fn step(&self, msg: &str) {
        self.status("→", self.styles.step, msg);
    }

    /// Errors go to stderr and ignore `quiet`.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Summary row with a dimmed key.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }

    pub fn blank(&self) {
        if !self.quiet {
            println!();
        }
    }
}
