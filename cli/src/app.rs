//! Application context: unified state passed to every command handler.
//!
//! `AppContext` is built once in `Cli::run()`. Adding a cross-cutting
//! concern requires only one field change here.

use anyhow::{Context, Result};
use console::Term;

use crate::application::ports::{ConfigStore, UserPrompt};
use crate::domain::config::InstallerProfile;
use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `POWERCLI_OFFLINE_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Installer profile store.
    pub config_store: YamlConfigStore,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or
    /// `POWERCLI_OFFLINE_YES` environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("POWERCLI_OFFLINE_YES").is_ok();
        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            config_store: YamlConfigStore,
            non_interactive: flags.behaviour.yes || ci_env,
        }
    }

    /// Load the installer profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile file exists but is unreadable or invalid.
    pub fn profile(&self) -> Result<InstallerProfile> {
        self.config_store.load()
    }

    /// Wait for a keypress so a double-clicked console window stays open.
    ///
    /// Skipped when non-interactive or when stdin is not a terminal.
    pub fn pause(&self) {
        if self.non_interactive {
            return;
        }
        let term = Term::stdout();
        if !term.is_term() {
            return;
        }
        println!();
        println!("  Press any key to exit...");
        if let Err(e) = term.read_key() {
            tracing::debug!("pause aborted: {e}");
        }
    }
}

impl UserPrompt for AppContext {
    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or
    /// `POWERCLI_OFFLINE_YES` env), returns `default` immediately without
    /// prompting.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .context("confirmation prompt failed")
    }
}
