//! `powercli-offline config`: inspect the installer profile.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective installer profile
    Show,
    /// Print the profile file location
    Path,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the profile cannot be located, loaded or serialized.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Path => {
            println!("{}", app.config_store.path()?.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let path = app.config_store.path()?;
    let profile = app.profile()?;
    let yaml = serde_yaml::to_string(&profile).context("cannot serialize profile")?;

    app.output.kv("file", &path.display().to_string());
    if !path.exists() {
        app.output.info("file not present, showing defaults");
    }
    println!();
    print!("{yaml}");
    Ok(ExitCode::SUCCESS)
}
