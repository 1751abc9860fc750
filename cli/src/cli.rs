//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Offline installer for VMware PowerCLI bundles
#[derive(Parser, Debug)]
#[command(name = "powercli-offline", version, propagate_version = true)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Answer prompts with their defaults and skip the final pause
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Defaults to `install` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install modules from an offline bundle
    Install(commands::install::InstallArgs),

    /// Inspect the installer profile
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot start (e.g. invalid profile).
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            quiet,
            no_color,
            yes,
            command,
            ..
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags { no_color, quiet },
            behaviour: BehaviourFlags { yes },
        });

        match command.unwrap_or_else(|| Command::Install(commands::install::InstallArgs::default())) {
            Command::Install(args) => commands::install::run(&app, args).await,
            Command::Config(cmd) => commands::config::run(&app, &cmd),
            Command::Version { json } => {
                commands::version::run(json);
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
