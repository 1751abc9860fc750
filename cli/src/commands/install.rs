//! `powercli-offline install`: select, extract, install and verify a bundle.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::pipeline::{RunOptions, RunOutcome, RunSummary, run_install};
use crate::domain::config::{ChooserKind, InstallerProfile};
use crate::domain::module::{CopyOutcome, ImportOutcome, InstallReport, StepOutcome};
use crate::infra::archive::BundleArchive;
use crate::infra::chooser::BundleChooser;
use crate::infra::fs::LocalFs;
use crate::infra::powershell::PowerShellHost;
use crate::output::{OutputContext, TerminalReporter};

/// Arguments for the install command.
#[derive(Args, Debug, Default)]
pub struct InstallArgs {
    /// Bundle archive to install (skips the file chooser)
    #[arg(long, short)]
    pub bundle: Option<PathBuf>,

    /// Umbrella package to install instead of the profile's
    #[arg(long, value_name = "NAME")]
    pub package: Option<String>,

    /// Pick the bundle in the terminal instead of a desktop dialog
    #[arg(long)]
    pub terminal: bool,
}

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the installer profile cannot be loaded. Install
/// failures are reported and mapped to a failing exit code instead.
pub async fn run(app: &AppContext, args: InstallArgs) -> Result<ExitCode> {
    let mut profile = app.profile()?;
    if let Some(package) = args.package {
        profile.umbrella_package = package;
    }
    if args.terminal {
        profile.chooser = ChooserKind::Terminal;
    }

    app.output.header("PowerCLI offline installer");

    let chooser = BundleChooser::from_kind(profile.chooser);
    let pm = PowerShellHost::with_timeout(
        profile.shell.as_deref(),
        Duration::from_secs(profile.command_timeout_secs),
    );
    let reporter = TerminalReporter::new(&app.output);

    let result = run_install(
        &chooser,
        &BundleArchive,
        &pm,
        &LocalFs,
        &LocalFs,
        RunOptions {
            reporter: &reporter,
            prompt: app,
            profile: &profile,
            bundle: args.bundle,
        },
    )
    .await;
    drop(reporter);

    let code = match result {
        Ok(RunOutcome::Cancelled) => {
            app.output.info("No bundle selected.");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Declined) => {
            app.output.info("Installation cancelled.");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Completed(summary)) => {
            render_summary(&app.output, &profile, &summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("install failed: {e:#}");
            app.output.error(&format!("{e:#}"));
            app.output.error("Installation failed.");
            ExitCode::FAILURE
        }
    };

    app.pause();
    Ok(code)
}

fn render_summary(out: &OutputContext, profile: &InstallerProfile, summary: &RunSummary) {
    out.blank();
    out.header("Installation summary");
    out.kv("bundle  ", &summary.bundle.path().display().to_string());

    match &summary.install {
        InstallReport::Packages(report) => {
            out.kv("strategy", "package files (local source)");
            let umbrella = if report.umbrella.is_ok() {
                "installed".to_string()
            } else {
                let ok = report.fallback.iter().filter(|(_, o)| o.is_ok()).count();
                format!(
                    "failed, {ok}/{} core packages installed individually",
                    report.fallback.len()
                )
            };
            out.kv("umbrella", &format!("{} {umbrella}", profile.umbrella_package));
        }
        InstallReport::Modules(report) => {
            out.kv("strategy", "module directories (copied)");
            let copied = report
                .modules
                .iter()
                .filter(|m| !matches!(m.outcome, CopyOutcome::Failed(_)))
                .count();
            out.kv(
                "modules ",
                &format!(
                    "{copied}/{} copied to {}",
                    report.modules.len(),
                    report.module_root.display()
                ),
            );
        }
    }

    out.kv("found   ", &format!("{} modules", summary.verify.modules.len()));
    match &summary.verify.import {
        ImportOutcome::Umbrella {
            command_count: Some(n),
        } => out.kv("loaded  ", &format!("{} ({n} commands)", profile.umbrella_package)),
        ImportOutcome::Umbrella { command_count: None } => {
            out.kv("loaded  ", &profile.umbrella_package);
        }
        ImportOutcome::Fallback { imports, .. } => {
            let names: Vec<&str> = imports
                .iter()
                .filter(|(_, o)| o.is_ok())
                .map(|(n, _)| n.as_str())
                .collect();
            out.kv("loaded  ", &format!("core modules only: {}", names.join(", ")));
        }
    }
    match &summary.configured {
        Some(StepOutcome::Ok) => out.kv("config  ", "applied"),
        Some(StepOutcome::Failed(_)) => out.kv("config  ", "failed (see warnings above)"),
        None => out.kv("config  ", "skipped"),
    }
    out.blank();
    out.success(&format!(
        "Installation complete. Run 'Import-Module {}' in PowerShell to use it.",
        profile.umbrella_package
    ));
}
