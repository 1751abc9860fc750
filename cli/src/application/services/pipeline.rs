//! Application service: the end-to-end offline install use-case.
//!
//! select → confirm → extract → classify → install → verify → cleanup →
//! (optional) configure. All I/O is routed through injected port traits.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;

use crate::application::ports::{
    ArchiveExtractor, FileChooser, FileFilter, LocalFs, LocalPaths, PackageManager,
    ProgressReporter, UserPrompt,
};
use crate::application::services::classify::classify;
use crate::application::services::configure::configure;
use crate::application::services::extract::{check_bundle, extract_bundle, prepare_workspace};
use crate::application::services::install::{install_modules, install_packages};
use crate::application::services::verify::verify;
use crate::domain::bundle::{
    ARCHIVE_FILTER_EXTENSIONS, InstallStrategy, SelectedBundle, generate_repository_name,
};
use crate::domain::config::InstallerProfile;
use crate::domain::module::{InstallReport, StepOutcome, VerifyReport};

/// Filters offered by the file chooser: archives first, then everything.
pub const BUNDLE_FILTERS: &[FileFilter] = &[
    FileFilter {
        name: "Bundle archives",
        extensions: ARCHIVE_FILTER_EXTENSIONS,
    },
    FileFilter {
        name: "All files",
        extensions: &["*"],
    },
];

pub struct RunOptions<'a, R: ProgressReporter, U: UserPrompt> {
    pub reporter: &'a R,
    pub prompt: &'a U,
    pub profile: &'a InstallerProfile,
    /// Skip the file chooser and install this archive.
    pub bundle: Option<PathBuf>,
}

/// Outcome of the `run_install` use-case.
#[derive(Debug)]
pub enum RunOutcome {
    /// The user dismissed the file chooser.
    Cancelled,
    /// The user declined the install prompt.
    Declined,
    /// The bundle was installed and verified.
    Completed(Box<RunSummary>),
}

#[derive(Debug)]
pub struct RunSummary {
    pub bundle: SelectedBundle,
    pub install: InstallReport,
    pub verify: VerifyReport,
    /// `None` if configuration was skipped.
    pub configured: Option<StepOutcome>,
}

/// Run the whole offline install.
///
/// The extraction workspace is removed before this returns, whichever stage
/// failed.
///
/// # Errors
///
/// Returns an [`crate::domain::error::InstallError`] for a missing bundle, an
/// undecodable archive, an unrecognised bundle layout, or when no vendor
/// module is installed afterwards; other errors for workspace I/O failures.
pub async fn run_install(
    chooser: &impl FileChooser,
    extractor: &impl ArchiveExtractor,
    pm: &impl PackageManager,
    local_fs: &impl LocalFs,
    paths: &impl LocalPaths,
    opts: RunOptions<'_, impl ProgressReporter, impl UserPrompt>,
) -> Result<RunOutcome> {
    let RunOptions {
        reporter,
        prompt,
        profile,
        bundle,
    } = opts;

    let path = match bundle {
        Some(path) => path,
        None => {
            let initial_dir = profile
                .initial_dir
                .clone()
                .unwrap_or_else(|| paths.download_dir());
            match chooser.choose_file(&initial_dir, BUNDLE_FILTERS).await? {
                Some(path) => path,
                None => return Ok(RunOutcome::Cancelled),
            }
        }
    };
    let bundle = SelectedBundle::new(path);
    reporter.info(&format!("bundle: {}", bundle.path().display()));

    if !prompt.confirm(
        &format!("Install {} from this bundle?", profile.umbrella_package),
        true,
    )? {
        return Ok(RunOutcome::Declined);
    }

    check_bundle(local_fs, &bundle)?;

    let workspace = prepare_workspace(
        local_fs,
        &paths.temp_dir(),
        &profile.workspace_prefix,
        Local::now().naive_local(),
    )?;
    tracing::info!(workspace = %workspace.path().display(), "workspace created");

    let result = install_in_workspace(
        extractor,
        pm,
        local_fs,
        paths,
        reporter,
        profile,
        &bundle,
        workspace.path(),
    )
    .await;

    match workspace.close() {
        StepOutcome::Ok => reporter.info("temporary files removed"),
        StepOutcome::Failed(reason) => {
            reporter.warn(&format!("could not remove temporary files: {reason}"));
        }
    }

    let (install, verify) = result?;

    let configured = match prompt.confirm(
        "Apply recommended configuration now?",
        profile.configure_by_default,
    ) {
        Ok(true) => Some(configure(pm, reporter, profile).await),
        Ok(false) => None,
        Err(e) => {
            reporter.warn(&format!("skipping configuration: {e:#}"));
            None
        }
    };

    Ok(RunOutcome::Completed(Box::new(RunSummary {
        bundle,
        install,
        verify,
        configured,
    })))
}

#[allow(clippy::too_many_arguments)]
async fn install_in_workspace(
    extractor: &impl ArchiveExtractor,
    pm: &impl PackageManager,
    local_fs: &impl LocalFs,
    paths: &impl LocalPaths,
    reporter: &impl ProgressReporter,
    profile: &InstallerProfile,
    bundle: &SelectedBundle,
    workspace: &Path,
) -> Result<(InstallReport, VerifyReport)> {
    extract_bundle(extractor, local_fs, reporter, bundle, workspace).await?;

    let strategy = classify(local_fs, workspace, profile)?;
    reporter.success(&format!("detected {}", strategy.label()));

    let install = match strategy {
        InstallStrategy::PackageFiles(files) => {
            let repository = generate_repository_name(&profile.repository_prefix);
            InstallReport::Packages(
                install_packages(pm, reporter, profile, workspace, &files, &repository).await,
            )
        }
        InstallStrategy::ModuleDirectories(dirs) => {
            let module_root = match &profile.module_root {
                Some(root) => root.clone(),
                None => paths.module_root()?,
            };
            InstallReport::Modules(install_modules(
                local_fs,
                reporter,
                profile,
                &module_root,
                &dirs,
            )?)
        }
    };

    let verify = verify(pm, reporter, profile).await?;
    Ok((install, verify))
}
