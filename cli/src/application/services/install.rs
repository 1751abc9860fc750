//! Application service: the two installation strategies.
//!
//! Every external call here is best-effort: failures are recorded in the
//! returned report and surfaced as warnings. The verifier decides whether
//! the run succeeded.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{InstallRequest, LocalFs, PackageManager, ProgressReporter};
use crate::domain::bundle::{has_extension, package_display_name, package_file_matches};
use crate::domain::config::InstallerProfile;
use crate::domain::module::{
    CopyOutcome, DiscoveredPackage, ModuleCopyReport, ModuleCopyResult, PackageInstallReport,
    StepOutcome,
};

// ── Package-file strategy ─────────────────────────────────────────────────────

/// Install from package files through a temporary local source.
///
/// The source is registered under `repository`, the umbrella package is
/// installed (with dependencies resolved from the same source), and if that
/// fails the profile's core packages are installed one at a time. The source
/// is unregistered on every path.
pub async fn install_packages(
    pm: &impl PackageManager,
    reporter: &impl ProgressReporter,
    profile: &InstallerProfile,
    workspace: &Path,
    package_files: &[PathBuf],
    repository: &str,
) -> PackageInstallReport {
    remove_stale_source(pm, reporter, repository).await;

    reporter.step(&format!("registering local source {repository}..."));
    let registered = StepOutcome::from_result(
        pm.register_source(repository, workspace, true)
            .await
            .with_context(|| format!("registering {repository}")),
    );
    match &registered {
        StepOutcome::Ok => reporter.success(&format!("local source {repository} registered")),
        StepOutcome::Failed(reason) => reporter.warn(reason),
    }

    let packages = describe_packages(package_files);
    reporter.info(&format!("{} package files in bundle:", packages.len()));
    for package in &packages {
        reporter.info(&format!("  {} ({})", package.display_name, package.file_name));
    }

    let umbrella = install_one(pm, reporter, &profile.umbrella_package, repository).await;

    let mut fallback = Vec::new();
    if !umbrella.is_ok() {
        reporter.warn("umbrella install failed, installing core packages individually");
        for name in &profile.core_packages {
            if !packages
                .iter()
                .any(|p| package_file_matches(&p.file_name, name))
            {
                tracing::debug!(package = %name, "no package file in bundle, skipping");
                continue;
            }
            let outcome = install_one(pm, reporter, name, repository).await;
            fallback.push((name.clone(), outcome));
        }
    }

    let unregistered = StepOutcome::from_result(
        pm.unregister_source(repository)
            .await
            .with_context(|| format!("unregistering {repository}")),
    );
    match &unregistered {
        StepOutcome::Ok => tracing::debug!(repository, "local source unregistered"),
        StepOutcome::Failed(reason) => reporter.warn(reason),
    }

    PackageInstallReport {
        repository: repository.to_string(),
        registered,
        packages,
        umbrella,
        fallback,
        unregistered,
    }
}

async fn remove_stale_source(
    pm: &impl PackageManager,
    reporter: &impl ProgressReporter,
    repository: &str,
) {
    match pm.source_exists(repository).await {
        Ok(true) => {
            tracing::info!(repository, "removing stale source registration");
            if let Err(e) = pm.unregister_source(repository).await {
                reporter.warn(&format!("could not remove stale source {repository}: {e:#}"));
            }
        }
        Ok(false) => {}
        Err(e) => tracing::debug!(repository, "source lookup failed: {e:#}"),
    }
}

async fn install_one(
    pm: &impl PackageManager,
    reporter: &impl ProgressReporter,
    name: &str,
    repository: &str,
) -> StepOutcome {
    reporter.step(&format!("installing {name}..."));
    let outcome = StepOutcome::from_result(
        pm.install_package(&InstallRequest::forced_user(name, repository))
            .await
            .with_context(|| format!("installing {name}")),
    );
    match &outcome {
        StepOutcome::Ok => reporter.success(&format!("{name} installed")),
        StepOutcome::Failed(reason) => {
            tracing::warn!(package = name, "install failed: {reason}");
            reporter.warn(reason);
        }
    }
    outcome
}

fn describe_packages(package_files: &[PathBuf]) -> Vec<DiscoveredPackage> {
    package_files
        .iter()
        .filter_map(|path| {
            let file_name = path.file_name()?.to_string_lossy().into_owned();
            Some(DiscoveredPackage {
                path: path.clone(),
                display_name: package_display_name(&file_name),
                file_name,
            })
        })
        .collect()
}

// ── Module-directory strategy ─────────────────────────────────────────────────

/// Copy module directories into `module_root`, replacing existing copies.
///
/// Each module is independent: a failed copy is recorded and the remaining
/// modules are still installed. Modules already copied are not rolled back.
///
/// # Errors
///
/// Returns an error only if `module_root` cannot be created.
pub fn install_modules(
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    profile: &InstallerProfile,
    module_root: &Path,
    module_dirs: &[PathBuf],
) -> Result<ModuleCopyReport> {
    if !fs.exists(module_root) {
        fs.create_dir_all(module_root)
            .context("creating module root")?;
    }
    reporter.info(&format!("module root: {}", module_root.display()));

    let mut modules = Vec::with_capacity(module_dirs.len());
    for src in module_dirs {
        let Some(name) = src.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let destination = module_root.join(&name);
        reporter.step(&format!("copying {name}..."));

        let outcome = match copy_module(fs, src, &destination, &profile.manifest_extension) {
            Ok(true) => {
                reporter.success(&format!("{name} installed"));
                CopyOutcome::Installed
            }
            Ok(false) => {
                reporter.warn(&format!("{name} installed, but no manifest found"));
                CopyOutcome::InstalledWithoutManifest
            }
            Err(e) => {
                let reason = format!("{e:#}");
                tracing::warn!(module = %name, "copy failed: {reason}");
                reporter.warn(&format!("{name} could not be copied: {reason}"));
                CopyOutcome::Failed(reason)
            }
        };
        modules.push(ModuleCopyResult {
            name,
            destination,
            outcome,
        });
    }

    Ok(ModuleCopyReport {
        module_root: module_root.to_path_buf(),
        modules,
    })
}

/// Replace `dest` with a copy of `src`; returns whether a manifest is present.
fn copy_module(fs: &impl LocalFs, src: &Path, dest: &Path, manifest_ext: &str) -> Result<bool> {
    if fs.exists(dest) {
        fs.remove_dir_all(dest)
            .with_context(|| format!("removing previous copy at {}", dest.display()))?;
    }
    fs.copy_dir_all(src, dest)?;
    let has_manifest = fs
        .list_dir(dest)?
        .iter()
        .any(|p| !fs.is_dir(p) && has_extension(p, manifest_ext));
    Ok(has_manifest)
}
