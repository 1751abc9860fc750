//! Application service: workspace lifecycle and bundle extraction.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::application::ports::{ArchiveExtractor, LocalFs, ProgressReporter};
use crate::domain::bundle::{SelectedBundle, workspace_dir_name};
use crate::domain::error::InstallError;
use crate::domain::module::StepOutcome;

/// Owns the per-run extraction directory and removes it when dropped.
///
/// `close()` performs the removal explicitly and reports the outcome; `Drop`
/// covers every other exit path (early `?` returns, panics).
pub struct WorkspaceGuard<'a, F: LocalFs> {
    fs: &'a F,
    path: PathBuf,
    released: bool,
}

impl<'a, F: LocalFs> WorkspaceGuard<'a, F> {
    fn new(fs: &'a F, path: PathBuf) -> Self {
        Self {
            fs,
            path,
            released: false,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the workspace now. Failure is reported, never escalated.
    #[must_use]
    pub fn close(mut self) -> StepOutcome {
        self.released = true;
        StepOutcome::from_result(remove_workspace(self.fs, &self.path))
    }
}

impl<F: LocalFs> Drop for WorkspaceGuard<'_, F> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = remove_workspace(self.fs, &self.path) {
            tracing::warn!(path = %self.path.display(), "workspace cleanup failed: {e:#}");
        }
    }
}

fn remove_workspace(fs: &impl LocalFs, path: &Path) -> Result<()> {
    if fs.exists(path) {
        fs.remove_dir_all(path)?;
        tracing::debug!(path = %path.display(), "workspace removed");
    }
    Ok(())
}

/// Fail with [`InstallError::MissingBundle`] unless the archive exists.
///
/// # Errors
///
/// Returns an error if the bundle path does not exist.
pub fn check_bundle(fs: &impl LocalFs, bundle: &SelectedBundle) -> Result<()> {
    if !fs.exists(bundle.path()) {
        return Err(InstallError::MissingBundle(bundle.path().to_path_buf()).into());
    }
    Ok(())
}

/// Create a fresh workspace directory under `base`.
///
/// A directory left at the same path (same second, or a crashed run) is
/// removed first. The returned guard owns the directory from this point on.
///
/// # Errors
///
/// Returns an error if the stale directory cannot be removed or the new one
/// cannot be created.
pub fn prepare_workspace<'a, F: LocalFs>(
    fs: &'a F,
    base: &Path,
    prefix: &str,
    now: NaiveDateTime,
) -> Result<WorkspaceGuard<'a, F>> {
    let path = base.join(workspace_dir_name(prefix, now));
    if fs.exists(&path) {
        tracing::debug!(path = %path.display(), "removing stale workspace");
        fs.remove_dir_all(&path)
            .context("removing stale extraction workspace")?;
    }
    let guard = WorkspaceGuard::new(fs, path);
    fs.create_dir_all(guard.path())
        .context("creating extraction workspace")?;
    Ok(guard)
}

/// Decompress the bundle into `workspace` and return its top-level entries.
///
/// # Errors
///
/// Returns [`InstallError::ExtractFailure`] if the archive cannot be decoded,
/// or an error if the workspace cannot be listed afterwards.
pub async fn extract_bundle(
    extractor: &impl ArchiveExtractor,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    bundle: &SelectedBundle,
    workspace: &Path,
) -> Result<Vec<PathBuf>> {
    reporter.step(&format!("extracting {}...", bundle.path().display()));
    extractor
        .extract_all(bundle.path(), workspace)
        .await
        .map_err(|e| InstallError::ExtractFailure {
            archive: bundle.path().to_path_buf(),
            reason: format!("{e:#}"),
        })?;

    let entries = fs.list_dir(workspace).context("listing extracted bundle")?;
    reporter.success(&format!("extracted {} top-level entries", entries.len()));
    for entry in &entries {
        if let Some(name) = entry.file_name() {
            reporter.info(&name.to_string_lossy());
        }
    }
    Ok(entries)
}
