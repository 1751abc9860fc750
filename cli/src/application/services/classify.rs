//! Application service: decide how an extracted bundle is installed.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::application::ports::LocalFs;
use crate::domain::bundle::{InstallStrategy, has_extension, is_module_dir, select_strategy};
use crate::domain::config::InstallerProfile;
use crate::domain::error::InstallError;

/// Classify the workspace contents.
///
/// Package files anywhere in the tree select the package-file strategy.
/// Otherwise top-level module directories select the module-directory
/// strategy. Neither is [`InstallError::NoPackageStructure`].
///
/// # Errors
///
/// Returns an error if the workspace cannot be scanned or contains nothing
/// installable.
pub fn classify(
    fs: &impl LocalFs,
    workspace: &Path,
    profile: &InstallerProfile,
) -> Result<InstallStrategy> {
    let package_files = fs.find_files_with_extension(workspace, &profile.package_extension)?;
    let module_dirs = if package_files.is_empty() {
        find_module_dirs(fs, workspace, profile)?
    } else {
        Vec::new()
    };
    tracing::debug!(
        packages = package_files.len(),
        module_dirs = module_dirs.len(),
        "classified workspace"
    );

    select_strategy(package_files, module_dirs)
        .ok_or_else(|| InstallError::NoPackageStructure(workspace.to_path_buf()).into())
}

fn find_module_dirs(
    fs: &impl LocalFs,
    workspace: &Path,
    profile: &InstallerProfile,
) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs.list_dir(workspace)? {
        if !fs.is_dir(&entry) {
            continue;
        }
        let Some(name) = entry.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let has_manifest = fs
            .list_dir(&entry)?
            .iter()
            .any(|p| !fs.is_dir(p) && has_extension(p, &profile.manifest_extension));
        if is_module_dir(&name, &profile.vendor_prefix, has_manifest) {
            found.push(entry);
        }
    }
    Ok(found)
}
