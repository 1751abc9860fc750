//! Filesystem infrastructure: implements `LocalFs` and `LocalPaths`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::domain::bundle::has_extension;

/// Production filesystem implementation of the `LocalFs` and `LocalPaths` ports.
pub struct LocalFs;

impl crate::application::ports::LocalFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("removing directory {}", path.display()))
    }

    fn copy_dir_all(&self, src: &Path, dest: &Path) -> Result<()> {
        copy_dir_all(src, dest)
    }

    fn list_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = std::fs::read_dir(dir)
            .with_context(|| format!("reading directory {}", dir.display()))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("reading directory {}", dir.display()))?;
        entries.sort();
        Ok(entries)
    }

    fn find_files_with_extension(&self, root: &Path, ext: &str) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.with_context(|| format!("scanning {}", root.display()))?;
            if entry.file_type().is_file() && has_extension(entry.path(), ext) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        Ok(found)
    }
}

impl crate::application::ports::LocalPaths for LocalFs {
    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }

    fn module_root(&self) -> Result<PathBuf> {
        module_root()
    }

    fn download_dir(&self) -> PathBuf {
        dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Recursively copy `src` into `dest`, creating directories and overwriting
/// files that already exist.
///
/// # Errors
///
/// Returns an error if any directory cannot be created or file copied.
pub fn copy_dir_all(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.with_context(|| format!("scanning {}", src.display()))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("resolving {}", entry.path().display()))?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("creating directory {}", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating directory {}", parent.display()))?;
            }
            std::fs::copy(entry.path(), &target)
                .with_context(|| format!("copying {}", entry.path().display()))?;
        }
    }
    Ok(())
}

/// User-level PowerShell module root.
///
/// Windows: `Documents\WindowsPowerShell\Modules`
/// Linux/macOS: `~/.local/share/powershell/Modules`
///
/// # Errors
///
/// Returns an error if the user's directories cannot be determined.
pub fn module_root() -> Result<PathBuf> {
    #[cfg(windows)]
    return Ok(dirs::document_dir()
        .ok_or_else(|| anyhow::anyhow!("cannot determine documents directory"))?
        .join("WindowsPowerShell")
        .join("Modules"));
    #[cfg(not(windows))]
    Ok(dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?
        .join(".local")
        .join("share")
        .join("powershell")
        .join("Modules"))
}
