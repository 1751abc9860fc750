//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::config::{InstallerProfile, VendorConfiguration};
use crate::domain::module::InstalledModule;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
}

// ── Package Manager Port ──────────────────────────────────────────────────────

/// Installation scope for a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallScope {
    CurrentUser,
}

/// Parameters of a single install-by-name call.
#[derive(Debug, Clone, Copy)]
pub struct InstallRequest<'a> {
    /// Package name, e.g. `VMware.PowerCLI`.
    pub name: &'a str,
    /// Registered source to install from.
    pub repository: &'a str,
    pub scope: InstallScope,
    /// Reinstall even if the same version is present.
    pub force: bool,
    /// Allow commands that shadow commands of other modules.
    pub allow_clobber: bool,
}

impl<'a> InstallRequest<'a> {
    /// User-scoped, forced, clobber-allowed install from `repository`.
    #[must_use]
    pub fn forced_user(name: &'a str, repository: &'a str) -> Self {
        Self {
            name,
            repository,
            scope: InstallScope::CurrentUser,
            force: true,
            allow_clobber: true,
        }
    }
}

/// The host package manager: source registration, install, import, query.
///
/// Every method is a single external call; callers decide which failures
/// are fatal.
#[allow(async_fn_in_trait)]
pub trait PackageManager {
    /// Whether a source with this name is registered.
    async fn source_exists(&self, name: &str) -> Result<bool>;
    /// Register a filesystem-backed source.
    async fn register_source(&self, name: &str, location: &Path, trusted: bool) -> Result<()>;
    /// Remove a source registration.
    async fn unregister_source(&self, name: &str) -> Result<()>;
    /// Install a package and whatever dependencies the manager resolves.
    async fn install_package(&self, request: &InstallRequest<'_>) -> Result<()>;
    /// Rebuild the available-module index.
    async fn refresh_index(&self) -> Result<()>;
    /// Installed modules whose name matches `pattern` (wildcards allowed).
    async fn list_installed(&self, pattern: &str) -> Result<Vec<InstalledModule>>;
    /// Load a module.
    async fn import_module(&self, name: &str, force: bool) -> Result<()>;
    /// Number of commands exported by modules matching `pattern`.
    async fn count_commands(&self, pattern: &str) -> Result<usize>;
    /// Apply vendor configuration (loads `module` first).
    async fn set_configuration(&self, module: &str, config: &VendorConfiguration) -> Result<()>;
    /// Human-readable dump of the current vendor configuration.
    async fn show_configuration(&self, module: &str) -> Result<String>;
}

// ── Bundle Ports ──────────────────────────────────────────────────────────────

/// A named group of extensions offered by a file chooser.
#[derive(Debug, Clone, Copy)]
pub struct FileFilter {
    pub name: &'static str,
    /// Extensions without the dot; `*` matches everything.
    pub extensions: &'static [&'static str],
}

/// Presents an "open file" UI.
#[allow(async_fn_in_trait)]
pub trait FileChooser {
    /// Returns the chosen path, or `None` if the user dismissed the chooser.
    async fn choose_file(
        &self,
        initial_dir: &Path,
        filters: &[FileFilter],
    ) -> Result<Option<PathBuf>>;
}

/// Decompresses a bundle archive.
#[allow(async_fn_in_trait)]
pub trait ArchiveExtractor {
    /// Extract every entry of `archive` into `dest`, which must exist.
    async fn extract_all(&self, archive: &Path, dest: &Path) -> Result<()>;
}

// ── Interaction Ports ─────────────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an informational detail line.
    fn info(&self, message: &str);
}

/// Yes/no questions to the user.
pub trait UserPrompt {
    /// Ask for confirmation; returns `default` when prompting is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

// ── Filesystem and Path Ports ─────────────────────────────────────────────────

/// Abstracts local filesystem operations.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    /// Recursively copy `src` to `dest`, overwriting files that exist.
    fn copy_dir_all(&self, src: &Path, dest: &Path) -> Result<()>;
    /// Immediate children of `dir`, sorted.
    fn list_dir(&self, dir: &Path) -> Result<Vec<PathBuf>>;
    /// Files under `root` (recursive) with extension `ext`, sorted.
    fn find_files_with_extension(&self, root: &Path, ext: &str) -> Result<Vec<PathBuf>>;
}

/// Abstracts well-known local paths.
pub trait LocalPaths {
    /// Base directory for per-run workspaces.
    fn temp_dir(&self) -> PathBuf;
    /// Default user-level module install root.
    ///
    /// # Errors
    ///
    /// Returns an error if the user's directories cannot be determined.
    fn module_root(&self) -> Result<PathBuf>;
    /// Default starting directory for the file chooser.
    fn download_dir(&self) -> PathBuf;
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Abstracts installer profile loading.
pub trait ConfigStore {
    /// Load the profile, falling back to defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<InstallerProfile>;
    /// Location of the profile file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}
