//! Bundle naming and classification rules.
//!
//! Pure functions only: the filesystem scan that feeds
//! [`select_strategy`] lives in the application layer.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

/// Archive suffixes offered by the file chooser, longest first.
pub const ARCHIVE_SUFFIXES: &[&str] = &[".tar.gz", ".tgz", ".tar", ".zip"];

/// Extensions (without dot) for chooser filters.
pub const ARCHIVE_FILTER_EXTENSIONS: &[&str] = &["zip", "tgz", "gz", "tar"];

/// Trailing `.1.2.3`, `.1.2.3.4` or `-1.2.3-beta` on a package file stem.
#[allow(clippy::expect_used)] // compile-time constant pattern
static VERSION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[.-]\d+\.\d+\.\d+(?:\.\d+)?(?:-[0-9A-Za-z.-]+)?$").expect("valid regex")
});

/// An archive path chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedBundle {
    path: PathBuf,
}

impl SelectedBundle {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Archive format, decided by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
    Tar,
}

impl ArchiveKind {
    /// Detect the format from the file name. Anything unrecognised is
    /// treated as zip, the format bundles are normally shipped in.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Self::TarGz
        } else if name.ends_with(".tar") {
            Self::Tar
        } else {
            Self::Zip
        }
    }
}

/// Returns `true` if `name` looks like a supported archive.
#[must_use]
pub fn is_archive_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ARCHIVE_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

/// Directory name of the per-run extraction workspace.
///
/// Second precision: two runs within the same second map to the same
/// directory, which the extractor removes before reuse.
#[must_use]
pub fn workspace_dir_name(prefix: &str, now: NaiveDateTime) -> String {
    format!("{prefix}{}", now.format("%Y%m%d_%H%M%S"))
}

/// Generate a unique local repository name.
///
/// Format: `prefix` followed by 16 lowercase hex characters.
/// Entropy sources: nanosecond timestamp and two independent `RandomState` hashes.
#[must_use]
pub fn generate_repository_name(prefix: &str) -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    hasher.write_u64(RandomState::new().build_hasher().finish());
    hasher.write_u64(RandomState::new().build_hasher().finish());
    format!("{prefix}{:016x}", hasher.finish())
}

/// Case-insensitive extension check; `ext` has no leading dot.
#[must_use]
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
}

/// Logical package name of a package file, for display.
///
/// `VMware.VimAutomation.Core.13.3.0.24145081.nupkg` → `VMware.VimAutomation.Core`
#[must_use]
pub fn package_display_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map_or_else(|| file_name.to_string(), |s| s.to_string_lossy().into_owned());
    VERSION_SUFFIX.replace(&stem, "").into_owned()
}

/// Returns `true` if a package file name belongs to `package`.
///
/// Substring match, ignoring ASCII case like PowerShell module names do.
#[must_use]
pub fn package_file_matches(file_name: &str, package: &str) -> bool {
    file_name
        .to_ascii_lowercase()
        .contains(&package.to_ascii_lowercase())
}

/// A directory is a module directory if it carries the vendor prefix or
/// directly contains a manifest.
#[must_use]
pub fn is_module_dir(dir_name: &str, vendor_prefix: &str, has_manifest: bool) -> bool {
    has_manifest
        || dir_name
            .get(..vendor_prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(vendor_prefix))
}

/// Installation strategy picked by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Register the workspace as a local source and install by name.
    PackageFiles(Vec<PathBuf>),
    /// Copy module directories into the user module root.
    ModuleDirectories(Vec<PathBuf>),
}

impl InstallStrategy {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::PackageFiles(_) => "package files",
            Self::ModuleDirectories(_) => "module directories",
        }
    }
}

/// Pick a strategy. Package files take precedence over module directories.
#[must_use]
pub fn select_strategy(
    package_files: Vec<PathBuf>,
    module_dirs: Vec<PathBuf>,
) -> Option<InstallStrategy> {
    if !package_files.is_empty() {
        Some(InstallStrategy::PackageFiles(package_files))
    } else if !module_dirs.is_empty() {
        Some(InstallStrategy::ModuleDirectories(module_dirs))
    } else {
        None
    }
}
