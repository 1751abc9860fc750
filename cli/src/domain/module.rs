//! Installed-module records and per-stage reports.

use std::path::PathBuf;

use serde::Deserialize;

/// A module the package manager reports as installed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstalledModule {
    pub name: String,
    pub version: String,
}

/// Sort by name, then version, for stable reporting.
pub fn sort_modules(modules: &mut [InstalledModule]) {
    modules.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version)));
}

/// Result of a best-effort step. Failures are reported, never escalated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Ok,
    Failed(String),
}

impl StepOutcome {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Collapse a fallible call into an outcome, keeping the full error chain.
    #[must_use]
    pub fn from_result<T>(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(e) => Self::Failed(format!("{e:#}")),
        }
    }
}

/// A package file found in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPackage {
    pub path: PathBuf,
    pub file_name: String,
    pub display_name: String,
}

/// Outcome of the package-file strategy.
#[derive(Debug, Clone)]
pub struct PackageInstallReport {
    pub repository: String,
    pub registered: StepOutcome,
    pub packages: Vec<DiscoveredPackage>,
    pub umbrella: StepOutcome,
    /// Individual installs attempted after the umbrella failed, in order.
    pub fallback: Vec<(String, StepOutcome)>,
    pub unregistered: StepOutcome,
}

/// Outcome of copying one module directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Installed,
    InstalledWithoutManifest,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ModuleCopyResult {
    pub name: String,
    pub destination: PathBuf,
    pub outcome: CopyOutcome,
}

/// Outcome of the module-directory strategy.
#[derive(Debug, Clone)]
pub struct ModuleCopyReport {
    pub module_root: PathBuf,
    pub modules: Vec<ModuleCopyResult>,
}

#[derive(Debug, Clone)]
pub enum InstallReport {
    Packages(PackageInstallReport),
    Modules(ModuleCopyReport),
}

/// How the verifier managed to load the vendor modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The umbrella package imported; command count if it could be queried.
    Umbrella { command_count: Option<usize> },
    /// The umbrella import failed; per-module fallback results.
    Fallback {
        reason: String,
        imports: Vec<(String, StepOutcome)>,
    },
}

#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub modules: Vec<InstalledModule>,
    pub import: ImportOutcome,
}
