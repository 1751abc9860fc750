//! Domain types and validators for the installer profile.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Defaults ─────────────────────────────────────────────────────────────────

pub const DEFAULT_VENDOR_PREFIX: &str = "VMware.";
pub const DEFAULT_UMBRELLA_PACKAGE: &str = "VMware.PowerCLI";

/// Installed one by one, in this order, when the umbrella install fails.
pub const DEFAULT_CORE_PACKAGES: &[&str] = &[
    "VMware.VimAutomation.Sdk",
    "VMware.VimAutomation.Common",
    "VMware.Vim",
    "VMware.VimAutomation.Core",
    "VMware.PowerCLI",
];

/// Imported individually when the umbrella import fails.
pub const DEFAULT_FALLBACK_IMPORTS: &[&str] =
    &["VMware.VimAutomation.Core", "VMware.VimAutomation.Common"];

pub const DEFAULT_PACKAGE_EXTENSION: &str = "nupkg";
pub const DEFAULT_MANIFEST_EXTENSION: &str = "psd1";
pub const DEFAULT_WORKSPACE_PREFIX: &str = "PowerCLI_Offline_";
pub const DEFAULT_REPOSITORY_PREFIX: &str = "PowerCLI_Local_";
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 600;

// ── Profile schema ───────────────────────────────────────────────────────────

/// Top-level installer profile stored in `~/.powercli-offline/config.yaml`.
///
/// Every field is optional in the file; missing fields take the PowerCLI
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InstallerProfile {
    /// Module name prefix identifying the vendor namespace, e.g. `VMware.`.
    pub vendor_prefix: String,
    /// Top-level package whose install pulls in everything else.
    pub umbrella_package: String,
    /// Ordered fallback install list, umbrella last.
    pub core_packages: Vec<String>,
    /// Modules imported individually when the umbrella import fails.
    pub fallback_imports: Vec<String>,
    /// Package file extension without the dot.
    pub package_extension: String,
    /// Module manifest extension without the dot.
    pub manifest_extension: String,
    /// Prefix of the per-run extraction directory under the temp dir.
    pub workspace_prefix: String,
    /// Prefix of the per-run local repository registration.
    pub repository_prefix: String,
    /// Overrides the user-level module root.
    pub module_root: Option<PathBuf>,
    /// Starting directory for the file chooser.
    pub initial_dir: Option<PathBuf>,
    /// Which file chooser to present.
    pub chooser: ChooserKind,
    /// PowerShell executable (`pwsh` or `powershell`).
    pub shell: Option<String>,
    /// Timeout for a single package-manager call.
    pub command_timeout_secs: u64,
    /// Answer used for the configure prompt under `--yes`.
    pub configure_by_default: bool,
    /// Post-install vendor configuration.
    pub configuration: VendorConfiguration,
}

impl Default for InstallerProfile {
    fn default() -> Self {
        Self {
            vendor_prefix: DEFAULT_VENDOR_PREFIX.to_string(),
            umbrella_package: DEFAULT_UMBRELLA_PACKAGE.to_string(),
            core_packages: DEFAULT_CORE_PACKAGES.iter().map(|s| (*s).to_string()).collect(),
            fallback_imports: DEFAULT_FALLBACK_IMPORTS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            package_extension: DEFAULT_PACKAGE_EXTENSION.to_string(),
            manifest_extension: DEFAULT_MANIFEST_EXTENSION.to_string(),
            workspace_prefix: DEFAULT_WORKSPACE_PREFIX.to_string(),
            repository_prefix: DEFAULT_REPOSITORY_PREFIX.to_string(),
            module_root: None,
            initial_dir: None,
            chooser: ChooserKind::default(),
            shell: None,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            configure_by_default: false,
            configuration: VendorConfiguration::default(),
        }
    }
}

impl InstallerProfile {
    /// Wildcard matching every module in the vendor namespace, e.g. `VMware.*`.
    #[must_use]
    pub fn namespace_pattern(&self) -> String {
        format!("{}*", self.vendor_prefix)
    }

    /// Validates fields that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns an error if a required name or extension is empty.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("vendor_prefix", &self.vendor_prefix),
            ("umbrella_package", &self.umbrella_package),
            ("package_extension", &self.package_extension),
            ("manifest_extension", &self.manifest_extension),
            ("workspace_prefix", &self.workspace_prefix),
            ("repository_prefix", &self.repository_prefix),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty {
                    key: key.to_string(),
                }
                .into());
            }
        }
        if self.command_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "command_timeout_secs".to_string(),
                value: "0".to_string(),
                valid: "any positive number of seconds".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// File chooser implementation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChooserKind {
    /// Desktop "open file" dialog.
    #[default]
    Native,
    /// Fuzzy picker in the terminal.
    Terminal,
}

// ── Vendor configuration ─────────────────────────────────────────────────────

/// Settings applied by the configurator after a successful install.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VendorConfiguration {
    pub participate_in_telemetry: bool,
    pub invalid_certificate_action: CertificateAction,
    pub scope: ConfigScope,
}

impl Default for VendorConfiguration {
    fn default() -> Self {
        Self {
            participate_in_telemetry: false,
            invalid_certificate_action: CertificateAction::Ignore,
            scope: ConfigScope::User,
        }
    }
}

/// Reaction to an invalid server certificate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CertificateAction {
    Ignore,
    Warn,
    Prompt,
    Fail,
    Unset,
}

impl fmt::Display for CertificateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ignore => "Ignore",
            Self::Warn => "Warn",
            Self::Prompt => "Prompt",
            Self::Fail => "Fail",
            Self::Unset => "Unset",
        };
        f.write_str(s)
    }
}

/// Scope a configuration change is written to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConfigScope {
    Session,
    User,
    AllUsers,
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Session => "Session",
            Self::User => "User",
            Self::AllUsers => "AllUsers",
        };
        f.write_str(s)
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
