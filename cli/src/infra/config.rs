//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::InstallerProfile;

/// Environment variable overriding the profile location.
pub const CONFIG_ENV: &str = "POWERCLI_OFFLINE_CONFIG";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore;

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<InstallerProfile> {
        let path = self.path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no profile file, using defaults");
            return Ok(InstallerProfile::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let profile: InstallerProfile = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        profile
            .validate()
            .with_context(|| format!("invalid profile {}", path.display()))?;
        Ok(profile)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".powercli-offline").join("config.yaml"))
    }
}
