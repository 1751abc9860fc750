//! Application service: optional post-install configuration.

use anyhow::Context;

use crate::application::ports::{PackageManager, ProgressReporter};
use crate::domain::config::InstallerProfile;
use crate::domain::module::StepOutcome;

/// Load the umbrella package, apply the profile's vendor configuration and
/// print the resulting settings.
///
/// Never fails: errors become a warning and a [`StepOutcome::Failed`].
pub async fn configure(
    pm: &impl PackageManager,
    reporter: &impl ProgressReporter,
    profile: &InstallerProfile,
) -> StepOutcome {
    reporter.step("applying configuration...");
    let module = profile.umbrella_package.as_str();
    let result = async {
        pm.import_module(module, true)
            .await
            .with_context(|| format!("importing {module}"))?;
        pm.set_configuration(module, &profile.configuration)
            .await
            .context("applying configuration")?;
        pm.show_configuration(module)
            .await
            .context("reading configuration")
    }
    .await;

    match result {
        Ok(summary) => {
            reporter.success("configuration applied");
            for line in summary.lines().filter(|l| !l.trim().is_empty()) {
                reporter.info(line);
            }
            StepOutcome::Ok
        }
        Err(e) => {
            let reason = format!("{e:#}");
            reporter.warn(&format!("configuration failed: {reason}"));
            StepOutcome::Failed(reason)
        }
    }
}
