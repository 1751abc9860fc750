//! Application service: post-install verification.

use anyhow::Result;

use crate::application::ports::{PackageManager, ProgressReporter};
use crate::domain::config::InstallerProfile;
use crate::domain::error::InstallError;
use crate::domain::module::{ImportOutcome, StepOutcome, VerifyReport, sort_modules};

/// Check that vendor modules are installed and loadable.
///
/// Fails only when no module matches the vendor namespace. A failed umbrella
/// import falls back to importing `fallback_imports` one by one; the verdict
/// stays successful whatever those imports return.
///
/// # Errors
///
/// Returns [`InstallError::VerificationFailure`] if no modules are found.
pub async fn verify(
    pm: &impl PackageManager,
    reporter: &impl ProgressReporter,
    profile: &InstallerProfile,
) -> Result<VerifyReport> {
    reporter.step("verifying installation...");
    if let Err(e) = pm.refresh_index().await {
        tracing::debug!("module index refresh failed: {e:#}");
    }

    let pattern = profile.namespace_pattern();
    let mut modules = match pm.list_installed(&pattern).await {
        Ok(modules) => modules,
        Err(e) => {
            reporter.warn(&format!("could not list installed modules: {e:#}"));
            Vec::new()
        }
    };
    if modules.is_empty() {
        return Err(InstallError::VerificationFailure(pattern).into());
    }

    sort_modules(&mut modules);
    reporter.success(&format!("found {} installed modules", modules.len()));
    for module in &modules {
        reporter.info(&format!("{} {}", module.name, module.version));
    }

    let import = match pm.import_module(&profile.umbrella_package, true).await {
        Ok(()) => {
            let command_count = match pm.count_commands(&pattern).await {
                Ok(n) => {
                    reporter.success(&format!(
                        "{} loaded, {n} commands available",
                        profile.umbrella_package
                    ));
                    Some(n)
                }
                Err(e) => {
                    tracing::debug!("command count failed: {e:#}");
                    reporter.success(&format!("{} loaded", profile.umbrella_package));
                    None
                }
            };
            ImportOutcome::Umbrella { command_count }
        }
        Err(e) => {
            let reason = format!("{e:#}");
            reporter.warn(&format!(
                "{} could not be imported, trying core modules",
                profile.umbrella_package
            ));
            let mut imports = Vec::with_capacity(profile.fallback_imports.len());
            for name in &profile.fallback_imports {
                let outcome = StepOutcome::from_result(pm.import_module(name, true).await);
                match &outcome {
                    StepOutcome::Ok => reporter.success(&format!("{name} loaded")),
                    StepOutcome::Failed(why) => tracing::debug!(module = %name, "import failed: {why}"),
                }
                imports.push((name.clone(), outcome));
            }
            ImportOutcome::Fallback { reason, imports }
        }
    };

    Ok(VerifyReport { modules, import })
}
