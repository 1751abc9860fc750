//! PowerShellGet implementation of the `PackageManager` port.
//!
//! Every call spawns a fresh `pwsh -NoProfile -NonInteractive -Command`
//! process through the injected `CommandRunner`. Imports therefore only prove
//! a module loads; they do not persist into the user's session.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, InstallRequest, InstallScope, PackageManager};
use crate::domain::config::VendorConfiguration;
use crate::domain::module::InstalledModule;
use crate::infra::command_runner::TokioCommandRunner;

/// Prepended to every script so cmdlet errors terminate with a non-zero exit.
const PREAMBLE: &str = "$ErrorActionPreference = 'Stop'; $ProgressPreference = 'SilentlyContinue';";

/// Shell used when the profile does not name one.
#[must_use]
pub fn default_shell() -> &'static str {
    if cfg!(windows) { "powershell" } else { "pwsh" }
}

/// Quote a value as a PowerShell single-quoted literal.
#[must_use]
pub fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Package manager backed by PowerShellGet cmdlets.
pub struct PowerShellHost<R: CommandRunner> {
    runner: R,
    shell: String,
}

impl PowerShellHost<TokioCommandRunner> {
    /// Production host with a tokio runner.
    ///
    /// Telemetry and the update banner are switched off in the child so an
    /// offline host never tries to reach the network on startup.
    #[must_use]
    pub fn with_timeout(shell: Option<&str>, timeout: Duration) -> Self {
        let runner = TokioCommandRunner::new(timeout)
            .with_env("POWERSHELL_TELEMETRY_OPTOUT", "1")
            .with_env("POWERSHELL_UPDATECHECK", "Off");
        Self::new(runner, shell)
    }
}

impl<R: CommandRunner> PowerShellHost<R> {
    #[must_use]
    pub fn new(runner: R, shell: Option<&str>) -> Self {
        Self {
            runner,
            shell: shell.unwrap_or(default_shell()).to_string(),
        }
    }

    /// The underlying process runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run `script` and return trimmed stdout.
    async fn invoke(&self, script: &str) -> Result<String> {
        let command = format!("{PREAMBLE} {script}");
        tracing::debug!(shell = %self.shell, script, "invoking powershell");
        let output = self
            .runner
            .run(
                &self.shell,
                &["-NoProfile", "-NonInteractive", "-Command", &command],
            )
            .await?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            if detail.is_empty() {
                anyhow::bail!("{} exited with {}", self.shell, output.status);
            }
            anyhow::bail!("{detail}");
        }
        Ok(stdout)
    }
}

impl<R: CommandRunner> PackageManager for PowerShellHost<R> {
    async fn source_exists(&self, name: &str) -> Result<bool> {
        let script = format!(
            "if (Get-PSRepository -Name {} -ErrorAction SilentlyContinue) {{ 'true' }} else {{ 'false' }}",
            ps_quote(name)
        );
        let out = self.invoke(&script).await?;
        Ok(out.eq_ignore_ascii_case("true"))
    }

    async fn register_source(&self, name: &str, location: &Path, trusted: bool) -> Result<()> {
        let policy = if trusted { "Trusted" } else { "Untrusted" };
        let script = format!(
            "Register-PSRepository -Name {} -SourceLocation {} -InstallationPolicy {policy}",
            ps_quote(name),
            ps_quote(&location.to_string_lossy())
        );
        self.invoke(&script).await.map(drop)
    }

    async fn unregister_source(&self, name: &str) -> Result<()> {
        let script = format!("Unregister-PSRepository -Name {}", ps_quote(name));
        self.invoke(&script).await.map(drop)
    }

    async fn install_package(&self, request: &InstallRequest<'_>) -> Result<()> {
        let scope = match request.scope {
            InstallScope::CurrentUser => "CurrentUser",
        };
        let mut script = format!(
            "Install-Module -Name {} -Repository {} -Scope {scope}",
            ps_quote(request.name),
            ps_quote(request.repository)
        );
        if request.force {
            script.push_str(" -Force");
        }
        if request.allow_clobber {
            script.push_str(" -AllowClobber");
        }
        self.invoke(&script).await.map(drop)
    }

    async fn refresh_index(&self) -> Result<()> {
        self.invoke("Get-Module -ListAvailable -Refresh | Out-Null")
            .await
            .map(drop)
    }

    async fn list_installed(&self, pattern: &str) -> Result<Vec<InstalledModule>> {
        let script = format!(
            "ConvertTo-Json -Compress -InputObject @(Get-Module -ListAvailable -Name {} | \
             Select-Object Name, @{{Name='Version';Expression={{$_.Version.ToString()}}}})",
            ps_quote(pattern)
        );
        let out = self.invoke(&script).await?;
        parse_installed(&out)
    }

    async fn import_module(&self, name: &str, force: bool) -> Result<()> {
        let mut script = format!("Import-Module -Name {}", ps_quote(name));
        if force {
            script.push_str(" -Force");
        }
        self.invoke(&script).await.map(drop)
    }

    async fn count_commands(&self, pattern: &str) -> Result<usize> {
        let script = format!(
            "Import-Module -Name {p}; @(Get-Command -Module {p}).Count",
            p = ps_quote(pattern)
        );
        let out = self.invoke(&script).await?;
        out.lines()
            .last()
            .unwrap_or_default()
            .trim()
            .parse()
            .with_context(|| format!("unexpected command count output: {out}"))
    }

    async fn set_configuration(&self, module: &str, config: &VendorConfiguration) -> Result<()> {
        let telemetry = if config.participate_in_telemetry {
            "$true"
        } else {
            "$false"
        };
        let script = format!(
            "Import-Module -Name {}; Set-PowerCLIConfiguration -ParticipateInCEIP {telemetry} \
             -InvalidCertificateAction {} -Scope {} -Confirm:$false | Out-Null",
            ps_quote(module),
            config.invalid_certificate_action,
            config.scope
        );
        self.invoke(&script).await.map(drop)
    }

    async fn show_configuration(&self, module: &str) -> Result<String> {
        let script = format!(
            "Import-Module -Name {}; Get-PowerCLIConfiguration | Format-Table -AutoSize | Out-String -Width 160",
            ps_quote(module)
        );
        self.invoke(&script).await
    }
}

/// Parse `ConvertTo-Json` output of `Name`/`Version` records.
///
/// # Errors
///
/// Returns an error if the output is not a JSON array or object of records.
pub fn parse_installed(json: &str) -> Result<Vec<InstalledModule>> {
    let json = json.trim();
    if json.is_empty() {
        return Ok(Vec::new());
    }
    if json.starts_with('{') {
        let single: InstalledModule =
            serde_json::from_str(json).context("parsing installed module")?;
        return Ok(vec![single]);
    }
    serde_json::from_str(json).context("parsing installed modules")
}
