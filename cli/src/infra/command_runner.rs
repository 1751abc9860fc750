//! Infrastructure implementation of the `CommandRunner` port.

use std::process::{Output, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::application::ports::CommandRunner;

/// Default timeout for a single shell invocation. Module installs from a
/// large bundle routinely take several minutes.
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(600);

/// Production `CommandRunner` backed by `tokio::process`.
///
/// Children get a null stdin so a cmdlet that unexpectedly prompts fails
/// instead of hanging. On timeout the child is killed explicitly:
/// `tokio::time::timeout` around `.output()` leaves it running on Windows.
pub struct TokioCommandRunner {
    timeout: Duration,
    envs: Vec<(String, String)>,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            envs: Vec::new(),
        }
    }

    /// Set an environment variable on every spawned child.
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

async fn drain(handle: Option<impl AsyncRead + Unpin>) -> Vec<u8> {
    let mut buf = Vec::new();
    let Some(mut h) = handle else {
        return buf;
    };
    if let Err(e) = h.read_to_end(&mut buf).await {
        tracing::debug!("reading child output failed: {e}");
    }
    buf
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let started = Instant::now();
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let output = tokio::select! {
            (status, stdout, stderr) = async {
                tokio::join!(child.wait(), drain(stdout), drain(stderr))
            } => Output {
                status: status.with_context(|| format!("waiting for {program}"))?,
                stdout,
                stderr,
            },
            () = tokio::time::sleep(timeout) => {
                if let Err(e) = child.kill().await {
                    tracing::warn!(program, "could not kill timed-out child: {e}");
                }
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        };
        tracing::debug!(
            program,
            status = %output.status,
            elapsed_ms = started.elapsed().as_millis(),
            "child exited"
        );
        Ok(output)
    }
}
