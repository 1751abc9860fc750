//! Shared fakes for unit tests.
//!
//! Hand-written implementations of the application ports so each test file
//! doesn't have to re-define the same boilerplate.

#![allow(dead_code, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;
use powercli_offline::application::ports::{
    CommandRunner, FileChooser, FileFilter, InstallRequest, LocalPaths, PackageManager,
    ProgressReporter, UserPrompt,
};
use powercli_offline::domain::config::VendorConfiguration;
use powercli_offline::domain::module::InstalledModule;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── CommandRunner recorder ────────────────────────────────────────────────────

/// Records every invocation and replies with a canned output.
pub struct RecordingRunner {
    pub calls: RefCell<Vec<(String, Vec<String>)>>,
    reply: Output,
}

impl RecordingRunner {
    pub fn replying(reply: Output) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            reply,
        }
    }

    /// The `-Command` script of the last call.
    pub fn last_script(&self) -> String {
        self.calls
            .borrow()
            .last()
            .and_then(|(_, args)| args.last().cloned())
            .unwrap_or_default()
    }

    pub fn last_program(&self) -> String {
        self.calls
            .borrow()
            .last()
            .map(|(p, _)| p.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, Duration::from_secs(1))
            .await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<Output> {
        self.calls.borrow_mut().push((
            program.to_string(),
            args.iter().map(|a| (*a).to_string()).collect(),
        ));
        Ok(self.reply.clone())
    }
}

// ── PackageManager fake ───────────────────────────────────────────────────────

/// In-memory package manager.
///
/// Installing a package listed in `installable` makes it appear in
/// `list_installed`; importing succeeds only for names in `importable`.
#[derive(Default)]
pub struct FakePackageManager {
    pub calls: RefCell<Vec<String>>,
    pub sources: RefCell<HashSet<String>>,
    pub installed: RefCell<Vec<InstalledModule>>,
    installable: HashSet<String>,
    importable: HashSet<String>,
    fail_register: bool,
    fail_unregister: bool,
    fail_configuration: bool,
    command_count: usize,
}

impl FakePackageManager {
    pub fn new() -> Self {
        Self {
            command_count: 812,
            ..Self::default()
        }
    }

    pub fn installable(mut self, names: &[&str]) -> Self {
        self.installable = names.iter().map(|s| (*s).to_string()).collect();
        self
    }

    pub fn importable(mut self, names: &[&str]) -> Self {
        self.importable = names.iter().map(|s| (*s).to_string()).collect();
        self
    }

    pub fn with_source(self, name: &str) -> Self {
        self.sources.borrow_mut().insert(name.to_string());
        self
    }

    pub fn with_installed(self, name: &str, version: &str) -> Self {
        self.installed.borrow_mut().push(InstalledModule {
            name: name.to_string(),
            version: version.to_string(),
        });
        self
    }

    pub fn failing_register(mut self) -> Self {
        self.fail_register = true;
        self
    }

    pub fn failing_unregister(mut self) -> Self {
        self.fail_unregister = true;
        self
    }

    pub fn failing_configuration(mut self) -> Self {
        self.fail_configuration = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl PackageManager for FakePackageManager {
    async fn source_exists(&self, name: &str) -> Result<bool> {
        self.record(format!("exists:{name}"));
        Ok(self.sources.borrow().contains(name))
    }

    async fn register_source(&self, name: &str, location: &Path, trusted: bool) -> Result<()> {
        self.record(format!("register:{name}:{}:{trusted}", location.display()));
        if self.fail_register {
            anyhow::bail!("Register-PSRepository: access denied");
        }
        self.sources.borrow_mut().insert(name.to_string());
        Ok(())
    }

    async fn unregister_source(&self, name: &str) -> Result<()> {
        self.record(format!("unregister:{name}"));
        self.sources.borrow_mut().remove(name);
        if self.fail_unregister {
            anyhow::bail!("Unregister-PSRepository: repository busy");
        }
        Ok(())
    }

    async fn install_package(&self, request: &InstallRequest<'_>) -> Result<()> {
        self.record(format!("install:{}", request.name));
        if !self.installable.contains(request.name) {
            anyhow::bail!("No match was found for '{}'", request.name);
        }
        self.installed.borrow_mut().push(InstalledModule {
            name: request.name.to_string(),
            version: "13.3.0".to_string(),
        });
        Ok(())
    }

    async fn refresh_index(&self) -> Result<()> {
        self.record("refresh".to_string());
        Ok(())
    }

    async fn list_installed(&self, pattern: &str) -> Result<Vec<InstalledModule>> {
        self.record(format!("list:{pattern}"));
        let prefix = pattern.trim_end_matches('*');
        Ok(self
            .installed
            .borrow()
            .iter()
            .filter(|m| m.name.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn import_module(&self, name: &str, force: bool) -> Result<()> {
        self.record(format!("import:{name}:{force}"));
        if !self.importable.contains(name) {
            anyhow::bail!("The specified module '{name}' was not loaded");
        }
        Ok(())
    }

    async fn count_commands(&self, pattern: &str) -> Result<usize> {
        self.record(format!("count:{pattern}"));
        Ok(self.command_count)
    }

    async fn set_configuration(&self, module: &str, config: &VendorConfiguration) -> Result<()> {
        self.record(format!(
            "configure:{module}:{}:{}:{}",
            config.participate_in_telemetry, config.invalid_certificate_action, config.scope
        ));
        if self.fail_configuration {
            anyhow::bail!("Set-PowerCLIConfiguration: not recognized");
        }
        Ok(())
    }

    async fn show_configuration(&self, module: &str) -> Result<String> {
        self.record(format!("show:{module}"));
        Ok("Scope    InvalidCertificateAction\n-----    ------------------------\nUser     Ignore\n".to_string())
    }
}

// ── Interaction fakes ─────────────────────────────────────────────────────────

/// Collects reporter events as `kind: message` strings.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn warnings(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| e.strip_prefix("warn: ").map(str::to_string))
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events.borrow().iter().any(|e| e.contains(needle))
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.borrow_mut().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.events.borrow_mut().push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.events.borrow_mut().push(format!("warn: {message}"));
    }
    fn info(&self, message: &str) {
        self.events.borrow_mut().push(format!("info: {message}"));
    }
}

/// Answers the install prompt and the configure prompt independently.
pub struct ScriptedPrompt {
    install: bool,
    configure: bool,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new(install: bool, configure: bool) -> Self {
        Self {
            install,
            configure,
            asked: RefCell::new(Vec::new()),
        }
    }
}

impl UserPrompt for ScriptedPrompt {
    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        self.asked.borrow_mut().push(prompt.to_string());
        if prompt.starts_with("Install") {
            Ok(self.install)
        } else {
            Ok(self.configure)
        }
    }
}

/// Returns a fixed choice and remembers whether it was asked.
pub struct FakeChooser {
    choice: Option<PathBuf>,
    pub called: Cell<bool>,
}

impl FakeChooser {
    pub fn choosing(path: &Path) -> Self {
        Self {
            choice: Some(path.to_path_buf()),
            called: Cell::new(false),
        }
    }

    pub fn cancelling() -> Self {
        Self {
            choice: None,
            called: Cell::new(false),
        }
    }
}

impl FileChooser for FakeChooser {
    async fn choose_file(&self, _: &Path, _: &[FileFilter]) -> Result<Option<PathBuf>> {
        self.called.set(true);
        Ok(self.choice.clone())
    }
}

// ── Paths and fixtures ────────────────────────────────────────────────────────

/// Redirects temp and module directories into a test-owned directory.
pub struct FakePaths {
    pub temp: PathBuf,
    pub modules: PathBuf,
}

impl FakePaths {
    pub fn under(root: &Path) -> Self {
        let temp = root.join("tmp");
        std::fs::create_dir_all(&temp).expect("create temp dir");
        Self {
            temp,
            modules: root.join("Modules"),
        }
    }

    /// Entries left in the fake temp dir.
    pub fn leftovers(&self) -> Vec<PathBuf> {
        std::fs::read_dir(&self.temp)
            .map(|rd| rd.filter_map(std::result::Result::ok).map(|e| e.path()).collect())
            .unwrap_or_default()
    }
}

impl LocalPaths for FakePaths {
    fn temp_dir(&self) -> PathBuf {
        self.temp.clone()
    }

    fn module_root(&self) -> Result<PathBuf> {
        Ok(self.modules.clone())
    }

    fn download_dir(&self) -> PathBuf {
        self.temp.clone()
    }
}

/// Write a zip archive with the given `(path, content)` entries.
pub fn write_bundle(path: &Path, entries: &[(&str, &str)]) {
    let file = std::fs::File::create(path).expect("create bundle");
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in entries {
        zip.start_file(*name, options).expect("start entry");
        zip.write_all(content.as_bytes()).expect("write entry");
    }
    zip.finish().expect("finish bundle");
}
