//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Install errors ────────────────────────────────────────────────────────────

/// Failures that end an install run with an overall failed result.
///
/// Best-effort failures (source registration, individual package installs,
/// module copies, imports, configuration) are never represented here; they
/// travel as [`crate::domain::module::StepOutcome`] values instead.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Bundle not found: {}", .0.display())]
    MissingBundle(PathBuf),

    #[error("Failed to extract {}: {reason}", archive.display())]
    ExtractFailure { archive: PathBuf, reason: String },

    #[error(
        "No recognizable package structure in {}. Expected .nupkg files or module directories.",
        .0.display()
    )]
    NoPackageStructure(PathBuf),

    #[error("No modules matching '{0}' found after installation.")]
    VerificationFailure(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to installer profile validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: must not be empty")]
    Empty { key: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
