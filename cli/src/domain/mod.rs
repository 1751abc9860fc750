//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod bundle;
pub mod config;
pub mod error;
pub mod module;

pub use bundle::{InstallStrategy, SelectedBundle};
pub use config::InstallerProfile;
pub use error::{ConfigError, InstallError};
pub use module::{InstallReport, InstalledModule, StepOutcome, VerifyReport};
