//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! PowerShell package manager, archive extraction, filesystem access, file
//! choosers and profile loading.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod archive;
pub mod chooser;
pub mod command_runner;
pub mod config;
pub mod fs;
pub mod powershell;
