//! Application services: use-case orchestration.
//!
//! Each service module implements a single stage by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod classify;
pub mod configure;
pub mod extract;
pub mod install;
pub mod pipeline;
pub mod verify;
