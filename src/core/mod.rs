//! Core data model: projects, platforms, and declaration files.

pub mod declarations;
pub mod platform;
pub mod project;

pub use platform::{BuildConfig, HostOs, Platform};
pub use project::Project;
