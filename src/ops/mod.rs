//! High-level operations.
//!
//! This module contains the orchestration cycle and its stages.

pub mod orchestrate;
pub mod packages;
pub mod resolve;
pub mod tools;

pub use orchestrate::orchestrate;
pub use packages::{install_packages, resolve_packages};
pub use resolve::resolve_libraries;
pub use tools::{build_tools, resolve_tools, ToolRef};
