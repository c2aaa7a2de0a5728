//! Global context threaded through every orchestration step.
//!
//! There is no process-wide mutable state here: the context carries the
//! resolved roots, the host, and the collaborators (shell, command runner),
//! and every operation receives it explicitly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::core::platform::{BuildConfig, HostOs};
use crate::util::process::{CommandRunner, ProcessBuilder, StreamingRunner};
use crate::util::shell::Shell;

/// Host all library remotes live under.
pub const REMOTE_HOST: &str = "https://github.com";

/// Default organisation library clones are fetched from.
pub const DEFAULT_REMOTE_ORG: &str = "slipway-build";

/// Configuration and collaborators for one orchestration invocation.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Shared root holding sibling library source trees.
    libraries_root: PathBuf,

    /// Build configuration passed through to every CMake step.
    config: BuildConfig,

    /// Host family; drives triplets, script names, and toolchain layout.
    host: HostOs,

    /// Remote organisation for library clones.
    org: String,

    /// Token for private clones.
    github_token: Option<String>,

    shell: Arc<Shell>,
    runner: Arc<dyn CommandRunner>,
}

impl GlobalContext {
    /// Create a context with default collaborators (real runner, default
    /// shell, detected host).
    pub fn new(libraries_root: PathBuf, config: BuildConfig) -> Self {
        GlobalContext {
            libraries_root,
            config,
            host: HostOs::current(),
            org: DEFAULT_REMOTE_ORG.to_string(),
            github_token: None,
            shell: Arc::new(Shell::default()),
            runner: Arc::new(StreamingRunner::new(false)),
        }
    }

    pub fn with_host(mut self, host: HostOs) -> Self {
        self.host = host;
        self
    }

    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = org.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.github_token = token;
        self
    }

    pub fn with_shell(mut self, shell: Arc<Shell>) -> Self {
        self.shell = shell;
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn libraries_root(&self) -> &Path {
        &self.libraries_root
    }

    /// Shared toolchain root, separated per host family so one libraries
    /// root can serve several operating systems.
    pub fn toolchain_root(&self) -> PathBuf {
        self.libraries_root
            .join("toolchain")
            .join(self.host.system_name())
    }

    pub fn vcpkg_root(&self) -> PathBuf {
        self.toolchain_root().join("vcpkg")
    }

    pub fn emsdk_root(&self) -> PathBuf {
        self.toolchain_root().join("emsdk")
    }

    pub fn config(&self) -> BuildConfig {
        self.config
    }

    pub fn host(&self) -> HostOs {
        self.host
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    pub fn shell(&self) -> &Arc<Shell> {
        &self.shell
    }

    /// Run an external command through the configured runner.
    pub fn run(&self, cmd: &ProcessBuilder) -> Result<()> {
        self.runner.run(cmd)
    }
}
