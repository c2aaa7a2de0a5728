//! vcpkg provisioning and package installation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use url::Url;

use crate::core::platform::HostOs;
use crate::sources::git;
use crate::util::context::GlobalContext;
use crate::util::process::ProcessBuilder;
use crate::util::shell::Status;

/// Upstream vcpkg repository.
pub const VCPKG_REMOTE: &str = "https://github.com/microsoft/vcpkg.git";

/// Pinned vcpkg revision; package-manager behavior stays identical across
/// machines and over time.
pub const VCPKG_PINNED_REV: &str = "501db0f17ef6df184fcdbfbe0f87cde2313b6ab1";

/// Handle to the vcpkg installation under the shared toolchain root.
#[derive(Debug, Clone)]
pub struct Vcpkg {
    root: PathBuf,
    host: HostOs,
}

impl Vcpkg {
    pub fn new(root: PathBuf, host: HostOs) -> Self {
        Vcpkg { root, host }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the vcpkg binary.
    pub fn executable(&self) -> PathBuf {
        let exe = if self.host.is_windows() {
            "vcpkg.exe"
        } else {
            "vcpkg"
        };
        self.root.join(exe)
    }

    fn bootstrap_script(&self) -> PathBuf {
        let script = if self.host.is_windows() {
            "bootstrap-vcpkg.bat"
        } else {
            "bootstrap-vcpkg.sh"
        };
        self.root.join(script)
    }

    /// Clone, pin, and bootstrap vcpkg unless the executable already exists.
    pub fn provision(&self, ctx: &GlobalContext) -> Result<()> {
        if self.executable().is_file() {
            tracing::debug!("vcpkg already provisioned at {}", self.root.display());
            return Ok(());
        }

        ctx.shell()
            .status(Status::Bootstrapping, format!("vcpkg at {}", self.root.display()));

        let remote = Url::parse(VCPKG_REMOTE).context("invalid vcpkg remote")?;
        git::ensure_clone_at_rev(&remote, &self.root, VCPKG_PINNED_REV)?;

        ctx.run(&ProcessBuilder::new(self.bootstrap_script()).cwd(&self.root))
    }

    /// Install one package, already triplet-qualified.
    pub fn install(&self, ctx: &GlobalContext, package: &str) -> Result<()> {
        ctx.run(
            &ProcessBuilder::new(self.executable())
                .arg("install")
                .arg(package)
                .cwd(&self.root),
        )
    }
}
