//! Emscripten SDK provisioning.
//!
//! The SDK is cloned once under the shared toolchain root and pinned to an
//! exact version pair. After provisioning (including the skip path) the SDK
//! root is exported through the environment for the build system's own
//! toolchain configuration — that variable lives for the rest of the
//! process, there is no teardown.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use url::Url;

use crate::core::platform::HostOs;
use crate::sources::git;
use crate::util::context::GlobalContext;
use crate::util::process::ProcessBuilder;
use crate::util::shell::Status;

/// Upstream emsdk repository.
pub const EMSDK_REMOTE: &str = "https://github.com/emscripten-core/emsdk.git";

/// Core compiler/runtime version, installed and activated first.
pub const EMSDK_VERSION: &str = "1.39.18";

/// Companion native-toolchain version, installed after the core SDK.
pub const EMSDK_MINGW_VERSION: &str = "mingw-7.1.0-64bit";

/// Environment variable consumed by the build system's configuration step.
pub const EMSDK_ENV_VAR: &str = "EMSDK";

/// Handle to the emsdk checkout under the shared toolchain root.
#[derive(Debug, Clone)]
pub struct Emsdk {
    root: PathBuf,
}

impl Emsdk {
    pub fn new(root: PathBuf) -> Self {
        Emsdk { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn emsdk_script(&self, host: HostOs) -> PathBuf {
        if host.is_windows() {
            self.root.join("emsdk.bat")
        } else {
            // Resolved by the child process against its working directory.
            PathBuf::from("./emsdk")
        }
    }

    /// The emcmake wrapper used for cross-compilation generate steps.
    pub fn emcmake(&self, host: HostOs) -> PathBuf {
        let name = if host.is_windows() {
            "emcmake.bat"
        } else {
            "emcmake"
        };
        self.root.join("upstream").join("emscripten").join(name)
    }

    /// Bundled MinGW bin folder (Windows hosts only).
    pub fn mingw_bin(&self) -> PathBuf {
        self.root.join("mingw").join("7.1.0_64bit").join("bin")
    }

    /// Locate the node binary bundled with the SDK checkout.
    pub fn node_js(&self) -> Result<PathBuf> {
        let node_dir = self.root.join("node");
        let entries = std::fs::read_dir(&node_dir).with_context(|| {
            format!("emsdk checkout has no node folder: {}", node_dir.display())
        })?;

        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                return Ok(path.join("bin").join("node"));
            }
        }

        bail!("no bundled node found under {}", node_dir.display())
    }

    /// Clone and activate the pinned SDK versions unless the folder exists,
    /// then export the SDK root for later build-system invocations.
    pub fn provision(&self, ctx: &GlobalContext) -> Result<()> {
        if self.root.is_dir() {
            tracing::debug!("emsdk already provisioned at {}", self.root.display());
        } else {
            ctx.shell()
                .status(Status::Bootstrapping, format!("emsdk at {}", self.root.display()));

            let remote = Url::parse(EMSDK_REMOTE).context("invalid emsdk remote")?;
            git::ensure_clone(&remote, &self.root, None)?;

            for version in [EMSDK_VERSION, EMSDK_MINGW_VERSION] {
                self.run_emsdk(ctx, "install", version)?;
                self.run_emsdk(ctx, "activate", version)?;
            }
        }

        std::env::set_var(EMSDK_ENV_VAR, &self.root);
        Ok(())
    }

    fn run_emsdk(&self, ctx: &GlobalContext, action: &str, version: &str) -> Result<()> {
        ctx.run(
            &ProcessBuilder::new(self.emsdk_script(ctx.host()))
                .arg(action)
                .arg(version)
                .cwd(&self.root),
        )
    }
}
