//! CMake driver: generate, build, test, install.
//!
//! Every command carries the build directory as its own working directory;
//! nothing here mutates the process-wide current directory, so sibling
//! builds cannot leak state into each other.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::builder::emsdk::Emsdk;
use crate::core::platform::{Platform, EMSCRIPTEN_TRIPLET};
use crate::core::project::Project;
use crate::util::context::GlobalContext;
use crate::util::process::ProcessBuilder;
use crate::util::shell::Status;

/// Drives the external build system for one project in one build directory.
pub struct CMakeDriver<'a> {
    ctx: &'a GlobalContext,
    build_dir: PathBuf,
}

impl<'a> CMakeDriver<'a> {
    pub fn new(ctx: &'a GlobalContext, build_dir: PathBuf) -> Self {
        CMakeDriver { ctx, build_dir }
    }

    /// Location/configuration variables shared by both generate shapes.
    fn common_args(&self) -> Vec<String> {
        vec![
            format!("-DLIBRARY_FOLDER={}", self.ctx.libraries_root().display()),
            format!("-DCMAKE_INSTALL_PREFIX={}", self.build_dir.display()),
            format!(
                "-DCMAKE_TOOLCHAIN_FOLDER={}",
                self.ctx.toolchain_root().display()
            ),
            format!("-DCMAKE_BUILD_TYPE={}", self.ctx.config()),
        ]
    }

    /// Run the generator. Cross-compilation wraps the same invocation with
    /// the SDK's environment-injection wrapper and adds the target triplet;
    /// on Windows the SDK has no default low-level driver, so MinGW make is
    /// selected explicitly.
    pub fn generate(
        &self,
        project: &Project,
        platform: Platform,
        emsdk: Option<&Emsdk>,
    ) -> Result<()> {
        self.ctx.shell().status(Status::Configuring, project.name());

        let cmd = match platform {
            Platform::Native => ProcessBuilder::new("cmake")
                .arg(project.root())
                .args(self.common_args()),
            Platform::Emscripten => {
                let emsdk =
                    emsdk.context("emscripten generate requires a provisioned SDK")?;

                let mut cmd = ProcessBuilder::new(emsdk.emcmake(self.ctx.host()))
                    .arg("cmake")
                    .arg(project.root())
                    .arg(format!("-DVCPKG_TARGET_TRIPLET={}", EMSCRIPTEN_TRIPLET));

                if self.ctx.host().is_windows() {
                    cmd = cmd.arg("-G").arg("MinGW Makefiles").arg(format!(
                        "-DCMAKE_MAKE_PROGRAM={}",
                        emsdk.mingw_bin().join("mingw32-make.exe").display()
                    ));
                }

                cmd.args(self.common_args())
                    .arg(format!("-DNODE_JS={}", emsdk.node_js()?.display()))
            }
        };

        self.ctx.run(&cmd.cwd(&self.build_dir))
    }

    /// Drive the build. A generated IDE solution file in the build directory
    /// is restored first so its external package references are fetched.
    pub fn build(&self, project: &Project) -> Result<()> {
        self.ctx.shell().status(Status::Building, project.name());

        let solution = self.build_dir.join(format!("{}.sln", project.name()));
        if solution.is_file() {
            self.ctx.run(
                &ProcessBuilder::new("dotnet")
                    .arg("restore")
                    .arg(&solution)
                    .cwd(&self.build_dir),
            )?;
        }

        self.ctx.run(
            &ProcessBuilder::new("cmake")
                .args(["--build", ".", "--config"])
                .arg(self.ctx.config().as_str())
                .cwd(&self.build_dir),
        )
    }

    /// Run the tests. Test output is always streamed, even in a quiet run.
    pub fn test(&self, project: &Project) -> Result<()> {
        self.ctx.shell().status(Status::Testing, project.name());

        self.ctx.run(
            &ProcessBuilder::new("ctest")
                .args(["-VV", "-C"])
                .arg(self.ctx.config().as_str())
                .cwd(&self.build_dir)
                .always_stream(),
        )
    }

    /// Install step exposing a tool's build output to its parent build.
    pub fn install(&self) -> Result<()> {
        self.ctx.run(
            &ProcessBuilder::new("cmake")
                .args(["--install", ".", "--config"])
                .arg(self.ctx.config().as_str())
                .cwd(&self.build_dir),
        )
    }
}
