//! Test doubles and fixtures for unit tests.
//!
//! The orchestration layer is exercised against a recording runner so
//! command sequencing can be asserted without spawning anything, plus small
//! helpers for scaffolding project trees and pre-provisioned toolchains.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;

use crate::core::platform::{BuildConfig, HostOs};
use crate::util::context::GlobalContext;
use crate::util::process::{CommandRunner, ProcessBuilder};
use crate::util::shell::{ColorChoice, Shell};

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Serialize tests that touch process-wide environment variables.
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

/// Records every command instead of executing it; every command succeeds.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<String>>,
}

impl RecordingRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingRunner::default())
    }

    /// All recorded command lines, in invocation order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<()> {
        self.calls.lock().unwrap().push(cmd.display_command());
        Ok(())
    }
}

/// A quiet context over `libraries_root` with a recording runner and a
/// deterministic (Linux) host.
pub fn recording_context(libraries_root: &Path) -> (GlobalContext, Arc<RecordingRunner>) {
    let runner = RecordingRunner::new();
    let shell = Arc::new(Shell::from_flags(true, false, ColorChoice::Never));

    let ctx = GlobalContext::new(libraries_root.to_path_buf(), BuildConfig::Release)
        .with_host(HostOs::Linux)
        .with_shell(shell)
        .with_runner(runner.clone());

    (ctx, runner)
}

/// Create a bare project folder under `parent` and return its path.
pub fn scaffold_project(parent: &Path, name: &str) -> PathBuf {
    let root = parent.join(name);
    fs::create_dir_all(&root).unwrap();
    root
}

/// Write a declaration file under `dir`, one item per line.
pub fn write_list(dir: &Path, file_name: &str, lines: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(dir.join(file_name), content).unwrap();
}

/// Pre-provision a fake vcpkg executable so bootstrap is skipped.
pub fn fake_vcpkg(ctx: &GlobalContext) {
    let root = ctx.vcpkg_root();
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("vcpkg"), "").unwrap();
}

/// Pre-provision a fake emsdk checkout (with a bundled node) so the SDK
/// install/activate sequence is skipped.
pub fn fake_emsdk(ctx: &GlobalContext) {
    let root = ctx.emsdk_root();
    fs::create_dir_all(root.join("node").join("14.15.5_64bit").join("bin")).unwrap();
    fs::create_dir_all(root.join("upstream").join("emscripten")).unwrap();
    fs::write(
        root.join("upstream").join("emscripten").join("emcmake"),
        "",
    )
    .unwrap();
}
