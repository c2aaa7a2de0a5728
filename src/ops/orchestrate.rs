//! The recursive orchestration entry point.

use std::path::Path;

use anyhow::Result;

use crate::builder::cmake::CMakeDriver;
use crate::builder::emsdk::Emsdk;
use crate::builder::vcpkg::Vcpkg;
use crate::core::platform::Platform;
use crate::core::project::Project;
use crate::ops::{packages, resolve, tools};
use crate::util::context::GlobalContext;
use crate::util::fs::ensure_dir;
use crate::util::shell::Status;

/// Run the full cycle for one project: provision the toolchain, resolve
/// libraries, bootstrap tools, install packages, then generate, build, and
/// test.
///
/// Tool sub-builds re-enter this function with the platform forced to
/// [`Platform::Native`]; provisioning steps are presence-gated, so the
/// recursion never repeats a clone or bootstrap.
pub fn orchestrate(
    ctx: &GlobalContext,
    project: &Project,
    platform: Platform,
    build_dir: &Path,
) -> Result<()> {
    ctx.shell().status(
        Status::Resolving,
        format!("{} ({})", project.name(), platform),
    );
    ensure_dir(build_dir)?;

    let vcpkg = Vcpkg::new(ctx.vcpkg_root(), ctx.host());
    vcpkg.provision(ctx)?;

    let emsdk = if platform.needs_emsdk() {
        let emsdk = Emsdk::new(ctx.emsdk_root());
        emsdk.provision(ctx)?;
        Some(emsdk)
    } else {
        None
    };

    let libraries = resolve::resolve_libraries(ctx, project)?;

    let tool_refs = tools::resolve_tools(project, &libraries);
    tools::build_tools(ctx, &tool_refs, build_dir)?;

    let package_set =
        packages::resolve_packages(project, &libraries, &tool_refs, platform, ctx.host())?;
    packages::install_packages(ctx, &vcpkg, &package_set, platform)?;

    let driver = CMakeDriver::new(ctx, build_dir.to_path_buf());
    driver.generate(project, platform, emsdk.as_ref())?;
    driver.build(project)?;
    driver.test(project)?;

    ctx.shell().status(Status::Finished, project.name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::declarations::{LIBRARIES_LIST, TOOLS_LIST, VCPKG_LIST};
    use crate::test_support::{
        env_lock, fake_emsdk, fake_vcpkg, recording_context, scaffold_project, write_list,
    };
    use tempfile::TempDir;

    // A tool root has the parent root as a path prefix, so match the whole
    // generate argument, not a substring.
    fn generate_index(calls: &[String], project_root: &Path) -> usize {
        let needle = format!("cmake {} ", project_root.display());
        calls
            .iter()
            .position(|call| call.starts_with(&needle))
            .unwrap_or_else(|| panic!("no generate call for {} in {:?}", needle, calls))
    }

    #[test]
    fn test_tools_complete_before_parent_generate() {
        let tmp = TempDir::new().unwrap();
        let (ctx, runner) = recording_context(tmp.path());
        fake_vcpkg(&ctx);

        let root = scaffold_project(tmp.path(), "app");
        write_list(&root, TOOLS_LIST, &["t1", "t2"]);
        let t1 = scaffold_project(&root.join("tools"), "t1")
            .canonicalize()
            .unwrap();
        let t2 = scaffold_project(&root.join("tools"), "t2")
            .canonicalize()
            .unwrap();

        let project = Project::open(&root).unwrap();
        let build_dir = tmp.path().join("out");
        orchestrate(&ctx, &project, Platform::Native, &build_dir).unwrap();

        let calls = runner.calls();
        let t1_generate = generate_index(&calls, &t1);
        let t2_generate = generate_index(&calls, &t2);
        let parent_generate = generate_index(&calls, project.root());
        let installs: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, call)| call.contains("--install"))
            .map(|(i, _)| i)
            .collect();

        // Two tool installs, both before the parent generate, in order.
        assert_eq!(installs.len(), 2);
        assert!(t1_generate < installs[0]);
        assert!(installs[0] < t2_generate);
        assert!(t2_generate < installs[1]);
        assert!(installs[1] < parent_generate);

        // Dedicated build subdirectories were created.
        assert!(build_dir.join("tools").join("t1").is_dir());
        assert!(build_dir.join("tools").join("t2").is_dir());
    }

    #[test]
    fn test_no_tools_means_no_tools_directory() {
        let tmp = TempDir::new().unwrap();
        let (ctx, runner) = recording_context(tmp.path());
        fake_vcpkg(&ctx);

        let root = scaffold_project(tmp.path(), "app");
        let project = Project::open(&root).unwrap();
        let build_dir = tmp.path().join("out");
        orchestrate(&ctx, &project, Platform::Native, &build_dir).unwrap();

        assert!(!build_dir.join("tools").exists());
        assert!(!runner.calls().iter().any(|call| call.contains("--install")));
    }

    #[test]
    fn test_second_run_is_generate_build_test_only() {
        let tmp = TempDir::new().unwrap();
        let (ctx, runner) = recording_context(tmp.path());
        fake_vcpkg(&ctx);

        let root = scaffold_project(tmp.path(), "app");
        let project = Project::open(&root).unwrap();
        let build_dir = tmp.path().join("out");

        orchestrate(&ctx, &project, Platform::Native, &build_dir).unwrap();
        let first_run = runner.calls();

        orchestrate(&ctx, &project, Platform::Native, &build_dir).unwrap();
        let all = runner.calls();
        let second_run = &all[first_run.len()..];

        assert_eq!(second_run.len(), 3);
        assert!(second_run[0].starts_with("cmake"));
        assert!(second_run[1].contains("--build"));
        assert!(second_run[2].starts_with("ctest"));
        assert!(!second_run.iter().any(|call| call.contains("bootstrap")));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let tmp = TempDir::new().unwrap();
        let (ctx, runner) = recording_context(tmp.path());
        fake_vcpkg(&ctx);

        let lib_a = scaffold_project(tmp.path(), "lib_a");
        write_list(&lib_a, TOOLS_LIST, &["toolX"]);
        write_list(&lib_a, VCPKG_LIST, &["pkg1"]);
        let tool_x = scaffold_project(&lib_a.join("tools"), "toolX")
            .canonicalize()
            .unwrap();

        let root = scaffold_project(tmp.path(), "app");
        write_list(&root, LIBRARIES_LIST, &["lib_a"]);
        write_list(&root, VCPKG_LIST, &["pkg2"]);

        let project = Project::open(&root).unwrap();
        let build_dir = tmp.path().join("out");
        orchestrate(&ctx, &project, Platform::Native, &build_dir).unwrap();

        let calls = runner.calls();

        // Non-Windows host: empty native triplet, sorted order.
        let installs: Vec<&String> = calls
            .iter()
            .filter(|call| call.contains(" install "))
            .collect();
        assert_eq!(installs.len(), 2);
        assert!(installs[0].ends_with("install pkg1"));
        assert!(installs[1].ends_with("install pkg2"));

        // toolX is built and installed under tools/toolX before the parent.
        let tool_generate = generate_index(&calls, &tool_x);
        let parent_generate = generate_index(&calls, project.root());
        assert!(tool_generate < parent_generate);
        assert!(build_dir.join("tools").join("toolX").is_dir());
    }

    #[test]
    fn test_tool_builds_force_native_under_emscripten() {
        let _env = env_lock();
        let tmp = TempDir::new().unwrap();
        let (ctx, runner) = recording_context(tmp.path());
        fake_vcpkg(&ctx);
        fake_emsdk(&ctx);

        let root = scaffold_project(tmp.path(), "app");
        write_list(&root, TOOLS_LIST, &["gen"]);
        let gen = scaffold_project(&root.join("tools"), "gen")
            .canonicalize()
            .unwrap();

        let project = Project::open(&root).unwrap();
        let build_dir = tmp.path().join("out");
        orchestrate(&ctx, &project, Platform::Emscripten, &build_dir).unwrap();

        let calls = runner.calls();
        // The tool's generate is a plain cmake invocation, not emcmake.
        let tool_generate = generate_index(&calls, &gen);
        assert!(!calls[tool_generate].contains("emcmake"));
        // The parent's generate is wrapped.
        assert!(calls
            .iter()
            .any(|call| call.contains("emcmake") && call.contains("wasm32-emscripten")));
    }

    #[test]
    fn test_emscripten_run_exports_sdk_root_and_wraps_generate() {
        let _env = env_lock();
        let tmp = TempDir::new().unwrap();
        let (ctx, runner) = recording_context(tmp.path());
        fake_vcpkg(&ctx);
        fake_emsdk(&ctx);

        let root = scaffold_project(tmp.path(), "app");
        let project = Project::open(&root).unwrap();
        let build_dir = tmp.path().join("out");
        orchestrate(&ctx, &project, Platform::Emscripten, &build_dir).unwrap();

        assert_eq!(
            std::env::var("EMSDK").unwrap(),
            ctx.emsdk_root().display().to_string()
        );

        let calls = runner.calls();
        let generate = &calls[0];
        assert!(generate.contains("emcmake"));
        assert!(generate.contains("-DVCPKG_TARGET_TRIPLET=wasm32-emscripten"));
    }
}
