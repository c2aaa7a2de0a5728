//! Package aggregation and installation.

use anyhow::Result;

use crate::builder::vcpkg::Vcpkg;
use crate::core::platform::{HostOs, Platform};
use crate::core::project::Project;
use crate::ops::tools::ToolRef;
use crate::util::context::GlobalContext;
use crate::util::shell::Status;

/// Extra native package required on a Windows host before any
/// cross-compilation package: the cross toolchain's own build step depends
/// on it.
pub const WINDOWS_CROSS_SUPPORT_PACKAGE: &str = "boost-build";

/// Append a triplet to a bare package identifier.
fn qualify(package: &str, triplet: Option<&str>) -> String {
    match triplet {
        Some(triplet) => format!("{}:{}", package, triplet),
        None => package.to_string(),
    }
}

/// Union the package sets of the libraries, the project, and the tool
/// projects. Tools are built on the host, so their packages always carry
/// the native triplet regardless of the invocation platform. The result is
/// de-duplicated and sorted so repeated runs install in the same order.
pub fn resolve_packages(
    project: &Project,
    libraries: &[Project],
    tools: &[ToolRef],
    platform: Platform,
    host: HostOs,
) -> Result<Vec<String>> {
    let triplet = platform.triplet(host);
    let native_triplet = Platform::Native.triplet(host);

    let mut packages: Vec<String> = libraries
        .iter()
        .chain(std::iter::once(project))
        .flat_map(|declarer| declarer.packages())
        .map(|package| qualify(&package, triplet))
        .collect();

    for tool in tools {
        let tool_project = tool.project()?;
        packages.extend(
            tool_project
                .packages()
                .iter()
                .map(|package| qualify(package, native_triplet)),
        );
    }

    packages.sort();
    packages.dedup();
    Ok(packages)
}

/// Install the aggregated package set, one command per package, in the
/// deterministic order produced by [`resolve_packages`].
pub fn install_packages(
    ctx: &GlobalContext,
    vcpkg: &Vcpkg,
    packages: &[String],
    platform: Platform,
) -> Result<()> {
    let needs_cross_support = platform.needs_emsdk() && ctx.host().is_windows();
    if packages.is_empty() && !needs_cross_support {
        return Ok(());
    }

    if needs_cross_support {
        let support = qualify(
            WINDOWS_CROSS_SUPPORT_PACKAGE,
            Platform::Native.triplet(ctx.host()),
        );
        ctx.shell().status(Status::Installing, &support);
        vcpkg.install(ctx, &support)?;
    }

    let mut progress = ctx.shell().progress(packages.len() as u64, "installing packages");
    for package in packages {
        ctx.shell().status(Status::Installing, package);
        vcpkg.install(ctx, package)?;
        progress.inc(1);
    }
    progress.finish();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::declarations::{TOOLS_LIST, VCPKG_LIST};
    use crate::ops::tools::resolve_tools;
    use crate::test_support::{recording_context, scaffold_project, write_list};
    use tempfile::TempDir;

    #[test]
    fn test_dedup_and_sort() {
        let tmp = TempDir::new().unwrap();
        let root = scaffold_project(tmp.path(), "app");
        write_list(&root, VCPKG_LIST, &["b:native", "a", "a", "c:native"]);

        let project = Project::open(&root).unwrap();
        let packages =
            resolve_packages(&project, &[], &[], Platform::Native, HostOs::Linux).unwrap();

        assert_eq!(packages, vec!["a", "b:native", "c:native"]);
    }

    #[test]
    fn test_platform_triplet_applies_to_project_and_libraries() {
        let tmp = TempDir::new().unwrap();
        let lib = scaffold_project(tmp.path(), "lib_a");
        write_list(&lib, VCPKG_LIST, &["zlib"]);
        let root = scaffold_project(tmp.path(), "app");
        write_list(&root, VCPKG_LIST, &["curl"]);

        let project = Project::open(&root).unwrap();
        let libraries = vec![Project::open(&lib).unwrap()];

        let packages = resolve_packages(
            &project,
            &libraries,
            &[],
            Platform::Emscripten,
            HostOs::Linux,
        )
        .unwrap();

        assert_eq!(
            packages,
            vec!["curl:wasm32-emscripten", "zlib:wasm32-emscripten"]
        );
    }

    #[test]
    fn test_tool_packages_always_native() {
        let tmp = TempDir::new().unwrap();
        let root = scaffold_project(tmp.path(), "app");
        write_list(&root, TOOLS_LIST, &["codegen"]);
        write_list(&root, VCPKG_LIST, &["curl"]);
        let tool = scaffold_project(&root.join("tools"), "codegen");
        write_list(&tool, VCPKG_LIST, &["protobuf"]);

        let project = Project::open(&root).unwrap();
        let tools = resolve_tools(&project, &[]);

        // Windows host makes both triplets visible.
        let packages = resolve_packages(
            &project,
            &[],
            &tools,
            Platform::Emscripten,
            HostOs::Windows,
        )
        .unwrap();

        assert_eq!(
            packages,
            vec!["curl:wasm32-emscripten", "protobuf:x64-windows"]
        );
    }

    #[test]
    fn test_duplicates_across_declarers_collapse() {
        let tmp = TempDir::new().unwrap();
        let lib = scaffold_project(tmp.path(), "lib_a");
        write_list(&lib, VCPKG_LIST, &["zlib", "curl"]);
        let root = scaffold_project(tmp.path(), "app");
        write_list(&root, VCPKG_LIST, &["zlib"]);

        let project = Project::open(&root).unwrap();
        let libraries = vec![Project::open(&lib).unwrap()];

        let packages =
            resolve_packages(&project, &libraries, &[], Platform::Native, HostOs::Linux).unwrap();

        assert_eq!(packages, vec!["curl", "zlib"]);
    }

    #[test]
    fn test_install_is_ordered_and_skips_empty() {
        let tmp = TempDir::new().unwrap();
        let (ctx, runner) = recording_context(tmp.path());
        let vcpkg = Vcpkg::new(ctx.vcpkg_root(), ctx.host());

        install_packages(&ctx, &vcpkg, &[], Platform::Native).unwrap();
        assert!(runner.calls().is_empty());

        let packages = vec!["a".to_string(), "b".to_string()];
        install_packages(&ctx, &vcpkg, &packages, Platform::Native).unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].ends_with("install a"));
        assert!(calls[1].ends_with("install b"));
    }

    #[test]
    fn test_windows_cross_support_package_comes_first() {
        let tmp = TempDir::new().unwrap();
        let (ctx, runner) = recording_context(tmp.path());
        let ctx = ctx.with_host(HostOs::Windows);
        let vcpkg = Vcpkg::new(ctx.vcpkg_root(), ctx.host());

        let packages = vec!["sdl2:wasm32-emscripten".to_string()];
        install_packages(&ctx, &vcpkg, &packages, Platform::Emscripten).unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].ends_with("install boost-build:x64-windows"));
        assert!(calls[1].ends_with("install sdl2:wasm32-emscripten"));
    }
}
