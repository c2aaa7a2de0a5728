//! Build-time tool bootstrapping.
//!
//! Tools are sub-projects whose compiled output the parent build consumes;
//! they are never linked, so they must be built and installed before the
//! parent's own configure step, and they always build for the host.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::cmake::CMakeDriver;
use crate::core::platform::Platform;
use crate::core::project::Project;
use crate::ops::orchestrate;
use crate::util::context::GlobalContext;
use crate::util::fs::ensure_dir;
use crate::util::shell::Status;

/// A tool sub-project together with the project that declared it.
#[derive(Debug, Clone)]
pub struct ToolRef {
    name: String,
    root: PathBuf,
}

impl ToolRef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open the tool's source tree as a project.
    pub fn project(&self) -> Result<Project> {
        Project::open(&self.root)
            .with_context(|| format!("tool `{}` has no project folder", self.name))
    }
}

/// Union of tool declarations across the project's libraries (one level)
/// and the project itself, in declaration order; the first declaration of a
/// name wins.
pub fn resolve_tools(project: &Project, libraries: &[Project]) -> Vec<ToolRef> {
    let mut tools: Vec<ToolRef> = Vec::new();

    for declarer in libraries.iter().chain(std::iter::once(project)) {
        for name in declarer.tools() {
            if tools.iter().any(|tool| tool.name == name) {
                continue;
            }
            tools.push(ToolRef {
                root: declarer.tool_root(&name),
                name,
            });
        }
    }

    tools
}

/// Build and install every tool, in order, before the caller proceeds to its
/// own configure step. Each tool gets a dedicated build subdirectory under
/// `<build_dir>/tools` and re-enters the orchestration with the platform
/// forced to native. Any failure aborts the parent build.
pub fn build_tools(ctx: &GlobalContext, tools: &[ToolRef], build_dir: &Path) -> Result<()> {
    for tool in tools {
        ctx.shell()
            .status(Status::Building, format!("tool {}", tool.name));

        let tool_build_dir = build_dir.join("tools").join(&tool.name);
        ensure_dir(&tool_build_dir)?;

        let tool_project = tool.project()?;
        orchestrate::orchestrate(ctx, &tool_project, Platform::Native, &tool_build_dir)
            .with_context(|| format!("failed to build tool `{}`", tool.name))?;

        CMakeDriver::new(ctx, tool_build_dir).install()?;
    }

    Ok(())
}
