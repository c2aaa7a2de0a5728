//! Library dependency resolution.

use anyhow::{Context, Result};

use crate::core::project::Project;
use crate::sources::git;
use crate::util::context::GlobalContext;
use crate::util::shell::Status;

/// Expand the project's declared library list into checked-out projects,
/// cloning any that are missing under the shared libraries root.
///
/// A library already on disk is used as-is; only a library's own tool and
/// package declarations are consulted later — its `libraries_list.txt` is
/// deliberately not expanded further (one-level resolution).
pub fn resolve_libraries(ctx: &GlobalContext, project: &Project) -> Result<Vec<Project>> {
    let names = project.libraries();
    let mut libraries = Vec::with_capacity(names.len());

    for name in names {
        let dest = ctx.libraries_root().join(&name);
        if !dest.is_dir() {
            ctx.shell().status(Status::Fetching, &name);
            let remote = git::library_remote(ctx.org(), &name)?;
            git::ensure_clone(&remote, &dest, ctx.github_token())
                .with_context(|| format!("failed to fetch library `{}`", name))?;
        }
        libraries.push(Project::open(&dest)?);
    }

    Ok(libraries)
}
