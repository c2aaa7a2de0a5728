//! A project rooted at a folder of declaration files.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};

use crate::core::declarations::{self, LIBRARIES_LIST, TOOLS_LIST, VCPKG_LIST};
use crate::util::fs::normalize_path;

/// A filesystem location carrying optional declaration files.
///
/// Identity is the resolved absolute path; a library checked out under the
/// shared libraries root and a tool sub-project are both plain `Project`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
    name: String,
}

impl Project {
    /// Open a project at an existing folder.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = normalize_path(root.as_ref());
        if !root.is_dir() {
            bail!("project root does not exist: {}", root.display());
        }
        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .ok_or_else(|| anyhow!("project root has no folder name: {}", root.display()))?;

        Ok(Project { root, name })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared library names, in declaration order.
    pub fn libraries(&self) -> Vec<String> {
        declarations::read_list([self.root.as_path()], LIBRARIES_LIST)
    }

    /// Declared tool names, in declaration order.
    pub fn tools(&self) -> Vec<String> {
        declarations::read_list([self.root.as_path()], TOOLS_LIST)
    }

    /// Declared package identifiers, bare (no triplet).
    pub fn packages(&self) -> Vec<String> {
        declarations::read_list([self.root.as_path()], VCPKG_LIST)
    }

    /// Source root of a tool sub-project declared by this project.
    pub fn tool_root(&self, name: &str) -> PathBuf {
        self.root.join("tools").join(name)
    }
}
