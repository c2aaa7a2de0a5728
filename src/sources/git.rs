//! Git checkout management for libraries and toolchain installs.
//!
//! Checkouts are presence-gated: an existing folder is trusted as-is and is
//! never validated or refreshed. There is no partial-clone recovery — a
//! failed clone aborts the whole orchestration.

use std::path::Path;

use anyhow::{Context, Result};
use git2::build::RepoBuilder;
use git2::{Cred, FetchOptions, Oid, RemoteCallbacks, Repository, ResetType};
use url::Url;

use crate::util::context::REMOTE_HOST;

/// Build the remote URL for a named library under an organisation.
pub fn library_remote(org: &str, name: &str) -> Result<Url> {
    Url::parse(&format!("{}/{}/{}.git", REMOTE_HOST, org, name))
        .with_context(|| format!("invalid remote for library `{}`", name))
}

/// Ensure `dest` holds a checkout of `remote`.
///
/// Returns `true` when a clone actually happened, `false` when the folder
/// was already present (no network operation in that case).
pub fn ensure_clone(remote: &Url, dest: &Path, token: Option<&str>) -> Result<bool> {
    if dest.is_dir() {
        tracing::debug!("checkout already present: {}", dest.display());
        return Ok(false);
    }

    tracing::info!("cloning {} into {}", remote, dest.display());

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    let mut builder = RepoBuilder::new();
    if let Some(token) = token {
        let token = token.to_string();
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(move |_url, _username, _allowed| {
            Cred::userpass_plaintext("x-access-token", &token)
        });
        let mut fetch = FetchOptions::new();
        fetch.remote_callbacks(callbacks);
        builder.fetch_options(fetch);
    }

    builder
        .clone(remote.as_str(), dest)
        .with_context(|| format!("failed to clone {}", remote))?;

    Ok(true)
}

/// Clone `remote` into `dest` (unless present) and pin the fresh checkout to
/// an exact revision. Pinning a commit, not a branch, keeps the checkout
/// reproducible across machines and time.
pub fn ensure_clone_at_rev(remote: &Url, dest: &Path, rev: &str) -> Result<()> {
    if !ensure_clone(remote, dest, None)? {
        return Ok(());
    }

    let repo = Repository::open(dest)
        .with_context(|| format!("failed to open git repository at {}", dest.display()))?;

    let oid = Oid::from_str(rev).with_context(|| format!("invalid revision `{}`", rev))?;
    let commit = repo
        .find_commit(oid)
        .with_context(|| format!("revision `{}` not found in {}", rev, remote))?;

    repo.reset(commit.as_object(), ResetType::Hard, None)
        .with_context(|| format!("failed to check out `{}`", rev))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_library_remote_shape() {
        let url = library_remote("acme", "geometry").unwrap();
        assert_eq!(url.as_str(), "https://github.com/acme/geometry.git");
    }

    #[test]
    fn test_present_folder_short_circuits() {
        let tmp = TempDir::new().unwrap();
        // An unreachable remote proves no network operation is attempted.
        let remote = Url::parse("file:///no/such/repository.git").unwrap();

        let cloned = ensure_clone(&remote, tmp.path(), None).unwrap();
        assert!(!cloned);
    }

    #[test]
    fn test_clone_failure_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let remote = Url::parse("file:///no/such/repository.git").unwrap();

        let result = ensure_clone(&remote, &tmp.path().join("missing"), None);
        assert!(result.is_err());
    }
}
