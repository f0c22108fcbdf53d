//! On-disk clone cache keyed by repository identity.
//!
//! The cache owns materialization of remote sources: each distinct
//! `(url, branch)` identity maps to one deterministic directory under
//! the clones dir. An existing directory is trusted and reused without
//! contacting the network; `force` removes it fully before re-fetching,
//! so from the caller's point of view re-materialization is atomic -
//! the old copy is gone before the new one appears.
//!
//! Clones persist across runs. A failed clone or checkout aborts the
//! run; the partially-written directory is removed so a later run does
//! not mistake it for a valid materialization.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::git::GitRepo;
use crate::source::RepoIdentity;
use crate::utils::fs::{ensure_dir, find_manifests};

/// A local on-disk copy of one `(url, branch)` source.
///
/// Created only by [`Cache::materialize`]; the walker and locator read
/// it but never mutate it.
#[derive(Debug)]
pub struct MaterializedRepo {
    /// Identity this copy was materialized under
    pub identity: RepoIdentity,
    /// Root directory of the clone
    pub root: PathBuf,
    /// Every manifest file found inside the clone, in sorted order
    pub manifests: Vec<PathBuf>,
}

/// The clone cache.
pub struct Cache {
    clones_dir: PathBuf,
    default_branch: String,
}

impl Cache {
    /// Create a cache rooted at `clones_dir`.
    ///
    /// `default_branch` is the no-checkout sentinel: a dependency
    /// pinned to it uses the clone exactly as fetched.
    pub fn new(clones_dir: PathBuf, default_branch: impl Into<String>) -> Self {
        Self {
            clones_dir,
            default_branch: default_branch.into(),
        }
    }

    /// Directory holding all materialized clones.
    pub fn clones_dir(&self) -> &Path {
        &self.clones_dir
    }

    /// The configured default branch.
    pub fn default_branch(&self) -> &str {
        &self.default_branch
    }

    /// Materialize one `(url, branch)` source, cloning at most once.
    ///
    /// If the identity's directory already exists and `force` is false,
    /// the existing content is treated as valid and returned without
    /// any network activity. With `force`, the directory is removed
    /// before re-fetching.
    ///
    /// # Errors
    ///
    /// Fails on identity derivation, clone, or checkout errors; all are
    /// fatal to the run.
    pub async fn materialize(
        &self,
        name: &str,
        url: &str,
        branch: &str,
        force: bool,
    ) -> Result<MaterializedRepo> {
        let identity = RepoIdentity::new(name, url, branch)?;
        let target = self.clones_dir.join(identity.as_str());

        if target.is_dir() {
            if force {
                tracing::debug!("Removing existing clone {} for re-fetch", target.display());
                fs::remove_dir_all(&target).with_context(|| {
                    format!("Failed to remove existing clone: {}", target.display())
                })?;
            } else {
                tracing::debug!("Reusing existing clone {}", target.display());
                return self.open(identity, target);
            }
        }

        ensure_dir(&self.clones_dir)?;

        tracing::info!("Cloning {} (branch {}) into {}", url, branch, target.display());
        let fetched = GitRepo::clone(url, &target).await.inspect_err(|_| {
            // Never leave a half-written clone behind to be trusted later
            let _ = fs::remove_dir_all(&target);
        })?;

        if branch != self.default_branch {
            fetched.checkout(branch).await.inspect_err(|_| {
                let _ = fs::remove_dir_all(&target);
            })?;
        }

        self.open(identity, target)
    }

    /// Build the [`MaterializedRepo`] view over a clone directory.
    fn open(&self, identity: RepoIdentity, root: PathBuf) -> Result<MaterializedRepo> {
        let manifests = find_manifests(&root)?;
        tracing::debug!("Found {} manifests under {}", manifests.len(), root.display());
        Ok(MaterializedRepo {
            identity,
            root,
            manifests,
        })
    }

    /// Number of materialized clones currently on disk.
    pub fn clone_count(&self) -> Result<usize> {
        if !self.clones_dir.is_dir() {
            return Ok(0);
        }
        let mut count = 0;
        for entry in fs::read_dir(&self.clones_dir)
            .with_context(|| format!("Failed to read clones dir: {}", self.clones_dir.display()))?
        {
            if entry?.file_type()?.is_dir() {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Total size in bytes of everything under the clones dir.
    pub fn size(&self) -> Result<u64> {
        if !self.clones_dir.is_dir() {
            return Ok(0);
        }
        let mut total = 0;
        for entry in WalkDir::new(&self.clones_dir) {
            let entry = entry.with_context(|| {
                format!("Failed to walk clones dir: {}", self.clones_dir.display())
            })?;
            if entry.file_type().is_file() {
                total += entry.metadata().map(|m| m.len()).unwrap_or(0);
            }
        }
        Ok(total)
    }

    /// Remove every materialized clone. Returns the number removed.
    pub fn clear(&self) -> Result<usize> {
        if !self.clones_dir.is_dir() {
            return Ok(0);
        }
        let mut removed = 0;
        for entry in fs::read_dir(&self.clones_dir)
            .with_context(|| format!("Failed to read clones dir: {}", self.clones_dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(&path)
                    .with_context(|| format!("Failed to remove clone: {}", path.display()))?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_existing_clone_reused_without_network() {
        let temp = tempdir().unwrap();
        let clones = temp.path().join("clones");

        // Pre-create the identity directory; the URL is unreachable, so
        // success proves the cache never went near the network.
        let identity = RepoIdentity::new("dep", "https://unreachable.invalid/x/y", "dev").unwrap();
        let clone_dir = clones.join(identity.as_str());
        ensure_dir(&clone_dir.join("crates/foo")).unwrap();
        fs::write(clone_dir.join("crates/foo/Cargo.toml"), "[package]\nname = \"foo\"\n").unwrap();

        let cache = Cache::new(clones, "master");
        let repo =
            cache.materialize("dep", "https://unreachable.invalid/x/y", "dev", false).await.unwrap();

        assert_eq!(repo.identity, identity);
        assert_eq!(repo.manifests.len(), 1);
    }

    #[tokio::test]
    async fn test_force_removes_before_fetching() {
        let temp = tempdir().unwrap();
        let clones = temp.path().join("clones");

        let identity = RepoIdentity::new("dep", "https://unreachable.invalid/x/y", "dev").unwrap();
        let clone_dir = clones.join(identity.as_str());
        ensure_dir(&clone_dir).unwrap();
        fs::write(clone_dir.join("marker"), "stale").unwrap();

        let cache = Cache::new(clones, "master");
        let result =
            cache.materialize("dep", "https://unreachable.invalid/x/y", "dev", true).await;

        // The fetch fails (unreachable URL), and the stale copy is gone:
        // no partial cache state survives to be trusted by a later run.
        assert!(result.is_err());
        assert!(!clone_dir.exists());
    }

    #[test]
    fn test_count_size_and_clear_on_empty_cache() {
        let temp = tempdir().unwrap();
        let cache = Cache::new(temp.path().join("missing"), "master");
        assert_eq!(cache.clone_count().unwrap(), 0);
        assert_eq!(cache.size().unwrap(), 0);
        assert_eq!(cache.clear().unwrap(), 0);
    }

    #[test]
    fn test_clear_removes_clone_dirs() {
        let temp = tempdir().unwrap();
        let clones = temp.path().join("clones");
        ensure_dir(&clones.join("repo_a_master")).unwrap();
        ensure_dir(&clones.join("repo_b_dev")).unwrap();
        fs::write(clones.join("repo_a_master/file"), "data").unwrap();

        let cache = Cache::new(clones.clone(), "master");
        assert_eq!(cache.clone_count().unwrap(), 2);
        assert!(cache.size().unwrap() > 0);
        assert_eq!(cache.clear().unwrap(), 2);
        assert_eq!(cache.clone_count().unwrap(), 0);
    }
}
