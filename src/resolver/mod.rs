//! Dependency graph walker.
//!
//! Starting from a root manifest, the walker discovers every dependency
//! entry with a git source reference - across the root and every
//! manifest nested inside every materialized clone - and produces a
//! deduplicated spec list in first-discovery order together with the
//! materializations the specs resolve against.
//!
//! The same repository identity is often reachable through several
//! manifests (diamond and even cyclic reference patterns between forked
//! upstreams). A single visited-identity set is threaded through the
//! whole traversal, so each identity is cloned and scanned at most once
//! per run and the walk always terminates.

pub mod locator;

use anyhow::Result;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::cache::{Cache, MaterializedRepo};
use crate::core::RepatchError;
use crate::manifest::{GitDependency, Manifest};
use crate::source::RepoIdentity;

/// Result of a full graph walk.
pub struct Discovery {
    specs: Vec<GitDependency>,
    repos: HashMap<RepoIdentity, MaterializedRepo>,
}

impl Discovery {
    /// The discovered git dependencies, deduplicated by name, in
    /// first-discovery order.
    pub fn specs(&self) -> &[GitDependency] {
        &self.specs
    }

    /// Whether the walk discovered any git dependencies at all.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// The materialization a spec resolves against.
    pub fn repo_for(&self, dep: &GitDependency) -> Result<&MaterializedRepo> {
        let identity = RepoIdentity::new(&dep.name, &dep.url, &dep.branch)?;
        self.repos.get(&identity).ok_or_else(|| {
            RepatchError::Other {
                message: format!("No materialization recorded for identity '{identity}'"),
            }
            .into()
        })
    }
}

/// Walks the dependency graph, materializing sources through a [`Cache`].
pub struct Walker<'a> {
    cache: &'a Cache,
    force: bool,
}

impl<'a> Walker<'a> {
    /// Create a walker over `cache`. With `force`, every reachable
    /// source is re-materialized even if already cached.
    pub fn new(cache: &'a Cache, force: bool) -> Self {
        Self {
            cache,
            force,
        }
    }

    /// Discover every git dependency transitively reachable from
    /// `root_manifest`.
    ///
    /// Manifests are processed from a worklist: scanning a manifest
    /// yields specs; each spec whose identity has not been visited yet
    /// is materialized, and every non-workspace manifest inside the new
    /// clone joins the worklist. Specs are deduplicated by dependency
    /// name, first discovery wins.
    ///
    /// # Errors
    ///
    /// Any manifest parse failure, identity derivation failure, or
    /// clone/checkout failure aborts the walk.
    pub async fn discover(&self, root_manifest: &Path) -> Result<Discovery> {
        let mut visited: HashSet<RepoIdentity> = HashSet::new();
        let mut seen_names: HashSet<String> = HashSet::new();
        let mut specs: Vec<GitDependency> = Vec::new();
        let mut repos: HashMap<RepoIdentity, MaterializedRepo> = HashMap::new();

        let root = root_manifest.to_path_buf();
        let mut worklist: VecDeque<PathBuf> = VecDeque::from([root.clone()]);

        while let Some(path) = worklist.pop_front() {
            let manifest = Manifest::load(&path)?;

            // Workspace roots inside clones aggregate members but declare
            // no dependencies of their own worth scanning; their member
            // manifests are already on the worklist individually. The
            // root manifest is always scanned.
            if path != root && manifest.is_workspace_root() {
                tracing::debug!("Skipping workspace root {}", path.display());
                continue;
            }

            for dep in manifest.git_dependencies(self.cache.default_branch()) {
                let identity = RepoIdentity::new(&dep.name, &dep.url, &dep.branch)?;

                if seen_names.insert(dep.name.clone()) {
                    tracing::debug!(
                        "Discovered git dependency '{}' -> {} (branch {})",
                        dep.name,
                        dep.url,
                        dep.branch
                    );
                    specs.push(dep.clone());
                }

                if visited.insert(identity.clone()) {
                    let repo =
                        self.cache.materialize(&dep.name, &dep.url, &dep.branch, self.force).await?;
                    for nested in &repo.manifests {
                        worklist.push_back(nested.clone());
                    }
                    repos.insert(identity, repo);
                }
            }
        }

        tracing::info!(
            "Discovered {} git dependencies across {} materialized sources",
            specs.len(),
            repos.len()
        );

        Ok(Discovery {
            specs,
            repos,
        })
    }
}
