//! Git operations wrapper for repatch.
//!
//! This module provides a thin, async wrapper around the system `git`
//! command. Like Cargo with `git-fetch-with-cli`, repatch shells out to
//! the installed git binary instead of embedding a git library, so it
//! works with the user's existing authentication setup (SSH agents,
//! credential helpers, tokens in URLs) on every platform.
//!
//! Only the operations the resolve pipeline needs are exposed: cloning a
//! source repository into a cache directory and checking out a branch
//! inside the clone. Both fail loudly - a non-zero exit status becomes a
//! typed error carrying the attempted operation and git's own stderr,
//! and the run aborts.
//!
//! There is no retry and no parallelism here: the resolver materializes
//! repositories one at a time, and each operation blocks the run until
//! it completes or fails.

pub mod command_builder;

use crate::core::RepatchError;
use crate::git::command_builder::GitCommand;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// A handle to a local git repository.
///
/// Holds only the repository path and queries git directly for
/// everything else, so the handle never goes stale.
#[derive(Debug)]
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    /// Create a handle for an existing local repository.
    ///
    /// Does not verify the path; use [`is_git_repo`](Self::is_git_repo)
    /// before operating on a directory of unknown provenance.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The local filesystem path of this repository.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the path looks like a git repository (has a `.git` entry).
    pub fn is_git_repo(&self) -> bool {
        self.path.join(".git").exists()
    }

    /// Clone a repository from `url` into `target`.
    ///
    /// # Errors
    ///
    /// Returns [`RepatchError::GitCloneFailed`] with git's diagnostic
    /// output if the URL is unreachable, authentication fails, or the
    /// target cannot be written.
    pub async fn clone(url: &str, target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref();
        GitCommand::clone(url, target).execute_success().await?;
        Ok(Self::new(target))
    }

    /// Check out a branch in this repository.
    ///
    /// # Errors
    ///
    /// Returns [`RepatchError::GitCheckoutFailed`] with git's diagnostic
    /// output if the branch does not exist in the clone.
    pub async fn checkout(&self, reference: &str) -> Result<()> {
        GitCommand::checkout(reference).current_dir(&self.path).execute_success().await
    }
}

/// Verify that the system git command is available.
///
/// Called once before any repository work so a missing git installation
/// surfaces as [`RepatchError::GitNotFound`] instead of a confusing
/// spawn failure mid-run.
pub async fn ensure_git_available() -> Result<()> {
    GitCommand::version()
        .execute_success()
        .await
        .map_err(|_| RepatchError::GitNotFound.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_git_available() {
        ensure_git_available().await.unwrap();
    }

    #[test]
    fn test_is_git_repo_on_plain_dir() {
        let temp = tempfile::tempdir().unwrap();
        let repo = GitRepo::new(temp.path());
        assert!(!repo.is_git_repo());
    }
}
