//! Common test utilities and fixtures for repatch integration tests.
//!
//! Fixture upstreams are real git repositories created on disk and
//! referenced by their filesystem paths, so the whole pipeline - clone,
//! checkout, manifest scan - runs against real git without any network.

// Allow dead code because these utilities are used across different test
// files and not all utilities are used in every test file
#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git command wrapper for building fixture repositories.
pub struct TestGit {
    repo_path: PathBuf,
}

impl TestGit {
    /// Create a new TestGit instance for the given repository path
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    fn run_git_command(&self, args: &[&str], action: &str) -> Result<std::process::Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .with_context(|| action.to_string())?;

        if !output.status.success() {
            bail!("{} failed: {}", action, String::from_utf8_lossy(&output.stderr));
        }

        Ok(output)
    }

    /// Initialize a new git repository
    pub fn init(&self) -> Result<()> {
        self.run_git_command(&["init"], "Failed to initialize git repository")?;
        Ok(())
    }

    /// Configure git user for tests
    pub fn config_user(&self) -> Result<()> {
        self.run_git_command(
            &["config", "user.email", "test@repatch.example"],
            "Failed to configure git user email",
        )?;
        self.run_git_command(
            &["config", "user.name", "Test User"],
            "Failed to configure git user name",
        )?;
        Ok(())
    }

    /// Add all files and create a commit
    pub fn commit_all(&self, message: &str) -> Result<()> {
        self.run_git_command(&["add", "."], "Failed to add files to git")?;
        self.run_git_command(&["commit", "-m", message], "Failed to create git commit")?;
        Ok(())
    }

    /// Create and checkout a branch
    pub fn create_branch(&self, branch_name: &str) -> Result<()> {
        self.run_git_command(
            &["checkout", "-b", branch_name],
            &format!("Failed to create branch: {branch_name}"),
        )?;
        Ok(())
    }

    /// Checkout a branch or commit
    pub fn checkout(&self, ref_name: &str) -> Result<()> {
        self.run_git_command(
            &["checkout", ref_name],
            &format!("Failed to checkout: {ref_name}"),
        )?;
        Ok(())
    }

    /// Get the current branch name
    pub fn current_branch(&self) -> Result<String> {
        let output = self
            .run_git_command(&["branch", "--show-current"], "Failed to get current branch name")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Write a file, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Create a git fixture repository at `path` from a list of
/// `(relative path, content)` files, committed on the default branch.
pub fn fixture_repo(path: &Path, files: &[(&str, &str)]) -> Result<TestGit> {
    fs::create_dir_all(path)?;
    for (rel, content) in files {
        write_file(&path.join(rel), content)?;
    }
    let git = TestGit::new(path);
    git.init()?;
    git.config_user()?;
    git.commit_all("initial")?;
    Ok(git)
}

/// Add a branch named `branch` to a fixture repository, containing
/// `files` on top of the default branch, then return to the default
/// branch so clones fetch the expected HEAD.
pub fn fixture_branch(git: &TestGit, path: &Path, branch: &str, files: &[(&str, &str)]) -> Result<()> {
    let default_branch = git.current_branch()?;
    git.create_branch(branch)?;
    for (rel, content) in files {
        write_file(&path.join(rel), content)?;
    }
    git.commit_all(&format!("branch {branch}"))?;
    git.checkout(&default_branch)?;
    Ok(())
}

/// A simple `[package]` manifest body.
pub fn package_manifest(name: &str) -> String {
    format!("[package]\nname = \"{name}\"\nversion = \"0.1.0\"\nedition = \"2021\"\n")
}
