//! Type-safe git command builder for consistent command execution.
//!
//! Provides a fluent API for building and executing git commands,
//! ensuring every invocation logs the same way and converts a non-zero
//! exit status into the matching [`RepatchError`] variant carrying the
//! captured stderr.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::core::RepatchError;
use crate::utils::platform::get_git_command;

/// Builder for constructing and executing git commands.
///
/// The working directory is always passed to git via the `-C` flag
/// rather than by changing the process's current directory, so command
/// execution never depends on (or mutates) ambient process state.
///
/// # Examples
///
/// ```rust,ignore
/// use repatch_cli::git::command_builder::GitCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// let output = GitCommand::new()
///     .args(["status", "--porcelain"])
///     .current_dir("/path/to/repo")
///     .execute()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct GitCommand {
    /// Command arguments to pass to git (e.g. ["clone", "url", "path"])
    args: Vec<String>,

    /// Working directory for command execution, passed via `git -C`
    current_dir: Option<std::path::PathBuf>,

    /// For clone commands, the URL is kept for better error messages
    clone_url: Option<String>,
}

impl GitCommand {
    /// Create a new git command builder with no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the working directory for git command execution.
    ///
    /// The directory is passed with `-C` so git resolves it itself;
    /// the process's own current directory is never touched.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Add a single argument to the git command.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments to the git command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Execute the command and return its captured output.
    ///
    /// A non-zero exit status is converted into a typed error:
    /// [`RepatchError::GitCloneFailed`] for clone commands,
    /// [`RepatchError::GitCheckoutFailed`] for checkouts, and
    /// [`RepatchError::GitCommandError`] otherwise. All three carry the
    /// captured stderr so the failure surfaces with git's own
    /// diagnostic text.
    pub async fn execute(self) -> Result<GitCommandOutput> {
        let git_command = get_git_command();
        let mut cmd = Command::new(git_command);

        // Build the full argument list including the -C flag if needed
        let mut full_args = Vec::new();
        if let Some(ref dir) = self.current_dir {
            full_args.push("-C".to_string());
            full_args.push(dir.display().to_string());
        }
        full_args.extend(self.args.clone());

        cmd.args(&full_args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!(
            target: "git",
            "Executing command: {} {}",
            git_command,
            full_args.join(" ")
        );

        let output = cmd
            .output()
            .await
            .context(format!("Failed to execute git {}", full_args.join(" ")))?;

        // Skip -C flag arguments when identifying the command type
        let args_start =
            if full_args.first().map(String::as_str) == Some("-C") && full_args.len() > 2 {
                2
            } else {
                0
            };
        let effective_args = &full_args[args_start..];

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);

            tracing::debug!(
                target: "git",
                "Command failed with exit code: {:?}",
                output.status.code()
            );

            let error = if effective_args.first().is_some_and(|arg| arg == "clone") {
                // Use the URL stored when building the command, not parsed from args
                let url = self.clone_url.unwrap_or_else(|| "unknown".to_string());
                RepatchError::GitCloneFailed {
                    url,
                    reason: stderr.to_string(),
                }
            } else if effective_args.first().is_some_and(|arg| arg == "checkout") {
                let reference = effective_args.get(1).cloned().unwrap_or_default();
                RepatchError::GitCheckoutFailed {
                    reference,
                    reason: stderr.to_string(),
                }
            } else {
                RepatchError::GitCommandError {
                    operation: effective_args
                        .first()
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    stderr: stderr.to_string(),
                }
            };

            return Err(error.into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stdout.is_empty() {
            tracing::debug!(target: "git", "{}", stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "git", "{}", stderr.trim());
        }

        Ok(GitCommandOutput {
            stdout,
            stderr,
        })
    }

    /// Execute the command and return only stdout as a trimmed string.
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Execute the command and check for success without keeping output.
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}

/// Output from a git command
pub struct GitCommandOutput {
    /// Standard output from the git command
    pub stdout: String,
    /// Standard error output from the git command
    pub stderr: String,
}

// Convenience builders for the git operations the resolver needs

impl GitCommand {
    /// Create a clone command.
    pub fn clone(url: &str, target: impl AsRef<Path>) -> Self {
        let mut cmd = Self::new();
        cmd.args.push("clone".to_string());
        cmd.args.push(url.to_string());
        cmd.args.push(target.as_ref().display().to_string());
        cmd.clone_url = Some(url.to_string());
        cmd
    }

    /// Create a checkout command.
    pub fn checkout(ref_name: &str) -> Self {
        Self::new().args(["checkout", ref_name])
    }

    /// Create a version query command, used to probe git availability.
    pub fn version() -> Self {
        Self::new().arg("--version")
    }
}
