//! Error types and user-friendly error handling for repatch.
//!
//! The error design follows a two-layer approach:
//!
//! 1. [`RepatchError`] - a typed taxonomy of every fatal condition the
//!    resolve pipeline can hit, created at the failure site with the
//!    exact operation and any captured diagnostic output.
//! 2. [`ErrorContext`] - a presentation wrapper that adds optional
//!    details and an actionable suggestion, rendered in color on the
//!    terminal by the CLI entry point.
//!
//! Internally, functions propagate `anyhow::Result` so call sites can
//! attach context with `.context(...)`; [`user_friendly_error`] downcasts
//! back to [`RepatchError`] at the top of the run to pick the right
//! suggestion. Every error is fatal: the run aborts and no patch output
//! is written.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Error taxonomy for the resolve pipeline.
///
/// Variants carry the identifying data a user needs to act on the
/// failure: the git operation and its stderr, the offending URL or
/// package name, or the manifest file that failed to parse.
#[derive(Error, Debug)]
pub enum RepatchError {
    /// A git command returned a non-zero exit status.
    ///
    /// # Fields
    /// - `operation`: the git operation that failed (e.g. "clone", "checkout")
    /// - `stderr`: the captured error output from the git command
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git operation that failed (e.g. "clone", "checkout")
        operation: String,
        /// The captured error output from the git command
        stderr: String,
    },

    /// Git executable not found in PATH.
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// Cloning a source repository failed.
    #[error("Failed to clone repository: {url}")]
    GitCloneFailed {
        /// The repository URL that failed to clone
        url: String,
        /// The captured diagnostic output from git
        reason: String,
    },

    /// Checking out a branch inside a clone failed.
    #[error("Failed to checkout branch '{reference}' in repository")]
    GitCheckoutFailed {
        /// The branch that failed to checkout
        reference: String,
        /// The captured diagnostic output from git
        reason: String,
    },

    /// Configuration problem detected before any network activity,
    /// such as a missing or unreadable root manifest.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// A manifest file could not be parsed as TOML.
    #[error("Invalid manifest file syntax in {file}")]
    ManifestParseError {
        /// Path to the manifest file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// A dependency's git URL is empty or reduces to nothing after
    /// normalization, so no repository identity can be derived from it.
    #[error("Invalid git source URL '{url}' for dependency '{name}'")]
    InvalidSourceUrl {
        /// The dependency whose entry carries the URL
        name: String,
        /// The malformed URL
        url: String,
    },

    /// No manifest inside the materialized repository declares the
    /// requested package name.
    #[error("Package '{name}' not found in any manifest of clone '{identity}'")]
    PackageNotFound {
        /// The package name that was searched for
        name: String,
        /// Identity of the clone that was searched
        identity: String,
    },

    /// More than one manifest inside the materialized repository declares
    /// the requested package name; the resolver never picks one silently.
    #[error("Package '{name}' is declared by multiple manifests in clone '{identity}'")]
    AmbiguousPackage {
        /// The package name that was searched for
        name: String,
        /// Identity of the clone that was searched
        identity: String,
        /// Directories whose manifests all declare the name
        candidates: Vec<String>,
    },

    /// IO error wrapper for std::io::Error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information.
///
/// Wraps a [`RepatchError`] and adds optional details and a suggestion.
/// When displayed, errors show the main message in red, details in
/// yellow, and the suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: RepatchError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`RepatchError`].
    #[must_use]
    pub const fn new(error: RepatchError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert an `anyhow::Error` into a user-friendly [`ErrorContext`].
///
/// Downcasts to [`RepatchError`] when possible to attach a tailored
/// suggestion; otherwise falls back to a generic context that includes
/// the full error chain for diagnostics.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    match error.downcast::<RepatchError>() {
        Ok(repatch_error) => create_error_context(repatch_error),
        Err(error) => {
            // Generic error - include the full error chain for better diagnostics
            let mut message = error.to_string();

            let chain: Vec<String> =
                error.chain().skip(1).map(std::string::ToString::to_string).collect();

            if !chain.is_empty() {
                message.push_str("\n\nCaused by:");
                for (i, cause) in chain.iter().enumerate() {
                    message.push_str(&format!("\n  {}: {}", i + 1, cause));
                }
            }

            ErrorContext::new(RepatchError::Other {
                message,
            })
        }
    }
}

/// Map each [`RepatchError`] variant to an [`ErrorContext`] with
/// tailored details and suggestions.
fn create_error_context(error: RepatchError) -> ErrorContext {
    match &error {
        RepatchError::GitNotFound => ErrorContext::new(error)
            .with_suggestion("Install git from https://git-scm.com/ or via your package manager")
            .with_details("repatch uses the system git command to clone source repositories"),

        RepatchError::GitCommandError {
            stderr, ..
        } => {
            let details = stderr.trim().to_string();
            ErrorContext::new(error)
                .with_suggestion("Run with --verbose to see the exact git invocation")
                .with_details(details)
        }

        RepatchError::GitCloneFailed {
            reason, ..
        } => {
            let details = reason.trim().to_string();
            ErrorContext::new(error)
                .with_suggestion(
                    "Check that the URL is reachable and that your git authentication is set up",
                )
                .with_details(details)
        }

        RepatchError::GitCheckoutFailed {
            reason, ..
        } => {
            let details = reason.trim().to_string();
            ErrorContext::new(error)
                .with_suggestion("Check that the branch exists in the source repository")
                .with_details(details)
        }

        RepatchError::ConfigError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Pass the path to the root Cargo.toml of the project to patch"),

        RepatchError::ManifestParseError {
            reason, ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the TOML syntax: quotes, brackets, and table headers")
                .with_details(details)
        }

        RepatchError::InvalidSourceUrl {
            ..
        } => ErrorContext::new(error).with_details(
            "A git source URL must contain at least one path segment after the scheme",
        ),

        RepatchError::PackageNotFound {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Check the dependency's `package` key: it must match the [package].name \
             declared by exactly one manifest inside the cloned repository",
        ),

        RepatchError::AmbiguousPackage {
            candidates, ..
        } => {
            let details = format!("Candidate directories:\n  {}", candidates.join("\n  "));
            ErrorContext::new(error)
                .with_suggestion(
                    "The cloned repository declares the same package name more than once; \
                     clean the clone directory or pin a different branch",
                )
                .with_details(details)
        }

        RepatchError::IoError(_) | RepatchError::Other {
            ..
        } => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_operation() {
        let err = RepatchError::GitCommandError {
            operation: "checkout".to_string(),
            stderr: "error: pathspec 'dev' did not match".to_string(),
        };
        assert_eq!(err.to_string(), "Git operation failed: checkout");
    }

    #[test]
    fn test_user_friendly_error_downcasts_repatch_error() {
        let err = anyhow::Error::new(RepatchError::PackageNotFound {
            name: "foo-crate".to_string(),
            identity: "example_com_x_y_dev".to_string(),
        });

        let ctx = user_friendly_error(err);
        assert!(ctx.error.to_string().contains("foo-crate"));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_generic_includes_chain() {
        let err = anyhow::anyhow!("inner failure").context("outer context");
        let ctx = user_friendly_error(err);
        let message = ctx.error.to_string();
        assert!(message.contains("outer context"));
        assert!(message.contains("Caused by:"));
        assert!(message.contains("inner failure"));
    }

    #[test]
    fn test_error_context_display_format() {
        let ctx = ErrorContext::new(RepatchError::GitNotFound)
            .with_details("some details")
            .with_suggestion("some suggestion");

        let text = ctx.to_string();
        assert!(text.contains("Git is not installed"));
        assert!(text.contains("Details: some details"));
        assert!(text.contains("Suggestion: some suggestion"));
    }
}
