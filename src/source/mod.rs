//! Normalized repository identity derivation.
//!
//! A [`RepoIdentity`] is the collision-resistant key under which a
//! `(url, branch)` pair is materialized on disk. Derivation is a pure
//! function of its inputs: equal inputs always produce an equal
//! identity, and two branches of the same URL always produce different
//! identities, so the cache can hold both side by side.
//!
//! Normalization steps, in order: trim whitespace, strip a trailing
//! `.git` suffix, strip the transport scheme, strip trailing path
//! separators, replace `/` and `.` with `_`, append `_<branch>`. The
//! result doubles as a filesystem-safe directory name.

use std::fmt;

use crate::core::RepatchError;

/// Normalized, deterministic key identifying one `(url, branch)`
/// materialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoIdentity(String);

impl RepoIdentity {
    /// Derive the identity for a git URL and branch.
    ///
    /// # Errors
    ///
    /// Returns [`RepatchError::InvalidSourceUrl`] when the URL is empty
    /// or reduces to nothing after stripping the scheme and separators
    /// (e.g. `"https://"`). `name` identifies the offending dependency
    /// in the error.
    pub fn new(name: &str, url: &str, branch: &str) -> Result<Self, RepatchError> {
        let invalid = || RepatchError::InvalidSourceUrl {
            name: name.to_string(),
            url: url.to_string(),
        };

        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let stripped = trimmed.strip_suffix(".git").unwrap_or(trimmed);

        // Keep everything after the transport scheme, if one is present
        let without_scheme = match stripped.split_once("://") {
            Some((_, rest)) => rest,
            None => stripped,
        };

        let without_trailing = without_scheme.trim_end_matches('/');
        if without_trailing.is_empty() {
            return Err(invalid());
        }

        let slug = without_trailing.replace(['/', '.'], "_");
        Ok(Self(format!("{slug}_{branch}")))
    }

    /// The identity as a string slice, usable as a directory name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_deterministic() {
        let a = RepoIdentity::new("dep", "https://example.com/x/y", "dev").unwrap();
        let b = RepoIdentity::new("dep", "https://example.com/x/y", "dev").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "example_com_x_y_dev");
    }

    #[test]
    fn test_different_branches_differ() {
        let dev = RepoIdentity::new("dep", "https://example.com/x/y", "dev").unwrap();
        let stable = RepoIdentity::new("dep", "https://example.com/x/y", "stable").unwrap();
        assert_ne!(dev, stable);
    }

    #[test]
    fn test_git_suffix_and_trailing_slash_stripped() {
        let plain = RepoIdentity::new("dep", "https://github.com/org/repo", "master").unwrap();
        let suffixed = RepoIdentity::new("dep", "https://github.com/org/repo.git", "master").unwrap();
        let slashed = RepoIdentity::new("dep", "https://github.com/org/repo/", "master").unwrap();
        assert_eq!(plain, suffixed);
        assert_eq!(plain, slashed);
    }

    #[test]
    fn test_scheme_is_ignored() {
        let https = RepoIdentity::new("dep", "https://example.com/x", "master").unwrap();
        let git = RepoIdentity::new("dep", "git://example.com/x", "master").unwrap();
        assert_eq!(https, git);
    }

    #[test]
    fn test_local_path_urls_work() {
        let id = RepoIdentity::new("dep", "/srv/mirrors/upstream", "master").unwrap();
        assert_eq!(id.as_str(), "_srv_mirrors_upstream_master");
    }

    #[test]
    fn test_empty_and_scheme_only_urls_fail() {
        assert!(matches!(
            RepoIdentity::new("dep", "", "master"),
            Err(RepatchError::InvalidSourceUrl { .. })
        ));
        assert!(matches!(
            RepoIdentity::new("dep", "   ", "master"),
            Err(RepatchError::InvalidSourceUrl { .. })
        ));
        assert!(matches!(
            RepoIdentity::new("dep", "https://", "master"),
            Err(RepatchError::InvalidSourceUrl { .. })
        ));
    }
}
