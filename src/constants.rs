//! Global constants used throughout the repatch codebase.
//!
//! Defining filenames and defaults centrally keeps magic strings
//! discoverable and consistent between the resolver, the cache, and the
//! CLI surface.

/// Filename of the manifests this tool reads and patches.
pub const MANIFEST_FILENAME: &str = "Cargo.toml";

/// Directory name for materialized clones, created next to the root
/// manifest unless overridden with `--clones-dir`.
pub const DEFAULT_CLONES_DIR_NAME: &str = "patches_git_clones";

/// Branch name assumed when a dependency entry carries no `branch` key.
///
/// Checkout is skipped for this branch: the clone is used as fetched.
/// Override with `--default-branch` for repositories whose default branch
/// is named differently.
pub const DEFAULT_BRANCH: &str = "master";
