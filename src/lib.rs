//! repatch - git dependency override resolver for Cargo workspaces
//!
//! `repatch` rebuilds a multi-package project against forked or patched
//! upstream sources. Starting from a root `Cargo.toml`, it discovers every
//! dependency that carries a `git` source reference - transitively, by
//! cloning each referenced repository and scanning the manifests inside the
//! clone for further git references - then emits `[patch."<url>"]` blocks
//! that redirect each dependency to its local clone directory.
//!
//! # Architecture Overview
//!
//! The pipeline is strictly sequential:
//!
//! 1. The [`resolver`] walker reads the root manifest and collects every
//!    dependency entry with a `git` key (direct and dev-dependencies alike).
//! 2. The [`cache`] materializes each distinct `(url, branch)` identity
//!    exactly once per run into a deterministic on-disk directory,
//!    reusing existing clones unless `--force` is given.
//! 3. The walker recurses into every non-workspace manifest found inside
//!    each new clone, so sub-packages of a forked upstream can declare
//!    their own further git overrides.
//! 4. The [`resolver::locator`] maps each discovered dependency to the
//!    unique directory inside its clone whose manifest declares the
//!    dependency's package name.
//! 5. The [`patch`] builder groups the results by raw source URL and
//!    renders literal `[patch]` TOML blocks.
//!
//! Any failure along the way - clone, checkout, parse, or locate - aborts
//! the whole run; no partial patch output is ever produced.
//!
//! # Core Modules
//!
//! - [`cache`] - on-disk clone cache keyed by repository identity
//! - [`cli`] - command-line interface (`resolve`, `cache`)
//! - [`core`] - error types and user-facing error contexts
//! - [`git`] - git operations wrapper using the system git command
//! - [`manifest`] - order-preserving Cargo.toml codec
//! - [`patch`] - `[patch]` directive builder and renderer
//! - [`resolver`] - dependency graph walker and package locator
//! - [`source`] - normalized repository identity derivation
//!
//! # Example
//!
//! A root manifest containing
//!
//! ```toml
//! [dependencies]
//! pallet-foo = { git = "https://example.com/x/y", branch = "dev", package = "foo-crate" }
//! ```
//!
//! resolves to
//!
//! ```toml
//! [patch."https://example.com/x/y"]
//! pallet-foo = { path = "/path/to/clones/example_com_x_y_dev/crates/foo-crate" }
//! ```

pub mod cache;
pub mod cli;
pub mod constants;
pub mod core;
pub mod git;
pub mod manifest;
pub mod patch;
pub mod resolver;
pub mod source;
pub mod utils;
