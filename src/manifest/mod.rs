//! Order-preserving Cargo.toml codec.
//!
//! This module is the only place that touches manifest syntax. It parses
//! a manifest with `toml_edit` (which keeps tables and keys in document
//! order), answers the three questions the resolver asks - what package
//! does this manifest declare, is it a workspace root, and which of its
//! dependency entries carry a git source - and owns the [`Scalar`] type
//! used to re-serialize passthrough fields with literal TOML formatting.
//!
//! Dependency entries that are plain version strings, or tables without
//! a `git` key, carry no source reference and are ignored. A manifest
//! with neither a `[dependencies]` nor a `[dev-dependencies]` table
//! contributes zero entries; that is logged, never failed.

use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item, TableLike};

use crate::core::RepatchError;

/// The dependency tables scanned for git references, in scan order.
const DEPENDENCY_TABLES: [&str; 2] = ["dependencies", "dev-dependencies"];

/// A scalar TOML value carried through from a dependency entry to its
/// patch line.
///
/// The tag preserves the original type so serialization needs no
/// runtime inspection: strings are quoted, booleans and integers are
/// rendered bare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// A string value, rendered quoted
    Str(String),
    /// A boolean value, rendered as bare `true`/`false`
    Bool(bool),
    /// An integer value, rendered as a bare numeral
    Int(i64),
}

impl Scalar {
    /// Convert a TOML item into a scalar, if it is one.
    ///
    /// Arrays, tables, floats, and datetimes return `None`; the caller
    /// skips them (an override line only carries scalar fields).
    fn from_item(item: &Item) -> Option<Self> {
        if let Some(s) = item.as_str() {
            Some(Self::Str(s.to_string()))
        } else if let Some(b) = item.as_bool() {
            Some(Self::Bool(b))
        } else {
            item.as_integer().map(Self::Int)
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

/// A dependency entry carrying a git source reference.
///
/// Constructed only for manifest entries with a `git` key; entries
/// without one are irrelevant to override resolution and never leave
/// the codec. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitDependency {
    /// The dependency key in the manifest table
    pub name: String,
    /// The raw git source URL, exactly as written in the manifest
    pub url: String,
    /// The branch to materialize; filled with the configured default
    /// branch when the entry has no `branch` key
    pub branch: String,
    /// Explicit package name override (`package = "..."`), if any
    pub package: Option<String>,
    /// Remaining scalar fields of the entry in document order,
    /// excluding `git`, `branch`, and `package`
    pub extra: Vec<(String, Scalar)>,
}

impl GitDependency {
    /// The effective package name to look up inside the clone: the
    /// explicit `package` override if present, else the dependency key.
    pub fn package_name(&self) -> &str {
        self.package.as_deref().unwrap_or(&self.name)
    }
}

/// A parsed manifest file.
#[derive(Debug)]
pub struct Manifest {
    path: PathBuf,
    doc: DocumentMut,
}

impl Manifest {
    /// Load and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`RepatchError::ConfigError`] if the file cannot be read
    /// and [`RepatchError::ManifestParseError`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RepatchError::ConfigError {
            message: format!("Cannot read manifest {}: {e}", path.display()),
        })?;

        let doc: DocumentMut =
            content.parse().map_err(|e: toml_edit::TomlError| RepatchError::ManifestParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            doc,
        })
    }

    /// Path this manifest was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The package name declared by `[package].name`, if any.
    pub fn package_name(&self) -> Option<&str> {
        self.doc
            .get("package")
            .and_then(Item::as_table_like)
            .and_then(|t| t.get("name"))
            .and_then(Item::as_str)
    }

    /// Whether this manifest has a top-level `[workspace]` table.
    ///
    /// Workspace roots declare no package identity of their own; they
    /// are never a resolution target and the walker does not scan them,
    /// though their member manifests remain reachable on disk.
    pub fn is_workspace_root(&self) -> bool {
        self.doc.get("workspace").is_some()
    }

    /// Extract every dependency entry carrying a git source reference,
    /// merging `[dependencies]` and `[dev-dependencies]` in document
    /// order.
    ///
    /// Entries without a `branch` key get `default_branch`. Extra fields
    /// keep their document order; non-scalar extras are dropped with a
    /// warning since an override line cannot carry them.
    pub fn git_dependencies(&self, default_branch: &str) -> Vec<GitDependency> {
        let tables: Vec<&dyn TableLike> = DEPENDENCY_TABLES
            .iter()
            .filter_map(|name| self.doc.get(*name).and_then(Item::as_table_like))
            .collect();

        if tables.is_empty() {
            tracing::warn!("Manifest {} has no dependency tables", self.path.display());
            return Vec::new();
        }

        let mut deps = Vec::new();
        for table in tables {
            for (name, item) in table.iter() {
                if let Some(dep) = self.git_entry(name, item, default_branch) {
                    deps.push(dep);
                }
            }
        }
        deps
    }

    /// Build a [`GitDependency`] from one entry, or `None` if the entry
    /// carries no git reference.
    fn git_entry(&self, name: &str, item: &Item, default_branch: &str) -> Option<GitDependency> {
        // Plain version strings have no table and no source reference
        let table = item.as_table_like()?;
        let url = table.get("git").and_then(Item::as_str)?.to_string();

        let branch = table
            .get("branch")
            .and_then(Item::as_str)
            .unwrap_or(default_branch)
            .to_string();

        let package = table.get("package").and_then(Item::as_str).map(str::to_string);

        let mut extra = Vec::new();
        for (key, value) in table.iter() {
            if key == "git" || key == "branch" || key == "package" {
                continue;
            }
            match Scalar::from_item(value) {
                Some(scalar) => extra.push((key.to_string(), scalar)),
                None => {
                    tracing::warn!(
                        "Dropping non-scalar field '{}' of dependency '{}' in {}",
                        key,
                        name,
                        self.path.display()
                    );
                }
            }
        }

        Some(GitDependency {
            name: name.to_string(),
            url,
            branch,
            package,
            extra,
        })
    }
}
