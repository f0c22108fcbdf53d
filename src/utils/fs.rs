//! File discovery and directory helpers.
//!
//! Manifest discovery walks a materialized clone with `walkdir` and
//! returns every `Cargo.toml` in a deterministic (sorted) order, which
//! keeps traversal and patch output stable across runs.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::MANIFEST_FILENAME;

/// Create a directory and all parent directories if they don't exist.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Recursively find every manifest file under `root`.
///
/// `.git` directories are skipped; results are sorted by path so the
/// caller's traversal order is deterministic.
pub fn find_manifests(root: &Path) -> Result<Vec<PathBuf>> {
    let mut manifests = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");

    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to walk directory: {}", root.display()))?;
        if entry.file_type().is_file() && entry.file_name() == MANIFEST_FILENAME {
            manifests.push(entry.into_path());
        }
    }

    Ok(manifests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_find_manifests_recursive_and_sorted() {
        let temp = tempdir().unwrap();
        let root = temp.path();

        ensure_dir(&root.join("crates/b")).unwrap();
        ensure_dir(&root.join("crates/a")).unwrap();
        fs::write(root.join("Cargo.toml"), "[package]\nname = \"root\"\n").unwrap();
        fs::write(root.join("crates/b/Cargo.toml"), "[package]\nname = \"b\"\n").unwrap();
        fs::write(root.join("crates/a/Cargo.toml"), "[package]\nname = \"a\"\n").unwrap();
        fs::write(root.join("crates/a/notes.txt"), "").unwrap();

        let manifests = find_manifests(root).unwrap();
        assert_eq!(manifests.len(), 3);
        assert!(manifests[1].ends_with("crates/a/Cargo.toml"));
        assert!(manifests[2].ends_with("crates/b/Cargo.toml"));
    }

    #[test]
    fn test_find_manifests_skips_git_dir() {
        let temp = tempdir().unwrap();
        let root = temp.path();

        ensure_dir(&root.join(".git/modules")).unwrap();
        fs::write(root.join(".git/modules/Cargo.toml"), "").unwrap();
        fs::write(root.join("Cargo.toml"), "[package]\nname = \"root\"\n").unwrap();

        let manifests = find_manifests(root).unwrap();
        assert_eq!(manifests.len(), 1);
    }

    #[test]
    fn test_ensure_dir_idempotent() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("nested/deeply");
        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }
}
