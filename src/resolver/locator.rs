//! Package locator.
//!
//! Maps a package name to the unique directory inside a materialized
//! clone whose manifest declares it. Exactly one match is required:
//! zero or multiple matches abort the run - the resolver never guesses.

use anyhow::Result;
use std::path::PathBuf;

use crate::cache::MaterializedRepo;
use crate::core::RepatchError;
use crate::manifest::Manifest;

/// Find the directory of the manifest declaring `package_name` inside
/// `repo`.
///
/// # Errors
///
/// [`RepatchError::PackageNotFound`] when no manifest declares the
/// name, [`RepatchError::AmbiguousPackage`] when several do. Manifest
/// parse failures inside the clone propagate as-is.
pub fn locate(repo: &MaterializedRepo, package_name: &str) -> Result<PathBuf> {
    let mut matches: Vec<PathBuf> = Vec::new();

    for manifest_path in &repo.manifests {
        let manifest = Manifest::load(manifest_path)?;

        match manifest.package_name() {
            Some(name) if name == package_name => {
                let Some(dir) = manifest_path.parent() else {
                    continue;
                };
                matches.push(dir.to_path_buf());
            }
            Some(_) => {}
            None => {
                if !manifest.is_workspace_root() {
                    tracing::warn!(
                        "Manifest {} declares no package name",
                        manifest_path.display()
                    );
                }
            }
        }
    }

    match matches.as_slice() {
        [] => Err(RepatchError::PackageNotFound {
            name: package_name.to_string(),
            identity: repo.identity.to_string(),
        }
        .into()),
        [unique] => Ok(unique.clone()),
        many => Err(RepatchError::AmbiguousPackage {
            name: package_name.to_string(),
            identity: repo.identity.to_string(),
            candidates: many.iter().map(|p| p.display().to_string()).collect(),
        }
        .into()),
    }
}
