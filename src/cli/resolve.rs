//! The `resolve` command: the full discovery/materialize/locate/build
//! pipeline.
//!
//! This is the thin orchestrator over the library modules. The order of
//! failure matters: the root manifest is validated before any git
//! activity, and no output is produced unless the entire pipeline
//! completed - there is no partial-success mode.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cache::Cache;
use crate::constants::{DEFAULT_BRANCH, DEFAULT_CLONES_DIR_NAME};
use crate::core::RepatchError;
use crate::git::ensure_git_available;
use crate::patch::PatchSet;
use crate::resolver::{Walker, locator};

/// Resolve git dependencies reachable from a root manifest and emit
/// grouped `[patch]` directives.
#[derive(Args)]
pub struct ResolveCommand {
    /// Path to the root Cargo.toml.
    manifest: PathBuf,

    /// Re-clone every reachable source even if already materialized.
    #[arg(long)]
    force: bool,

    /// Write the patch directives to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for materialized clones (default: `patches_git_clones`
    /// next to the root manifest).
    #[arg(long)]
    clones_dir: Option<PathBuf>,

    /// Branch name treated as "use the clone as fetched": checkout is
    /// skipped for dependencies pinned to it.
    #[arg(long, default_value = DEFAULT_BRANCH)]
    default_branch: String,
}

impl ResolveCommand {
    /// Run the resolve pipeline.
    pub async fn execute(self) -> Result<()> {
        let manifest_path = self.manifest;
        if !manifest_path.is_file() {
            return Err(RepatchError::ConfigError {
                message: format!("Root manifest not found: {}", manifest_path.display()),
            }
            .into());
        }

        ensure_git_available().await?;

        let root_dir = manifest_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let clones_dir =
            self.clones_dir.unwrap_or_else(|| root_dir.join(DEFAULT_CLONES_DIR_NAME));

        let cache = Cache::new(clones_dir, self.default_branch);
        let walker = Walker::new(&cache, self.force);
        let discovery = walker.discover(&manifest_path).await?;

        let mut patch = PatchSet::new();
        for dep in discovery.specs() {
            let repo = discovery.repo_for(dep)?;
            let local_dir = locator::locate(repo, dep.package_name())?;
            tracing::debug!("Located '{}' at {}", dep.package_name(), local_dir.display());
            patch.insert(dep, &local_dir);
        }

        if patch.is_empty() {
            tracing::info!("No git dependencies found; nothing to patch");
        } else {
            tracing::info!(
                "Built {} patch group(s) for {} dependencies",
                patch.group_count(),
                discovery.specs().len()
            );
        }

        let text = patch.render();
        match self.output {
            Some(path) => {
                std::fs::write(&path, &text)
                    .with_context(|| format!("Failed to write output: {}", path.display()))?;
                tracing::info!("Wrote patch directives to {}", path.display());
            }
            None => print!("{text}"),
        }

        Ok(())
    }
}
