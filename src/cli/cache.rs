//! The `cache` command: inspect or clean the clones directory.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cache::Cache;
use crate::constants::{DEFAULT_BRANCH, DEFAULT_CLONES_DIR_NAME};
use crate::core::RepatchError;

/// Manage the materialized-clones directory.
#[derive(Args)]
pub struct CacheCommand {
    #[command(subcommand)]
    command: CacheSubcommand,

    /// Path to the root Cargo.toml whose clones directory to manage.
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// Clones directory to manage directly.
    #[arg(long, global = true, conflicts_with = "manifest")]
    clones_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum CacheSubcommand {
    /// Show the number and total size of materialized clones.
    Info,
    /// Remove every materialized clone.
    Clean,
}

impl CacheCommand {
    /// Execute the cache subcommand.
    pub fn execute(self) -> Result<()> {
        let clones_dir = match (self.clones_dir, &self.manifest) {
            (Some(dir), _) => dir,
            (None, Some(manifest)) => {
                let root_dir = manifest
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("."));
                root_dir.join(DEFAULT_CLONES_DIR_NAME)
            }
            (None, None) => {
                return Err(RepatchError::ConfigError {
                    message: "Pass --manifest or --clones-dir to select the cache".to_string(),
                }
                .into());
            }
        };

        let cache = Cache::new(clones_dir, DEFAULT_BRANCH);

        match self.command {
            CacheSubcommand::Info => {
                let count = cache.clone_count()?;
                let size = cache.size()?;
                println!("Location: {}", cache.clones_dir().display());
                println!("Clones: {count}");
                println!("Size: {}", format_size(size));
            }
            CacheSubcommand::Clean => {
                let removed = cache.clear()?;
                println!("Removed {removed} clone(s) from {}", cache.clones_dir().display());
            }
        }

        Ok(())
    }
}

/// Human-readable byte size.
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
