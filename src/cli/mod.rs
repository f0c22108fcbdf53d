//! Command-line interface for repatch.
//!
//! The CLI is a thin orchestrator over the library: it wires the
//! walker, cache, locator, and patch builder together and handles
//! output and logging. Two commands exist:
//!
//! - `resolve` - run the full pipeline against a root manifest and
//!   print (or write) the resulting `[patch]` directives
//! - `cache` - inspect or clean the clones directory
//!
//! Diagnostics go to stderr through `tracing` so stdout carries only
//! the patch output; `--verbose` and `--quiet` adjust the filter level.
//! Exit code is 0 on success and non-zero on any fatal error.

mod cache;
mod resolve;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Main CLI structure for repatch.
#[derive(Parser)]
#[command(
    name = "repatch",
    about = "Resolve git dependency overrides across Cargo manifests into local [patch] directives",
    version,
    long_about = "repatch clones every git-sourced dependency reachable from a root Cargo.toml \
                  (transitively, through the clones themselves) and emits [patch] blocks that \
                  redirect each dependency to its local clone directory."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging (git invocations, manifest
    /// scans, cache decisions).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all diagnostics except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Resolve git dependencies and emit [patch] directives.
    Resolve(resolve::ResolveCommand),

    /// Manage the clones directory.
    Cache(cache::CacheCommand),
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        self.init_tracing();

        match self.command {
            Commands::Resolve(cmd) => cmd.execute().await,
            Commands::Cache(cmd) => cmd.execute(),
        }
    }

    /// Initialize the tracing subscriber on stderr.
    ///
    /// `RUST_LOG` takes precedence when set; otherwise the level follows
    /// the verbosity flags. Logs always go to stderr so stdout stays
    /// clean for the patch output.
    fn init_tracing(&self) {
        let default_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}
