//! Command-line flags
//!
//! Flags are layered over the `defaults` section of the config file and
//! resolved into a [`SyncConfig`] once, before anything runs.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{DefaultsConfig, SyncConfig};

const EXAMPLES: &str = "\
Examples:
  # Sync main branch with upstream
  $ fork-sync

  # Sync a specific branch
  $ fork-sync --upstream-branch develop --origin-branch develop

  # Rebase instead of merge
  $ fork-sync --rebase

  # Force push the changes
  $ fork-sync --force

  # Preview the commands without executing them
  $ fork-sync --dry-run";

#[derive(Parser, Debug)]
#[command(name = "fork-sync")]
#[command(about = "Sync your fork with the upstream repository")]
#[command(version)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Branch to sync from upstream [default: main]
    #[arg(long, value_name = "BRANCH")]
    pub upstream_branch: Option<String>,

    /// Local branch to update [default: main]
    #[arg(long, value_name = "BRANCH")]
    pub origin_branch: Option<String>,

    /// Rebase instead of merge
    #[arg(long)]
    pub rebase: bool,

    /// Force push to origin
    #[arg(long)]
    pub force: bool,

    /// Print commands without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Configuration file path (defaults to XDG config location)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the flags against the configured defaults
    pub fn sync_config(&self, defaults: &DefaultsConfig) -> SyncConfig {
        let base = SyncConfig::from_defaults(defaults);

        SyncConfig {
            upstream_branch: self
                .upstream_branch
                .clone()
                .unwrap_or(base.upstream_branch),
            origin_branch: self.origin_branch.clone().unwrap_or(base.origin_branch),
            rebase: self.rebase || base.rebase,
            force_push: self.force || base.force_push,
            dry_run: self.dry_run,
        }
    }
}
