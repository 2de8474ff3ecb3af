//! fork-sync - Keep a GitHub fork in sync with its upstream parent
//!
//! fork-sync reads the fork's `origin` remote, asks the GitHub API for the
//! fork's parent, registers that parent as `upstream`, fetches it, merges or
//! rebases the local branch onto it and pushes the result back to `origin`.
//!
//! ## Modules
//!
//! - [`remote`]: Origin URL parsing
//! - [`github`]: Repository metadata, fork validation and the GitHub client
//! - [`git`]: Git command building and execution
//! - [`dry_run`]: Command projection without side effects
//! - [`sync`]: Step-by-step orchestration of a sync run
//! - [`config`]: File configuration and the per-run [`SyncConfig`]
//! - [`cli`]: Command-line flags
//! - [`error`]: Error kinds for every step

pub mod cli;
pub mod config;
pub mod dry_run;
pub mod error;
pub mod git;
pub mod github;
pub mod remote;
pub mod sync;

pub use config::{Config, SyncConfig, SyncStrategy};
pub use error::{CommandError, ParseError, SyncError};
pub use git::{build_sync_command, GitClient, GitCommand, GitRunner};
pub use github::{validate_fork, GitHubClient, RepositoryHost, RepositoryInfo};
pub use remote::{parse_remote_url, RepositoryIdentity};
pub use sync::{ForkSync, SyncOutcome};
