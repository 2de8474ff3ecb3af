//! Error types for fork synchronization.
//!
//! Every step of a sync run has its own error kind so the binary can report
//! a precise message and exit with a code that scripts can branch on.

use std::fmt;

use thiserror::Error;

use crate::config::SyncStrategy;

/// Failure to extract an owner/repository pair from a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The URL is neither the SSH nor the HTTPS shape for the configured host.
    #[error("unsupported origin URL format: {url}")]
    UnsupportedUrlFormat { url: String },

    /// The URL has the right shape but no usable owner or repository name.
    #[error("failed to parse owner/repo from URL: {url}")]
    MalformedUrl { url: String },
}

/// Failure to fetch repository metadata from the hosting API.
#[derive(Debug, Error)]
#[error("failed to get repo info for {repository}: {source}")]
pub struct LookupError {
    pub repository: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl LookupError {
    pub fn new(
        repository: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            repository: repository.into(),
            source: source.into(),
        }
    }
}

/// The origin repository is not a fork, so there is no parent to sync from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("repository {full_name} isn't a fork")]
pub struct NotAForkError {
    pub full_name: String,
}

/// Why an external command did not succeed.
#[derive(Debug)]
pub enum CommandFailure {
    /// The program could not be started at all.
    Spawn(std::io::Error),
    /// The program ran and exited unsuccessfully.
    Exit { code: Option<i32> },
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandFailure::Spawn(err) => write!(f, "{}", err),
            CommandFailure::Exit { code: Some(code) } => write!(f, "exit status {}", code),
            CommandFailure::Exit { code: None } => write!(f, "terminated by signal"),
        }
    }
}

impl std::error::Error for CommandFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandFailure::Spawn(err) => Some(err),
            CommandFailure::Exit { .. } => None,
        }
    }
}

/// A git command failed. Carries the command's description and everything it
/// printed so the user can see what went wrong.
#[derive(Debug)]
pub struct CommandError {
    pub description: String,
    pub cause: CommandFailure,
    pub output: String,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.description, self.cause)?;
        if !self.output.trim().is_empty() {
            write!(f, "\nOutput: {}", self.output)?;
        }
        Ok(())
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

impl CommandError {
    /// True when git refused to add a remote because one with that name is
    /// already configured.
    pub fn remote_already_exists(&self) -> bool {
        self.output.contains("already exists")
    }
}

/// Top-level error for a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to get origin remote: {0}")]
    OriginRemote(#[source] CommandError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    NotAFork(#[from] NotAForkError),

    #[error(transparent)]
    RemoteAdd(CommandError),

    #[error(transparent)]
    Fetch(CommandError),

    #[error("{source}")]
    Integration {
        strategy: SyncStrategy,
        #[source]
        source: CommandError,
    },

    #[error(transparent)]
    Push(CommandError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl SyncError {
    /// Process exit code for this failure kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::OriginRemote(_) | SyncError::Parse(_) => 2,
            SyncError::Lookup(_) => 3,
            SyncError::NotAFork(_) => 4,
            SyncError::RemoteAdd(_) => 5,
            SyncError::Fetch(_) => 6,
            SyncError::Integration { .. } => 7,
            SyncError::Push(_) => 8,
            SyncError::Output(_) => 1,
        }
    }

    /// The line printed to the user when the run stops on this error.
    pub fn user_message(&self) -> String {
        match self {
            SyncError::NotAFork(err) => format!("✗ {}", err),
            SyncError::RemoteAdd(err)
            | SyncError::Fetch(err)
            | SyncError::Push(err)
            | SyncError::Integration { source: err, .. } => format!("✗ Error while {}", err),
            other => format!("✗ Error: {}", other),
        }
    }
}
