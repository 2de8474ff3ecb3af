use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command as AsyncCommand;
use tracing::debug;

use crate::config::{GitConfig, SyncConfig};
use crate::error::{CommandError, CommandFailure};

/// Name of the remote pointing at the fork
pub const ORIGIN: &str = "origin";
/// Name of the remote pointing at the fork's parent
pub const UPSTREAM: &str = "upstream";

/// A git invocation plus a label used when reporting its failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    pub args: Vec<String>,
    pub description: String,
}

impl GitCommand {
    pub fn new<I, S>(args: I, description: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            description: description.into(),
        }
    }

    /// `git remote get-url origin`
    pub fn origin_url() -> Self {
        Self::new(["remote", "get-url", ORIGIN], "reading origin remote")
    }

    /// `git remote add upstream <url>`
    pub fn add_upstream(clone_url: &str) -> Self {
        Self::new(
            ["remote", "add", UPSTREAM, clone_url],
            "adding upstream remote",
        )
    }

    /// `git remote remove <name>`
    pub fn remove_remote(name: &str) -> Self {
        Self::new(
            ["remote", "remove", name],
            format!("removing {} remote", name),
        )
    }

    /// `git fetch upstream`
    pub fn fetch_upstream() -> Self {
        Self::new(["fetch", UPSTREAM], "fetching upstream")
    }

    /// `git push [-f] origin HEAD:<origin_branch>`
    pub fn push(config: &SyncConfig) -> Self {
        let mut args = vec!["push".to_string()];
        if config.force_push {
            args.push("-f".to_string());
        }
        args.push(ORIGIN.to_string());
        args.push(format!("HEAD:{}", config.origin_branch));

        Self::new(args, format!("pushing to origin/{}", config.origin_branch))
    }

    /// The command line as a user would type it
    pub fn display(&self) -> String {
        std::iter::once("git")
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Build the merge or rebase command that integrates upstream.
///
/// An empty `upstream_branch` leaves the target out so git resolves the
/// upstream remote's default branch.
pub fn build_sync_command(config: &SyncConfig, upstream_branch: &str) -> GitCommand {
    let strategy = config.strategy();
    let mut args = vec![strategy.verb().to_string(), UPSTREAM.to_string()];
    if !upstream_branch.is_empty() {
        args.push(format!("{}/{}", UPSTREAM, upstream_branch));
    }

    GitCommand::new(args, strategy.description())
}

/// Captured output of a finished git command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Standard output followed by standard error
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Executes git commands
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run a command to completion and return what it printed
    async fn execute(&self, command: &GitCommand) -> Result<CommandOutput, CommandError>;

    /// Run a command, discarding its output on success
    async fn run(&self, command: &GitCommand) -> Result<(), CommandError> {
        self.execute(command).await.map(|_| ())
    }
}

/// Runs the real git executable
#[derive(Debug, Clone)]
pub struct GitClient {
    binary: PathBuf,
    working_dir: Option<PathBuf>,
}

impl GitClient {
    /// Create a client for the given git binary, run in the current directory
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            working_dir: None,
        }
    }

    /// Resolve the configured git binary and make sure it can be started
    pub async fn locate(config: &GitConfig) -> Result<Self, CommandError> {
        let client = Self::new(&config.binary);
        let version = client
            .execute(&GitCommand::new(["--version"], "looking for git"))
            .await?;
        debug!("Using {} ({})", config.binary, version.stdout.trim());
        Ok(client)
    }

    /// Run all commands inside `dir` instead of the current directory
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

#[async_trait]
impl GitRunner for GitClient {
    async fn execute(&self, command: &GitCommand) -> Result<CommandOutput, CommandError> {
        debug!("Running: {}", command.display());

        let mut process = AsyncCommand::new(&self.binary);
        process.args(&command.args);
        if let Some(dir) = &self.working_dir {
            process.current_dir(dir);
        }

        let output = process.output().await.map_err(|e| CommandError {
            description: command.description.clone(),
            cause: CommandFailure::Spawn(e),
            output: String::new(),
        })?;

        let captured = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            return Err(CommandError {
                description: command.description.clone(),
                cause: CommandFailure::Exit {
                    code: output.status.code(),
                },
                output: captured.combined(),
            });
        }

        Ok(captured)
    }
}
