//! Sync orchestration
//!
//! Drives one fork synchronization from start to finish: resolve the origin
//! repository, confirm it is a fork, register and fetch its parent as
//! `upstream`, merge or rebase, and push back to `origin`. Each step runs only
//! after the previous one succeeded; the first failure ends the run.

use std::io::Write;
use tracing::{debug, info};

use crate::config::{SyncConfig, SyncStrategy};
use crate::dry_run::{print_dry_run, PLACEHOLDER_UPSTREAM_URL};
use crate::error::{LookupError, SyncError};
use crate::git::{build_sync_command, GitCommand, GitRunner};
use crate::github::{validate_fork, RepositoryHost};
use crate::remote::{parse_remote_url_for_host, RepositoryIdentity, DEFAULT_HOST};

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Commands were printed, nothing was executed
    DryRun,
    /// The fork was updated and pushed
    Synced {
        repository: String,
        parent: String,
        strategy: SyncStrategy,
        upstream_ref: String,
        origin_branch: String,
    },
}

/// Runs a single fork synchronization against the given collaborators
pub struct ForkSync<'a, G: ?Sized, H: ?Sized> {
    config: &'a SyncConfig,
    git: &'a G,
    host: &'a H,
    host_name: String,
}

impl<'a, G, H> ForkSync<'a, G, H>
where
    G: GitRunner + ?Sized,
    H: RepositoryHost + ?Sized,
{
    pub fn new(config: &'a SyncConfig, git: &'a G, host: &'a H) -> Self {
        Self {
            config,
            git,
            host,
            host_name: DEFAULT_HOST.to_string(),
        }
    }

    /// Host name expected in the origin URL (defaults to github.com)
    pub fn with_host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = host_name.into();
        self
    }

    /// Run the sync, writing progress lines to `out`.
    ///
    /// On failure the error line (and, for a failed merge or rebase, the
    /// abort hint) is written before the error is returned.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<SyncOutcome, SyncError> {
        match self.execute(out).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                report_failure(&err, out);
                Err(err)
            }
        }
    }

    async fn execute<W: Write>(&self, out: &mut W) -> Result<SyncOutcome, SyncError> {
        if self.config.dry_run {
            info!("Dry run requested, no commands will be executed");
            print_dry_run(self.config, PLACEHOLDER_UPSTREAM_URL, out)?;
            return Ok(SyncOutcome::DryRun);
        }

        let identity = self.resolve_origin().await?;
        info!("Origin repository: {}", identity);

        let repo = self.host.get_repository(&identity).await?;
        validate_fork(&repo)?;
        let parent = repo.parent.clone().ok_or_else(|| {
            LookupError::new(
                repo.full_name.clone(),
                "fork metadata does not include a parent repository",
            )
        })?;
        writeln!(
            out,
            "✓ Detected fork: {} (parent: {})",
            repo.full_name, parent.full_name
        )?;

        self.register_upstream(&parent.clone_url).await?;

        self.git
            .run(&GitCommand::fetch_upstream())
            .await
            .map_err(SyncError::Fetch)?;
        writeln!(out, "✓ Fetched upstream")?;

        let strategy = self.config.strategy();
        let upstream_ref = self.config.upstream_ref();
        let sync_command = build_sync_command(self.config, &self.config.upstream_branch);
        info!("Integrating {} with {}", upstream_ref, strategy);
        self.git
            .run(&sync_command)
            .await
            .map_err(|source| SyncError::Integration { strategy, source })?;
        writeln!(out, "✓ {}", strategy.completed(&upstream_ref))?;

        self.git
            .run(&GitCommand::push(self.config))
            .await
            .map_err(SyncError::Push)?;
        writeln!(out, "✓ Pushed to origin/{}", self.config.origin_branch)?;

        Ok(SyncOutcome::Synced {
            repository: repo.full_name,
            parent: parent.full_name,
            strategy,
            upstream_ref,
            origin_branch: self.config.origin_branch.clone(),
        })
    }

    async fn resolve_origin(&self) -> Result<RepositoryIdentity, SyncError> {
        let output = self
            .git
            .execute(&GitCommand::origin_url())
            .await
            .map_err(SyncError::OriginRemote)?;

        Ok(parse_remote_url_for_host(&output.stdout, &self.host_name)?)
    }

    async fn register_upstream(&self, clone_url: &str) -> Result<(), SyncError> {
        match self.git.run(&GitCommand::add_upstream(clone_url)).await {
            Ok(()) => {
                info!("Added upstream remote: {}", clone_url);
                Ok(())
            }
            Err(err) if err.remote_already_exists() => {
                debug!("Upstream remote already configured, reusing it");
                Ok(())
            }
            Err(err) => Err(SyncError::RemoteAdd(err)),
        }
    }
}

fn report_failure<W: Write>(err: &SyncError, out: &mut W) {
    let _ = writeln!(out, "{}", err.user_message());
    if let SyncError::Integration { strategy, .. } = err {
        let _ = writeln!(out, "{}", strategy.abort_hint());
    }
}
