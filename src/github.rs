use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use std::env;
use std::process::Command;
use tracing::{debug, info, warn};

use crate::config::GitHubConfig;
use crate::error::{LookupError, NotAForkError};
use crate::remote::RepositoryIdentity;

/// Repository metadata as returned by `GET /repos/{owner}/{repo}`.
///
/// Only the fields fork-sync needs are modelled; everything else in the
/// response is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryInfo {
    pub full_name: String,
    pub fork: bool,
    /// Present only when `fork` is true
    #[serde(default)]
    pub parent: Option<ParentRepository>,
}

/// The repository a fork was created from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParentRepository {
    pub full_name: String,
    pub clone_url: String,
}

/// Reject repositories that are not forks
pub fn validate_fork(info: &RepositoryInfo) -> Result<(), NotAForkError> {
    if !info.fork {
        return Err(NotAForkError {
            full_name: info.full_name.clone(),
        });
    }
    Ok(())
}

/// Source of repository metadata
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Fetch metadata for a single repository
    async fn get_repository(
        &self,
        identity: &RepositoryIdentity,
    ) -> Result<RepositoryInfo, LookupError>;
}

/// GitHub client wrapper with authentication management
pub struct GitHubClient {
    client: Octocrab,
}

/// GitHub authentication strategies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Use GitHub CLI authentication
    GitHubCLI,
    /// Use environment variable token
    EnvironmentToken,
    /// Unauthenticated requests (public repositories only, low rate limit)
    Anonymous,
}

impl GitHubClient {
    /// Create a client for the configured host, authenticating if possible
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let (auth_strategy, token) = Self::detect_authentication(config)?;

        info!("Using authentication strategy: {:?}", auth_strategy);

        let mut builder = Octocrab::builder()
            .base_uri(config.api_base_url())
            .context("Invalid GitHub API URL")?;

        if let Some(token) = token {
            builder = builder.personal_token(token);
        }

        let client = builder.build().context("Failed to create GitHub client")?;

        Ok(Self { client })
    }

    /// Detect and obtain GitHub authentication
    fn detect_authentication(config: &GitHubConfig) -> Result<(AuthStrategy, Option<String>)> {
        match config.auth_method.as_str() {
            "auto" => {
                // Try GitHub CLI first, then environment token
                if let Ok(token) = Self::try_github_cli(&config.host) {
                    Ok((AuthStrategy::GitHubCLI, Some(token)))
                } else if let Ok(token) = Self::try_environment_token() {
                    Ok((AuthStrategy::EnvironmentToken, Some(token)))
                } else {
                    warn!(
                        "No GitHub authentication found, continuing unauthenticated. \
                         Run `gh auth login` or set GITHUB_TOKEN to avoid rate limits."
                    );
                    Ok((AuthStrategy::Anonymous, None))
                }
            }
            "gh_cli" => {
                let token = Self::try_github_cli(&config.host)
                    .context("GitHub CLI authentication failed. Run: gh auth login")?;
                Ok((AuthStrategy::GitHubCLI, Some(token)))
            }
            "token" => {
                let token = Self::try_environment_token()
                    .context("GITHUB_TOKEN environment variable not found or invalid")?;
                Ok((AuthStrategy::EnvironmentToken, Some(token)))
            }
            "none" => Ok((AuthStrategy::Anonymous, None)),
            other => Err(anyhow!("Unknown auth method: {}", other)),
        }
    }

    /// Try to get token from GitHub CLI
    fn try_github_cli(host: &str) -> Result<String> {
        debug!("Attempting GitHub CLI authentication");

        let token_output = Command::new("gh")
            .args(["auth", "token", "--hostname", host])
            .output()
            .context("Failed to run GitHub CLI")?;

        if !token_output.status.success() {
            return Err(anyhow!(
                "Failed to retrieve token from GitHub CLI: {}",
                String::from_utf8_lossy(&token_output.stderr).trim()
            ));
        }

        let token = String::from_utf8(token_output.stdout)
            .context("GitHub CLI token is not valid UTF-8")?
            .trim()
            .to_string();

        if token.is_empty() {
            return Err(anyhow!("GitHub CLI returned empty token"));
        }

        debug!("Successfully obtained token from GitHub CLI");
        Ok(token)
    }

    /// Try to get token from environment variable
    fn try_environment_token() -> Result<String> {
        debug!("Attempting environment variable authentication");

        let token = env::var("GITHUB_TOKEN").context("GITHUB_TOKEN environment variable not set")?;

        if token.trim().is_empty() {
            return Err(anyhow!("GITHUB_TOKEN is empty"));
        }

        Ok(token.trim().to_string())
    }
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    async fn get_repository(
        &self,
        identity: &RepositoryIdentity,
    ) -> Result<RepositoryInfo, LookupError> {
        let route = format!("/repos/{}/{}", identity.owner, identity.name);
        debug!("Fetching repository metadata: {}", route);

        self.client
            .get(route, None::<&()>)
            .await
            .map_err(|e| LookupError::new(identity.to_string(), e))
    }
}
