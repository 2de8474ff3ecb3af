use anyhow::{anyhow, Context, Result};
use dirs::config_dir;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// File-based configuration for fork-sync.
///
/// Everything here is optional; the built-in defaults reproduce the behaviour
/// of running without a config file.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// GitHub host and authentication settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Git executable settings
    #[serde(default)]
    pub git: GitConfig,

    /// Defaults for the command-line flags
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub configuration
#[derive(Debug, Deserialize, Clone)]
pub struct GitHubConfig {
    /// Host name that appears in remote URLs
    #[serde(default = "default_host")]
    pub host: String,

    /// REST API base URL (derived from `host` if not set)
    pub api_url: Option<String>,

    /// Authentication method
    #[serde(default = "default_auth_method")]
    pub auth_method: String, // "auto", "gh_cli", "token", "none"
}

/// Git executable configuration
#[derive(Debug, Deserialize, Clone)]
pub struct GitConfig {
    /// Path or name of the git binary
    #[serde(default = "default_git_binary")]
    pub binary: String,
}

/// Default values for the sync flags
#[derive(Debug, Deserialize, Clone)]
pub struct DefaultsConfig {
    #[serde(default = "default_branch")]
    pub upstream_branch: String,

    #[serde(default = "default_branch")]
    pub origin_branch: String,

    #[serde(default)]
    pub rebase: bool,

    #[serde(default)]
    pub force_push: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_host() -> String {
    "github.com".to_string()
}
fn default_auth_method() -> String {
    "auto".to_string()
}
fn default_git_binary() -> String {
    "git".to_string()
}
fn default_branch() -> String {
    "main".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_url: None,
            auth_method: default_auth_method(),
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: default_git_binary(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            upstream_branch: default_branch(),
            origin_branch: default_branch(),
            rebase: false,
            force_push: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl GitHubConfig {
    /// REST API base URL for the configured host
    pub fn api_base_url(&self) -> String {
        match &self.api_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None if self.host == "github.com" => "https://api.github.com".to_string(),
            None => format!("https://{}/api/v3", self.host),
        }
    }
}

impl Config {
    /// Load configuration from the default location, falling back to defaults
    /// when no file exists there
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            tracing::debug!("No configuration at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.expand_paths()?;
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path (XDG compliant)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to get user config directory")?;

        Ok(config_dir.join("fork-sync").join("config.yml"))
    }

    /// Expand environment variables and `~` in the git binary path
    pub fn expand_paths(&mut self) -> Result<()> {
        self.git.binary = shellexpand::full(&self.git.binary)
            .context("Failed to expand git.binary path")?
            .into_owned();

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        match self.github.auth_method.as_str() {
            "auto" | "gh_cli" | "token" | "none" => {}
            other => return Err(anyhow!("Unknown auth method: {}", other)),
        }
        if self.github.host.trim().is_empty() {
            return Err(anyhow!("github.host must not be empty"));
        }
        Ok(())
    }
}

/// How upstream changes are brought into the local branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    Merge,
    Rebase,
}

impl SyncStrategy {
    /// The git subcommand for this strategy
    pub fn verb(self) -> &'static str {
        match self {
            SyncStrategy::Merge => "merge",
            SyncStrategy::Rebase => "rebase",
        }
    }

    /// Label used when reporting a failed integration
    pub fn description(self) -> &'static str {
        match self {
            SyncStrategy::Merge => "merging upstream",
            SyncStrategy::Rebase => "rebasing onto upstream",
        }
    }

    /// Advisory text telling the user how to back out of a failed integration
    pub fn abort_hint(self) -> &'static str {
        match self {
            SyncStrategy::Merge => "To abort the merge, run: git merge --abort",
            SyncStrategy::Rebase => "To abort the rebase, run: git rebase --abort",
        }
    }

    /// Past-tense summary for the success line
    pub fn completed(self, upstream_ref: &str) -> String {
        match self {
            SyncStrategy::Merge => format!("Merged {}", upstream_ref),
            SyncStrategy::Rebase => format!("Rebased onto {}", upstream_ref),
        }
    }
}

impl fmt::Display for SyncStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Settings for a single sync run, resolved once at startup and only ever
/// read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Branch on the parent to integrate from. Empty means "let git pick".
    pub upstream_branch: String,
    /// Branch on the fork to push to
    pub origin_branch: String,
    pub rebase: bool,
    pub force_push: bool,
    pub dry_run: bool,
}

impl SyncConfig {
    /// Build a run configuration from the file defaults alone
    pub fn from_defaults(defaults: &DefaultsConfig) -> Self {
        Self {
            upstream_branch: defaults.upstream_branch.clone(),
            origin_branch: defaults.origin_branch.clone(),
            rebase: defaults.rebase,
            force_push: defaults.force_push,
            dry_run: false,
        }
    }

    pub fn strategy(&self) -> SyncStrategy {
        if self.rebase {
            SyncStrategy::Rebase
        } else {
            SyncStrategy::Merge
        }
    }

    /// The upstream ref that gets merged or rebased onto, as shown to the user
    pub fn upstream_ref(&self) -> String {
        if self.upstream_branch.is_empty() {
            "upstream".to_string()
        } else {
            format!("upstream/{}", self.upstream_branch)
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::from_defaults(&DefaultsConfig::default())
    }
}
