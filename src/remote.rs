//! Remote URL parsing
//!
//! Turns the URL of the local `origin` remote into the owner/repository pair
//! used to query the hosting API.

use std::fmt;

use crate::error::ParseError;

/// Host assumed when none is configured
pub const DEFAULT_HOST: &str = "github.com";

/// Owner and repository name of a hosted repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryIdentity {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Parse a github.com remote URL
pub fn parse_remote_url(url: &str) -> Result<RepositoryIdentity, ParseError> {
    parse_remote_url_for_host(url, DEFAULT_HOST)
}

/// Parse a remote URL for the given host.
///
/// Accepts `git@<host>:owner/repo[.git]` and any URL containing
/// `<host>/owner/repo[.git]`.
pub fn parse_remote_url_for_host(url: &str, host: &str) -> Result<RepositoryIdentity, ParseError> {
    let url = url.trim();
    let ssh_prefix = format!("git@{}:", host);
    let https_marker = format!("{}/", host);

    let path = if let Some(path) = url.strip_prefix(&ssh_prefix) {
        path
    } else if let Some((_, path)) = url.split_once(&https_marker) {
        path
    } else {
        return Err(ParseError::UnsupportedUrlFormat {
            url: url.to_string(),
        });
    };

    let malformed = || ParseError::MalformedUrl {
        url: url.to_string(),
    };

    let (owner, repo) = path.split_once('/').ok_or_else(malformed)?;
    let name = repo.strip_suffix(".git").unwrap_or(repo);

    if owner.is_empty() || name.is_empty() {
        return Err(malformed());
    }

    Ok(RepositoryIdentity {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}
