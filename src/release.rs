//! GitHub release lookup
//!
//! Resolves a repository to the tag of its latest published release.
//!
//! ## GitHub Authentication
//!
//! Set `GITHUB_TOKEN` to raise the API rate limit:
//! ```bash
//! export GITHUB_TOKEN="ghp_xxxxxxxxxxxxxxxxxxxx"
//! ```

use crate::error::{GenerateError, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default GitHub API base URL
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Default HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// An `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    owner: String,
    name: String,
}

impl Repository {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for Repository {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || GenerateError::InvalidRepository(s.to_string());
        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        let valid_part = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };
        if !valid_part(owner) || !valid_part(name) {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Tag name of a published release, used verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag(String);

impl ReleaseTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The part of `GET /repos/{owner}/{repo}/releases/latest` we read.
#[derive(Debug, Deserialize)]
struct LatestRelease {
    #[serde(default)]
    tag_name: Option<String>,
}

/// Blocking client for the GitHub releases API.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    api_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl Default for ReleaseClient {
    fn default() -> Self {
        Self::new(GITHUB_API_BASE)
    }
}

impl ReleaseClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create a GitHub API request with proper headers and optional auth.
    fn request(&self, url: &str) -> ureq::Request {
        let mut request = ureq::get(url)
            .timeout(self.timeout)
            .set("Accept", "application/vnd.github+json")
            .set(
                "User-Agent",
                concat!("rose-pine-artifacts/", env!("CARGO_PKG_VERSION")),
            );

        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        request
    }

    /// Get the tag of the latest release of `repo`.
    ///
    /// The tag is returned exactly as GitHub reports it (no `v` stripping),
    /// since it is also a path segment of the download URL.
    pub fn latest_tag(&self, repo: &Repository) -> Result<ReleaseTag> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url,
            repo.owner(),
            repo.name()
        );

        let response = self.request(&url).call().map_err(|e| match e {
            ureq::Error::Status(403 | 429, _) => GenerateError::RateLimited,
            ureq::Error::Status(404, _) => GenerateError::NoLatestRelease(repo.to_string()),
            other => GenerateError::Http(other.to_string()),
        })?;

        let release: LatestRelease = response
            .into_json()
            .map_err(|e| GenerateError::MalformedResponse(e.to_string()))?;

        release
            .tag_name
            .filter(|tag| !tag.trim().is_empty())
            .map(ReleaseTag)
            .ok_or_else(|| GenerateError::MissingReleaseTag(repo.to_string()))
    }
}
