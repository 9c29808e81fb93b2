//! Error types for artifact generation.

use thiserror::Error;

/// Errors that can occur while generating the artifact expression.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("invalid repository '{0}': expected owner/name")]
    InvalidRepository(String),

    #[error("GitHub API request failed: {0}")]
    Http(String),

    #[error("GitHub API rate limit exceeded. Try again later or set GITHUB_TOKEN.")]
    RateLimited,

    #[error("no latest release found for '{0}'")]
    NoLatestRelease(String),

    #[error("failed to parse GitHub response: {0}")]
    MalformedResponse(String),

    #[error("missing release tag: latest release of '{0}' has no tag_name")]
    MissingReleaseTag(String),

    #[error("failed to execute {program}: {source}")]
    PrefetchSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("prefetch failed for {url} (exit code: {code:?})\nstderr: {stderr}")]
    PrefetchFailed {
        url: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("prefetch returned no hash for {0}")]
    EmptyHash(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GenerateError>;
