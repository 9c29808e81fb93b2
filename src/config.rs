//! Generator configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! command-line flags and environment variables. Later layers win per field.
//!
//! ```toml
//! repo = "juliamertz/rose-pine-build"
//! api_url = "https://api.github.com"
//! download_url = "https://github.com"
//! prefetcher = "nix-prefetch-url"
//! timeout_secs = 30
//! ```

use crate::artifact::GITHUB_DOWNLOAD_BASE;
use crate::error::{GenerateError, Result};
use crate::prefetch::{NIX_PREFETCH_URL, NixPrefetchUrl};
use crate::release::{DEFAULT_HTTP_TIMEOUT_SECS, GITHUB_API_BASE, ReleaseClient, Repository};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upstream project whose releases are packaged
pub const DEFAULT_REPO: &str = "juliamertz/rose-pine-build";

const MIN_TIMEOUT_SECS: u64 = 5;
const MAX_TIMEOUT_SECS: u64 = 300;

/// One layer of optional settings, as read from a config file or the CLI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub repo: Option<String>,
    pub api_url: Option<String>,
    pub download_url: Option<String>,
    pub prefetcher: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigLayer {
    /// Read a layer from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GenerateError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| GenerateError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(&mut self, other: ConfigLayer) {
        if other.repo.is_some() {
            self.repo = other.repo;
        }
        if other.api_url.is_some() {
            self.api_url = other.api_url;
        }
        if other.download_url.is_some() {
            self.download_url = other.download_url;
        }
        if other.prefetcher.is_some() {
            self.prefetcher = other.prefetcher;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub repo: Repository,
    pub api_url: String,
    pub download_url: String,
    pub prefetcher: String,
    pub timeout: Duration,
    pub github_token: Option<String>,
}

impl Config {
    /// Apply `layers` in order over the defaults.
    pub fn resolve(
        layers: impl IntoIterator<Item = ConfigLayer>,
        github_token: Option<String>,
    ) -> Result<Self> {
        let mut merged = ConfigLayer::default();
        for layer in layers {
            merged.merge(layer);
        }

        let repo: Repository = merged.repo.as_deref().unwrap_or(DEFAULT_REPO).parse()?;

        let timeout_secs = merged
            .timeout_secs
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
            .clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);

        let prefetcher = merged
            .prefetcher
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| NIX_PREFETCH_URL.to_string());

        Ok(Self {
            repo,
            api_url: merged.api_url.unwrap_or_else(|| GITHUB_API_BASE.to_string()),
            download_url: merged
                .download_url
                .unwrap_or_else(|| GITHUB_DOWNLOAD_BASE.to_string()),
            prefetcher,
            timeout: Duration::from_secs(timeout_secs),
            github_token,
        })
    }

    pub fn release_client(&self) -> ReleaseClient {
        ReleaseClient::new(self.api_url.clone())
            .with_token(self.github_token.clone())
            .with_timeout(self.timeout)
    }

    pub fn prefetcher(&self) -> NixPrefetchUrl {
        NixPrefetchUrl::new(self.prefetcher.clone())
    }
}

/// `$XDG_CONFIG_HOME/rose-pine-artifacts/config.toml` (or the platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rose-pine-artifacts").join("config.toml"))
}

/// Find and load the config file layer.
///
/// An explicit path must exist and parse. Without one, the default path is
/// read only if it exists. Returns the path that was used with its layer.
pub fn load_file_layer(explicit: Option<&Path>) -> Result<Option<(PathBuf, ConfigLayer)>> {
    file_layer_from(explicit, default_config_path())
}

fn file_layer_from(
    explicit: Option<&Path>,
    default: Option<PathBuf>,
) -> Result<Option<(PathBuf, ConfigLayer)>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let layer = ConfigLayer::load(&path)?;
    Ok(Some((path, layer)))
}
