//! Content hashes for release archives
//!
//! Hashing is delegated to an external prefetcher (`nix-prefetch-url` by
//! default), which downloads the URL into the Nix store and prints the
//! hash Nix expects for `fetchurl`.

use crate::error::{GenerateError, Result};
use std::fmt;
use std::process::Command;

/// Default prefetch program
pub const NIX_PREFETCH_URL: &str = "nix-prefetch-url";

/// A content hash as printed by the prefetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHash(String);

impl ContentHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the content hash of the payload behind a URL.
pub trait Prefetcher {
    fn prefetch(&self, url: &str) -> Result<ContentHash>;
}

impl<P: Prefetcher + ?Sized> Prefetcher for &P {
    fn prefetch(&self, url: &str) -> Result<ContentHash> {
        (**self).prefetch(url)
    }
}

/// Runs `<program> <url>` and takes trimmed stdout as the hash.
#[derive(Debug, Clone)]
pub struct NixPrefetchUrl {
    program: String,
}

impl Default for NixPrefetchUrl {
    fn default() -> Self {
        Self::new(NIX_PREFETCH_URL)
    }
}

impl NixPrefetchUrl {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Prefetcher for NixPrefetchUrl {
    fn prefetch(&self, url: &str) -> Result<ContentHash> {
        let output = Command::new(&self.program)
            .arg(url)
            .output()
            .map_err(|source| GenerateError::PrefetchSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GenerateError::PrefetchFailed {
                url: url.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if hash.is_empty() {
            return Err(GenerateError::EmptyHash(url.to_string()));
        }

        Ok(ContentHash(hash))
    }
}
