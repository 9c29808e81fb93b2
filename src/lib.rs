//! Nix fetchers for the latest rose-pine-build release
//!
//! Looks up the latest GitHub release of the upstream project, prefetches the
//! release archive of every supported platform, and renders a Nix expression
//! that a flake or overlay can import:
//!
//! ```nix
//! { fetchurl, ... }: let repo = "juliamertz/rose-pine-build"; tag = "v0.3.0"; in { x86_64-linux = fetchurl { url = "https://github.com/${repo}/releases/download/${tag}/rose-pine-build-x86_64-unknown-linux-gnu.tar.gz"; sha256 = "..."; };
//! aarch64-linux = fetchurl { ... };
//! x86_64-darwin = fetchurl { ... };
//! aarch64-darwin = fetchurl { ... }; }
//! ```
//!
//! # Pipeline
//!
//! 1. [`release::ReleaseClient::latest_tag`] resolves the release tag
//! 2. [`platform::PLATFORMS`] lists the systems and their target triples
//! 3. [`artifact::Artifact`] derives file names and URLs, and a
//!    [`prefetch::Prefetcher`] hashes each archive
//! 4. [`generate::build_document`] assembles the [`nix::Document`]
//!
//! [`generate::generate`] runs all four stages.

pub mod artifact;
pub mod config;
pub mod error;
pub mod generate;
pub mod nix;
pub mod output;
pub mod platform;
pub mod prefetch;
pub mod release;

pub use config::Config;
pub use error::{GenerateError, Result};
pub use generate::generate;
pub use prefetch::{ContentHash, NixPrefetchUrl, Prefetcher};
pub use release::{ReleaseClient, ReleaseTag, Repository};
