//! generate-artifacts - print Nix fetchers for the latest rose-pine-build release
//!
//! Usage:
//!   generate-artifacts > artifacts.nix
//!
//! Status goes to stderr; only the expression is written to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use rose_pine_artifacts::config::{self, Config, ConfigLayer};
use rose_pine_artifacts::platform::PLATFORMS;
use rose_pine_artifacts::{generate, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "generate-artifacts")]
#[command(about = "Generate Nix fetchers for the latest rose-pine-build release")]
#[command(version)]
struct Cli {
    /// Repository to read releases from (owner/name)
    #[arg(long, env = "ROSE_PINE_REPO")]
    repo: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "ROSE_PINE_API_URL")]
    api_url: Option<String>,

    /// Base URL serving release downloads
    #[arg(long, env = "ROSE_PINE_DOWNLOAD_URL")]
    download_url: Option<String>,

    /// Program invoked as `<prefetcher> <url>` to hash each archive
    #[arg(long, env = "ROSE_PINE_PREFETCHER")]
    prefetcher: Option<String>,

    /// HTTP timeout in seconds (clamped to 5-300)
    #[arg(long, env = "ROSE_PINE_HTTP_TIMEOUT")]
    timeout: Option<u64>,

    /// Config file (defaults to ~/.config/rose-pine-artifacts/config.toml if present)
    #[arg(short, long, env = "ROSE_PINE_CONFIG")]
    config: Option<PathBuf>,

    /// Only print the expression
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            repo: self.repo.clone(),
            api_url: self.api_url.clone(),
            download_url: self.download_url.clone(),
            prefetcher: self.prefetcher.clone(),
            timeout_secs: self.timeout,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    output::set_quiet(cli.quiet);

    let mut layers = Vec::new();
    if let Some((path, layer)) =
        config::load_file_layer(cli.config.as_deref()).context("Failed to load config")?
    {
        output::detail(&format!("using config {}", path.display()));
        layers.push(layer);
    }
    layers.push(cli.layer());

    let token = std::env::var("GITHUB_TOKEN").ok();
    let config = Config::resolve(layers, token).context("Invalid configuration")?;

    let document = generate(
        &config.repo,
        &config.release_client(),
        &config.prefetcher(),
        &PLATFORMS,
        &config.download_url,
    )
    .with_context(|| format!("Failed to generate artifacts for {}", config.repo))?;

    println!("{}", document);
    Ok(())
}
