//! Release artifact names and download URLs.

use crate::nix::NixString;
use crate::platform::Platform;
use crate::release::{ReleaseTag, Repository};

/// Default host serving release downloads
pub const GITHUB_DOWNLOAD_BASE: &str = "https://github.com";

/// Upstream archive format
pub const ARCHIVE_EXT: &str = "tar.gz";

/// Name of the `let` binding holding the repository in the generated expression.
pub const REPO_BINDING: &str = "repo";

/// Name of the `let` binding holding the release tag in the generated expression.
pub const TAG_BINDING: &str = "tag";

/// Asset filename for a target, e.g. `rose-pine-build-x86_64-apple-darwin.tar.gz`.
pub fn artifact_name(target: &str, ext: &str) -> String {
    format!("rose-pine-build-{}.{}", target, ext)
}

/// Locates the release archive of one platform.
#[derive(Debug, Clone, Copy)]
pub struct Artifact<'a> {
    platform: &'a Platform,
    download_base: &'a str,
}

impl<'a> Artifact<'a> {
    pub fn new(platform: &'a Platform, download_base: &'a str) -> Self {
        Self {
            platform,
            download_base: download_base.trim_end_matches('/'),
        }
    }

    pub fn platform(&self) -> &'a Platform {
        self.platform
    }

    pub fn filename(&self) -> String {
        artifact_name(self.platform.target, ARCHIVE_EXT)
    }

    /// Concrete download URL, as handed to the prefetcher.
    pub fn url(&self, repo: &Repository, tag: &ReleaseTag) -> String {
        format!(
            "{}/{}/releases/download/{}/{}",
            self.download_base,
            repo,
            tag,
            self.filename()
        )
    }

    /// The same URL with repository and tag left as `${repo}` and `${tag}`,
    /// resolved by the `let` bindings of the generated expression.
    pub fn symbolic_url(&self) -> NixString {
        let mut url = NixString::new();
        url.push_str(self.download_base)
            .push_str("/")
            .push_interpolation(REPO_BINDING)
            .push_str("/releases/download/")
            .push_interpolation(TAG_BINDING)
            .push_str("/")
            .push_str(&self.filename());
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PLATFORMS;

    #[test]
    fn test_filenames_for_all_platforms() {
        for platform in &PLATFORMS {
            let artifact = Artifact::new(platform, GITHUB_DOWNLOAD_BASE);
            assert_eq!(
                artifact.filename(),
                format!("rose-pine-build-{}.tar.gz", platform.target)
            );
        }
    }

    #[test]
    fn test_concrete_url() {
        let repo: Repository = "juliamertz/rose-pine-build".parse().unwrap();
        let tag = ReleaseTag::new("v0.3.0");
        let artifact = Artifact::new(&PLATFORMS[0], GITHUB_DOWNLOAD_BASE);

        assert_eq!(
            artifact.url(&repo, &tag),
            "https://github.com/juliamertz/rose-pine-build/releases/download/v0.3.0/rose-pine-build-x86_64-unknown-linux-gnu.tar.gz"
        );
    }

    #[test]
    fn test_symbolic_url_keeps_placeholders() {
        for platform in &PLATFORMS {
            let artifact = Artifact::new(platform, GITHUB_DOWNLOAD_BASE);
            assert_eq!(
                artifact.symbolic_url().to_string(),
                format!(
                    "\"https://github.com/${{repo}}/releases/download/${{tag}}/rose-pine-build-{}.tar.gz\"",
                    platform.target
                )
            );
        }
    }

    #[test]
    fn test_download_base_trailing_slash() {
        let repo: Repository = "o/r".parse().unwrap();
        let artifact = Artifact::new(&PLATFORMS[3], "http://mirror.local/");
        assert_eq!(
            artifact.url(&repo, &ReleaseTag::new("1.0")),
            "http://mirror.local/o/r/releases/download/1.0/rose-pine-build-aarch64-apple-darwin.tar.gz"
        );
    }
}
