//! Release → hashes → Nix expression.
//!
//! Everything runs in order on the calling thread: one release lookup, then
//! one prefetch per platform in table order. The first failure aborts the
//! run and no document is produced.

use crate::artifact::{Artifact, REPO_BINDING, TAG_BINDING};
use crate::error::Result;
use crate::nix::{AttrSet, Document, Expr, NixString};
use crate::output;
use crate::platform::Platform;
use crate::prefetch::{ContentHash, Prefetcher};
use crate::release::{ReleaseClient, ReleaseTag, Repository};

/// A prefetched artifact for one platform.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    pub platform: &'a Platform,
    /// URL the hash was computed from
    pub url: String,
    /// URL as written into the expression
    pub symbolic_url: NixString,
    pub hash: ContentHash,
}

/// Resolve the latest release of `repo`, prefetch every platform's archive,
/// and build the expression.
pub fn generate(
    repo: &Repository,
    releases: &ReleaseClient,
    prefetcher: &dyn Prefetcher,
    platforms: &[Platform],
    download_base: &str,
) -> Result<Document> {
    output::action(&format!("Resolving latest release of {}", repo));
    let tag = releases.latest_tag(repo)?;
    output::detail(&format!("latest tag {}", tag));

    let entries = prefetch_all(repo, &tag, prefetcher, platforms, download_base)?;
    output::success(&format!("Prefetched {} artifacts for {}", entries.len(), tag));

    Ok(build_document(repo, &tag, entries))
}

/// Prefetch the archive of every platform, stopping at the first failure.
pub fn prefetch_all<'a>(
    repo: &Repository,
    tag: &ReleaseTag,
    prefetcher: &dyn Prefetcher,
    platforms: &'a [Platform],
    download_base: &str,
) -> Result<Vec<Entry<'a>>> {
    output::action(&format!("Prefetching {} artifacts", platforms.len()));

    let mut entries = Vec::with_capacity(platforms.len());
    for platform in platforms {
        let artifact = Artifact::new(platform, download_base);
        let url = artifact.url(repo, tag);

        let pb = output::spinner(&format!("{} ({})", platform.system, artifact.filename()));
        let hash = match prefetcher.prefetch(&url) {
            Ok(hash) => hash,
            Err(e) => {
                output::progress_fail(pb, &format!("{} failed", platform.system));
                return Err(e);
            }
        };
        output::progress_success(pb, &format!("{} {}", platform.system, hash));

        entries.push(Entry {
            platform,
            url,
            symbolic_url: artifact.symbolic_url(),
            hash,
        });
    }

    Ok(entries)
}

/// `{ fetchurl, ... }: let repo = ..; tag = ..; in { <system> = fetchurl { .. }; ... }`
pub fn build_document(repo: &Repository, tag: &ReleaseTag, entries: Vec<Entry<'_>>) -> Document {
    let mut body = AttrSet::new();
    for entry in entries {
        let fetcher = AttrSet::new()
            .with("url", Expr::String(entry.symbolic_url))
            .with("sha256", Expr::string(entry.hash.as_str()));
        body.insert(entry.platform.system, Expr::apply("fetchurl", fetcher.into()));
    }

    Document::new()
        .param("fetchurl")
        .ellipsis()
        .bind(REPO_BINDING, Expr::string(repo.to_string()))
        .bind(TAG_BINDING, Expr::string(tag.as_str()))
        .body(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::GITHUB_DOWNLOAD_BASE;
    use crate::error::GenerateError;
    use crate::platform::PLATFORMS;
    use std::cell::RefCell;

    /// Records requested URLs; fails on URLs containing `fail_on`.
    #[derive(Default)]
    struct Recording {
        urls: RefCell<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl Prefetcher for Recording {
        fn prefetch(&self, url: &str) -> Result<ContentHash> {
            self.urls.borrow_mut().push(url.to_string());
            if self.fail_on.is_some_and(|needle| url.contains(needle)) {
                return Err(GenerateError::PrefetchFailed {
                    url: url.to_string(),
                    code: Some(1),
                    stderr: "error: unable to download".to_string(),
                });
            }
            Ok(ContentHash::new(format!("hash-of-{}", url.rsplit('/').next().unwrap())))
        }
    }

    fn repo() -> Repository {
        "juliamertz/rose-pine-build".parse().unwrap()
    }

    #[test]
    fn test_prefetch_uses_concrete_urls_in_table_order() {
        let prefetcher = Recording::default();
        let tag = ReleaseTag::new("v0.3.0");

        let entries =
            prefetch_all(&repo(), &tag, &prefetcher, &PLATFORMS, GITHUB_DOWNLOAD_BASE).unwrap();

        let expected: Vec<String> = PLATFORMS
            .iter()
            .map(|p| {
                format!(
                    "https://github.com/juliamertz/rose-pine-build/releases/download/v0.3.0/rose-pine-build-{}.tar.gz",
                    p.target
                )
            })
            .collect();
        assert_eq!(*prefetcher.urls.borrow(), expected);
        assert_eq!(entries.iter().map(|e| e.url.clone()).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_prefetch_stops_at_first_failure() {
        let prefetcher = Recording {
            fail_on: Some("aarch64-unknown-linux-gnu"),
            ..Default::default()
        };

        let err = prefetch_all(
            &repo(),
            &ReleaseTag::new("v1"),
            &prefetcher,
            &PLATFORMS,
            GITHUB_DOWNLOAD_BASE,
        )
        .unwrap_err();

        assert!(matches!(err, GenerateError::PrefetchFailed { .. }));
        // x86_64-linux succeeded, aarch64-linux failed, darwin never attempted
        assert_eq!(prefetcher.urls.borrow().len(), 2);
    }

    #[test]
    fn test_document_matches_expected_layout() {
        let prefetcher = Recording::default();
        let tag = ReleaseTag::new("v0.3.0");
        let entries =
            prefetch_all(&repo(), &tag, &prefetcher, &PLATFORMS[..2], GITHUB_DOWNLOAD_BASE)
                .unwrap();

        let doc = build_document(&repo(), &tag, entries);

        let expected = concat!(
            r#"{ fetchurl, ... }: let repo = "juliamertz/rose-pine-build"; tag = "v0.3.0"; in { "#,
            r#"x86_64-linux = fetchurl { url = "https://github.com/${repo}/releases/download/${tag}/rose-pine-build-x86_64-unknown-linux-gnu.tar.gz"; sha256 = "hash-of-rose-pine-build-x86_64-unknown-linux-gnu.tar.gz"; };"#,
            "\n",
            r#"aarch64-linux = fetchurl { url = "https://github.com/${repo}/releases/download/${tag}/rose-pine-build-aarch64-unknown-linux-gnu.tar.gz"; sha256 = "hash-of-rose-pine-build-aarch64-unknown-linux-gnu.tar.gz"; }; }"#,
        );
        assert_eq!(doc.render(), expected);
    }

    #[test]
    fn test_document_escapes_tag() {
        let doc = build_document(&repo(), &ReleaseTag::new(r#"v1"${x}"#), Vec::new());
        assert!(doc.render().contains(r#"tag = "v1\"\${x}";"#));
    }
}
