//! Community page scanner
//!
//! Fetches a community page and extracts every post on it, in page order.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, trace, warn};

use relay_core::{CommunityKey, Post};

use crate::markup::{MARKUP_REVISION, POST_CONTAINER};
use crate::{create_client, ExtractConfig, ExtractionError, FetchError, FieldExtractor, HttpConfig, PostSource};

static POST_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse(POST_CONTAINER).unwrap());

/// What to do when one post on a page cannot be extracted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPostPolicy {
    /// Fail the whole scan
    #[default]
    Abort,
    /// Drop the post and keep going
    Skip,
}

/// Errors from scanning a page
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Page scanner configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub extract: ExtractConfig,
    pub http: HttpConfig,
    pub on_malformed_post: MalformedPostPolicy,
}

/// Fetches community pages and turns them into posts
pub struct PageScanner {
    client: Client,
    extractor: FieldExtractor,
    on_malformed_post: MalformedPostPolicy,
}

impl PageScanner {
    pub fn new(config: ScanConfig) -> Result<Self, FetchError> {
        debug!("Post markup revision {}", MARKUP_REVISION);
        Ok(Self {
            client: create_client(&config.http)?,
            extractor: FieldExtractor::new(config.extract),
            on_malformed_post: config.on_malformed_post,
        })
    }

    /// Fetch the raw page body for a community
    pub async fn fetch_page(&self, key: &CommunityKey) -> Result<String, FetchError> {
        let url = key.page_url(&self.extractor.config().base_url);

        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PostSource for PageScanner {
    async fn scan(&self, key: &CommunityKey) -> Result<Vec<Post>, ScanError> {
        let html = self.fetch_page(key).await?;
        let posts = parse_posts(&html, &self.extractor, self.on_malformed_post)?;

        debug!("Community {} returned {} posts", key, posts.len());
        Ok(posts)
    }
}

/// Extract every post container in `html`, in document order
pub fn parse_posts(
    html: &str,
    extractor: &FieldExtractor,
    policy: MalformedPostPolicy,
) -> Result<Vec<Post>, ExtractionError> {
    let document = Html::parse_document(html);

    // The page is never valid HTML; parse errors are noise.
    if !document.errors.is_empty() {
        trace!("Ignored {} HTML parse errors", document.errors.len());
    }

    let mut posts = Vec::new();

    for node in document.select(&POST_SELECTOR) {
        match extractor.extract(node) {
            Ok(post) => posts.push(post),
            Err(e) if policy == MalformedPostPolicy::Skip => {
                warn!("Skipping malformed post: {}", e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    fn extractor() -> FieldExtractor {
        FieldExtractor::new(ExtractConfig::new("https://example.com/banner.png"))
    }

    fn broken_post() -> String {
        post(&header(""), &plain_text("no permalink"))
    }

    #[test]
    fn test_parse_posts_in_page_order() {
        let html = page(&[
            regular_post("c", "0d", "third"),
            regular_post("a", "1d", "first"),
            regular_post("b", "2w", "second"),
        ]);

        let posts = parse_posts(&html, &extractor(), MalformedPostPolicy::Abort).unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "first", "second"]);
    }

    #[test]
    fn test_empty_page() {
        let html = page(&[]);
        let posts = parse_posts(&html, &extractor(), MalformedPostPolicy::Abort).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_container_needs_both_classes() {
        let lone = regular_post("a", "1d", "half").replace("hE2QI", "other");
        let posts = parse_posts(&page(&[lone]), &extractor(), MalformedPostPolicy::Abort).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_tolerates_malformed_markup() {
        let html = format!(
            "<html><body><p>unclosed paragraph{}</span></p><td>stray cell</td><div>",
            regular_post("a", "1d", "survivor")
        );
        let posts = parse_posts(&html, &extractor(), MalformedPostPolicy::Abort).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "survivor");
    }

    #[test]
    fn test_malformed_post_aborts() {
        let html = page(&[regular_post("a", "1d", "ok"), broken_post()]);
        let result = parse_posts(&html, &extractor(), MalformedPostPolicy::Abort);
        assert!(matches!(result, Err(ExtractionError::MissingField("url"))));
    }

    #[test]
    fn test_malformed_post_skipped() {
        let html = page(&[broken_post(), regular_post("a", "1d", "ok")]);
        let posts = parse_posts(&html, &extractor(), MalformedPostPolicy::Skip).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].url, "https://plus.google.com/communities/1234/posts/a");
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        let policy: MalformedPostPolicy = serde_json::from_str("\"skip\"").unwrap();
        assert_eq!(policy, MalformedPostPolicy::Skip);
        assert_eq!(MalformedPostPolicy::default(), MalformedPostPolicy::Abort);
    }

    #[test]
    fn test_scanner_builds() {
        let scanner = PageScanner::new(ScanConfig {
            extract: ExtractConfig::new("https://example.com/banner.png"),
            http: HttpConfig::default(),
            on_malformed_post: MalformedPostPolicy::Skip,
        });
        assert!(scanner.is_ok());
    }
}
