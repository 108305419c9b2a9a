//! Post field extraction
//!
//! Applies the query patterns from [`crate::markup`] to one post container
//! and assembles a [`Post`]. Each field takes the first pattern that yields a
//! non-empty value.

use chrono::{DateTime, Local, TimeZone};
use scraper::ElementRef;
use thiserror::Error;

use relay_core::{normalize_at, Author, DateError, Post, DEFAULT_BASE_URL};

use crate::markup::{self, FieldRule, Step, Target};

/// Age used when a post shows none (pinned posts)
pub const DEFAULT_FORMATTED_DATE: &str = "0d";

/// Errors from extracting one post
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Required field not found: {0}")]
    MissingField(&'static str),

    #[error("Bad post date: {0}")]
    Date(#[from] DateError),
}

/// Extraction settings supplied by the caller
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Site base URL for resolving `.`-relative links
    pub base_url: String,
    /// Image used when a post has none
    pub default_banner: String,
}

impl ExtractConfig {
    pub fn new(default_banner: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_banner: default_banner.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }
}

/// Builds [`Post`] records from post container nodes
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    config: ExtractConfig,
}

impl FieldExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract a post, dating it against the local clock
    pub fn extract(&self, node: ElementRef<'_>) -> Result<Post, ExtractionError> {
        self.extract_at(node, &Local::now())
    }

    /// Extract a post, dating it against `now`
    pub fn extract_at<Tz: TimeZone>(
        &self,
        node: ElementRef<'_>,
        now: &DateTime<Tz>,
    ) -> Result<Post, ExtractionError> {
        let author = Author {
            name: required(node, &markup::AUTHOR_NAME)?,
            url: self.resolve_site_url(&required(node, &markup::AUTHOR_URL)?),
            icon_url: qualify_protocol(&required(node, &markup::AUTHOR_ICON)?),
        };

        let url = self.resolve_site_url(&required(node, &markup::POST_URL)?);

        let formatted_date = query_first(node, &markup::FORMATTED_DATE)
            .unwrap_or_else(|| DEFAULT_FORMATTED_DATE.to_string());
        let timestamp = normalize_at(&formatted_date, now)?;

        let comment = query_first(node, &markup::COMMENT).unwrap_or_default();

        let image_url = query_first(node, &markup::IMAGE_URL)
            .unwrap_or_else(|| self.config.default_banner.clone());

        Ok(Post::new(comment, url, qualify_protocol(&image_url), author, timestamp))
    }

    /// Rewrite a leading `.` placeholder to the site base URL
    pub fn resolve_site_url(&self, url: &str) -> String {
        match url.strip_prefix('.') {
            Some(rest) if !rest.starts_with('.') => {
                format!("{}{}", self.config.base_url.trim_end_matches('/'), rest)
            }
            _ => url.to_string(),
        }
    }
}

/// Prefix protocol-relative URLs with `https:`
pub fn qualify_protocol(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        url.to_string()
    }
}

/// Evaluate a field's patterns in order, returning the first non-empty value
pub fn query_first(node: ElementRef<'_>, rule: &FieldRule) -> Option<String> {
    rule.patterns
        .iter()
        .find_map(|pattern| walk(node, pattern.steps, pattern.target))
}

fn required(node: ElementRef<'_>, rule: &FieldRule) -> Result<String, ExtractionError> {
    query_first(node, rule).ok_or(ExtractionError::MissingField(rule.name))
}

/// Depth-first over matching children so results come back in document order
fn walk(node: ElementRef<'_>, steps: &[Step], target: Target) -> Option<String> {
    let Some((step, rest)) = steps.split_first() else {
        return read(node, target);
    };

    node.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| step.matches(child.value()))
        .find_map(|child| walk(child, rest, target))
}

fn read(node: ElementRef<'_>, target: Target) -> Option<String> {
    let value = match target {
        Target::Text => node
            .children()
            .filter_map(|child| child.value().as_text())
            .map(|text| text.trim())
            .find(|text| !text.is_empty()),
        Target::Attr(name) => node.value().attr(name).map(str::trim),
    };

    value.filter(|v| !v.is_empty()).map(str::to_string)
}
