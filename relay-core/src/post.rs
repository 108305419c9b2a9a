//! Post embed model
//!
//! A `Post` serializes directly into the embed object a webhook expects,
//! so the field names here are the wire names.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{EMBED_COLOR, EMBED_DESCRIPTION, EMBED_TYPE};

/// Post author as shown in the embed header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name
    pub name: String,
    /// Absolute profile URL
    pub url: String,
    /// Avatar URL
    pub icon_url: String,
}

/// Embed image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Absolute, protocol-qualified image URL
    pub url: String,
}

/// One community post, ready to be delivered as an embed.
///
/// Identity is the permalink `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post body text (may be empty)
    pub title: String,
    /// Always "rich"
    #[serde(rename = "type")]
    pub kind: String,
    /// Absolute permalink
    pub url: String,
    /// Always "New post"
    pub description: String,
    pub image: Image,
    pub author: Author,
    pub color: u32,
    /// ISO-8601 date the post was published (midnight)
    pub timestamp: String,
}

impl Post {
    /// Build a post, filling in the constant embed fields
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        image_url: impl Into<String>,
        author: Author,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            kind: EMBED_TYPE.to_string(),
            url: url.into(),
            description: EMBED_DESCRIPTION.to_string(),
            image: Image {
                url: image_url.into(),
            },
            author,
            color: EMBED_COLOR,
            timestamp: timestamp.into(),
        }
    }
}

/// Identifies the community (and optional stream) being polled
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommunityKey {
    pub community: String,
    pub stream: Option<String>,
}

impl CommunityKey {
    pub fn new(community: impl Into<String>, stream: Option<String>) -> Self {
        Self {
            community: community.into(),
            stream: stream.filter(|s| !s.is_empty()),
        }
    }

    /// Page URL for this community/stream under `base_url`
    pub fn page_url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match &self.stream {
            Some(stream) => format!("{}/communities/{}/stream/{}", base, self.community, stream),
            None => format!("{}/communities/{}", base, self.community),
        }
    }

    /// Key under which known posts are stored. Streams share their
    /// community's entry.
    pub fn store_key(&self) -> &str {
        &self.community
    }
}

impl fmt::Display for CommunityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stream {
            Some(stream) => write!(f, "{}/{}", self.community, stream),
            None => write!(f, "{}", self.community),
        }
    }
}
