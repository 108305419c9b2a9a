//! Known-post store
//!
//! Tracks which posts have already been relayed, per community, in a single
//! JSON file: `{ "<community>": [ <Post>, ... ] }`. The whole file is read at
//! the start of a cycle and rewritten in full at the end.
//!
//! Only `url` is required of a stored entry. Any other fields are carried
//! through untouched, so hand-edited or older stores still load.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::Post;

/// Errors from the known-post store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Store {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One stored entry: the dedup key plus whatever else was recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownPost {
    pub url: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl From<Post> for KnownPost {
    fn from(post: Post) -> Self {
        let rest = match serde_json::to_value(&post) {
            Ok(Value::Object(mut fields)) => {
                fields.remove("url");
                fields
            }
            _ => Map::new(),
        };
        Self { url: post.url, rest }
    }
}

/// In-memory copy of the persisted store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnownPosts {
    communities: BTreeMap<String, Vec<KnownPost>>,
}

impl KnownPosts {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff a post with `url` is already known for `community`
    pub fn contains(&self, community: &str, url: &str) -> bool {
        self.communities
            .get(community)
            .map(|posts| posts.iter().any(|p| p.url == url))
            .unwrap_or(false)
    }

    /// Record `post` for `community`. Returns false if its URL was already
    /// known, leaving the store unchanged.
    pub fn append(&mut self, community: &str, post: impl Into<KnownPost>) -> bool {
        let post = post.into();
        if self.contains(community, &post.url) {
            return false;
        }
        self.communities
            .entry(community.to_string())
            .or_default()
            .push(post);
        true
    }

    /// Known posts for a community, in the order they were found
    pub fn posts(&self, community: &str) -> &[KnownPost] {
        self.communities
            .get(community)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Community identifiers present in the store
    pub fn communities(&self) -> impl Iterator<Item = &str> {
        self.communities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.communities.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// File-backed store location
#[derive(Debug, Clone)]
pub struct KnownPostStore {
    path: PathBuf,
}

impl KnownPostStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store. A missing file is an empty store.
    pub fn load(&self) -> Result<KnownPosts, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(KnownPosts::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&data).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the store with `known`.
    ///
    /// Writes a sibling temp file and renames it into place so a crash never
    /// leaves a half-written store behind.
    pub fn save(&self, known: &KnownPosts) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let data = serde_json::to_string(known).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "known_posts.json".to_string());
        let tmp = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

        fs::write(&tmp, data).map_err(io_err)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_err(e));
        }
        Ok(())
    }
}
