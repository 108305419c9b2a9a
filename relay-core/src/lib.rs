//! Community relay core - domain model shared by the scraper and runtime
//!
//! This crate provides:
//! - The `Post` embed record delivered to webhooks
//! - Relative-date token normalization ("8w" -> absolute date)
//! - The persisted known-post store used for URL-keyed dedup

pub mod dates;
pub mod post;
pub mod store;

pub use dates::*;
pub use post::*;
pub use store::*;

/// Embed color applied to every delivered post
pub const EMBED_COLOR: u32 = 5153614;

/// Embed type literal
pub const EMBED_TYPE: &str = "rich";

/// Embed description literal
pub const EMBED_DESCRIPTION: &str = "New post";

/// Site base URL that relative links are resolved against
pub const DEFAULT_BASE_URL: &str = "https://plus.google.com";

/// Default location of the known-post store
pub const DEFAULT_STORE_PATH: &str = "known_posts.json";
