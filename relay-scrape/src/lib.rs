//! Community relay scraping layer
//!
//! Turns a community page into an ordered list of posts:
//! - HTTP client construction (timeout, optional proxy, user agent)
//! - Markup query patterns for every post field
//! - Field extraction with ordered fallbacks
//! - Page scanning

pub mod client;
pub mod markup;
pub mod extractor;
pub mod scanner;
pub mod traits;

#[cfg(test)]
mod fixtures;

pub use client::*;
pub use extractor::*;
pub use scanner::*;
pub use traits::*;
