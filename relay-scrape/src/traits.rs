//! Seam between the poller and wherever posts come from

use async_trait::async_trait;
use relay_core::{CommunityKey, Post};

use crate::ScanError;

/// Anything that can list the current posts of a community, in page order
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn scan(&self, key: &CommunityKey) -> Result<Vec<Post>, ScanError>;
}
