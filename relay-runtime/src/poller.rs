//! Poll cycle orchestration
//!
//! One cycle: scan the community page, keep the posts whose URL is not in the
//! known-post store, queue them for delivery and persist the store. Cycles run
//! back to back on a single task; a tick that comes due while a cycle is still
//! running is skipped rather than overlapped.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use relay_core::{CommunityKey, KnownPostStore, StoreError};
use relay_scrape::{PostSource, ScanError};

use crate::{DeliveryQueue, QueueClosed};

/// Default time between cycle starts
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Errors that end a cycle early
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    QueueClosed(#[from] QueueClosed),
}

/// What a completed cycle did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Posts found on the page
    pub scanned: usize,
    /// Posts not seen before, now queued
    pub new_posts: usize,
    /// Whether the store was written
    pub saved: bool,
}

/// Poller configuration
#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub key: CommunityKey,
    pub interval: Duration,
}

impl PollerConfig {
    pub fn new(key: CommunityKey) -> Self {
        Self {
            key,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Drives poll cycles for one community
pub struct Poller {
    source: Arc<dyn PostSource>,
    store: KnownPostStore,
    queue: DeliveryQueue,
    config: PollerConfig,
}

impl Poller {
    pub fn new(
        source: Arc<dyn PostSource>,
        store: KnownPostStore,
        queue: DeliveryQueue,
        config: PollerConfig,
    ) -> Self {
        Self {
            source,
            store,
            queue,
            config,
        }
    }

    /// Run a single poll cycle
    pub async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let key = &self.config.key;
        info!("Checking for new posts in {}...", key);

        let posts = self.source.scan(key).await?;
        let mut report = CycleReport {
            scanned: posts.len(),
            ..Default::default()
        };

        if posts.is_empty() {
            warn!("Found no posts in {}", key);
            return Ok(report);
        }

        let mut known = self.store.load()?;
        let community = key.store_key();

        for post in posts {
            if known.contains(community, &post.url) {
                continue;
            }

            info!("Found a new post: {} ({})", post.title, post.url);
            known.append(community, post.clone());
            self.queue.enqueue(post)?;
            report.new_posts += 1;
        }

        if report.new_posts == 0 {
            info!("No new posts found");
            return Ok(report);
        }

        self.store.save(&known)?;
        report.saved = true;
        Ok(report)
    }

    /// Run a cycle now and then every interval until `shutdown` resolves.
    /// Cycle errors are logged and never stop the loop.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Poller stopping");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.run_cycle().await {
                        error!("Poll cycle failed: {}", e);
                    }
                }
            }
        }
    }
}
