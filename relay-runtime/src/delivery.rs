//! Rate-limited delivery queue
//!
//! Posts are delivered strictly in the order they were enqueued, one at a
//! time, with a fixed pause after every delivery whether it succeeded or not.
//! Failed deliveries are logged and dropped.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use relay_core::Post;

use crate::WebhookSink;

/// Pause after each delivery
pub const DEFAULT_DELIVERY_DELAY: Duration = Duration::from_secs(1);

/// The delivery worker has stopped
#[derive(Debug, Error)]
#[error("Delivery queue is closed")]
pub struct QueueClosed;

/// Producer handle; cheap to clone
#[derive(Debug, Clone)]
pub struct DeliveryQueue {
    tx: mpsc::UnboundedSender<Post>,
}

impl DeliveryQueue {
    /// Create a queue and the worker that drains it
    pub fn new(sink: Arc<dyn WebhookSink>, delay: Duration) -> (Self, DeliveryWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, DeliveryWorker { rx, sink, delay })
    }

    pub fn enqueue(&self, post: Post) -> Result<(), QueueClosed> {
        self.tx.send(post).map_err(|_| QueueClosed)
    }
}

/// Outcome counts for a worker run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    /// Requests that got a response (any status)
    pub delivered: usize,
    /// Requests that failed in transport
    pub failed: usize,
}

/// Consumer side of a [`DeliveryQueue`]
pub struct DeliveryWorker {
    rx: mpsc::UnboundedReceiver<Post>,
    sink: Arc<dyn WebhookSink>,
    delay: Duration,
}

impl DeliveryWorker {
    /// Deliver posts until every queue handle has been dropped and the
    /// backlog is empty.
    pub async fn run(mut self) -> DeliveryStats {
        let mut stats = DeliveryStats::default();

        while let Some(post) = self.rx.recv().await {
            info!("Sending {}...", post.title);

            match self.sink.send(&post).await {
                Ok(status) if (200..300).contains(&status) => {
                    info!("Got status code {} for {}", status, post.title);
                    stats.delivered += 1;
                }
                Ok(status) => {
                    warn!("Got status code {} for {}", status, post.title);
                    stats.delivered += 1;
                }
                Err(e) => {
                    error!("{} ({})", e, post.url);
                    stats.failed += 1;
                }
            }

            sleep(self.delay).await;
            debug!("Sent {}", post.title);
        }

        debug!(
            "Delivery queue drained: {} delivered, {} failed",
            stats.delivered, stats.failed
        );
        stats
    }
}
