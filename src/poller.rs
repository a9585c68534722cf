//! The timed fetch-compare-emit loop shared by all three feeds.

use crate::traits::{ErrorSink, FeedSource};
use crate::watermark::Watermark;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One polling loop. Owns its watermark; shares only the cancellation token
/// and the error sink with the rest of the receiver.
pub struct Poller<S: FeedSource> {
    source: S,
    watermark: Watermark,
    interval: Duration,
    tx: mpsc::Sender<S::Item>,
    latest: watch::Sender<Option<S::Item>>,
    cancel: CancellationToken,
    errors: Arc<dyn ErrorSink>,
}

impl<S: FeedSource> Poller<S> {
    pub fn new(
        source: S,
        interval: Duration,
        tx: mpsc::Sender<S::Item>,
        latest: watch::Sender<Option<S::Item>>,
        cancel: CancellationToken,
        errors: Arc<dyn ErrorSink>,
    ) -> Self {
        Self {
            source,
            watermark: Watermark::new(),
            interval,
            tx,
            latest,
            cancel,
            errors,
        }
    }

    /// Run until cancelled or until the consumer drops the stream.
    ///
    /// Each tick: wait one interval (cancellation ends the loop here), fetch,
    /// skip on any failure without touching the watermark, emit when the key
    /// changed. Delivery blocks until the consumer receives, so a slow
    /// consumer throttles this feed only.
    pub async fn run(mut self) {
        let feed = self.source.feed();
        debug!(%feed, interval = ?self.interval, "poller started");
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!(%feed, "poller cancelled");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {
                    if !self.tick().await {
                        debug!(%feed, "stream consumer gone, poller stopping");
                        break;
                    }
                }
            }
        }
    }

    /// One fetch cycle. Returns false only when the consumer is gone.
    async fn tick(&mut self) -> bool {
        let feed = self.source.feed();
        let (key, item) = match self.source.fetch(self.watermark.last()).await {
            Ok(Some(fetched)) => fetched,
            Ok(None) => return true,
            Err(error) => {
                self.errors.poll_error(feed, &error);
                return true;
            }
        };

        if !self.watermark.should_emit(&key) {
            return true;
        }

        // Store the key before the blocking handoff so the next tick never
        // re-emits the same item while the consumer is slow.
        self.watermark.update(key);
        debug!(%feed, "new item detected");

        if self.tx.send(item.clone()).await.is_err() {
            return false;
        }
        let _ = self.latest.send(Some(item));
        true
    }
}
