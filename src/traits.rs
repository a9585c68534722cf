use crate::types::{Error, Feed, Result};
use async_trait::async_trait;
use tracing::warn;

/// One pollable data source: a single fetch + decode + key derivation.
///
/// Implemented by the three built-in feed sources; public so tests and
/// callers with bespoke feeds can drive a [`crate::poller::Poller`] directly.
#[async_trait]
pub trait FeedSource: Send {
    type Item: Clone + Send + Sync + 'static;

    fn feed(&self) -> Feed;

    /// Perform one tick's worth of work and derive the comparison key.
    ///
    /// `last_key` is the currently stored watermark. Most sources ignore it;
    /// the narrative source uses it to skip the HTTP request entirely when
    /// the cached event id was already delivered (so a failed download keeps
    /// retrying the same id on later ticks).
    ///
    /// `Ok(None)` means a precondition is not met and the tick is skipped
    /// silently, not treated as an error.
    async fn fetch(&mut self, last_key: Option<&str>) -> Result<Option<(String, Self::Item)>>;
}

/// Observability port for per-tick poll failures.
///
/// Poll loops never terminate on a fetch-cycle error and never surface it to
/// the stream consumer; installing a sink is the only way to see them.
pub trait ErrorSink: Send + Sync {
    fn poll_error(&self, feed: Feed, error: &Error);
}

/// Default sink: log the failure and move on.
pub(crate) struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn poll_error(&self, feed: Feed, error: &Error) {
        warn!(%feed, %error, "poll tick failed, retrying next interval");
    }
}
