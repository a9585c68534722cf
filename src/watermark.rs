//! Per-feed change detection.

/// Last-delivered token for one feed.
///
/// The tracker never interprets its key: the alert poller feeds it bulletin
/// identifiers, the realtime poller timestamp strings, the narrative poller
/// numeric event ids. It only answers "is this different from what I stored".
#[derive(Debug, Default)]
pub struct Watermark {
    last: Option<String>,
}

impl Watermark {
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly when `candidate` differs from the stored key, including
    /// the first-ever observation. The caller persists via [`update`] on true.
    ///
    /// [`update`]: Watermark::update
    pub fn should_emit(&self, candidate: &str) -> bool {
        self.last.as_deref() != Some(candidate)
    }

    pub fn update(&mut self, candidate: impl Into<String>) {
        self.last = Some(candidate.into());
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}
