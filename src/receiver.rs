//! Coordinator: owns configuration, the three pollers, their delivery
//! channels, the latest-value caches and the shared cancellation token.

use crate::fetcher::Fetcher;
use crate::poller::Poller;
use crate::sources::{AlertSource, NarrativeSource, RealtimeSource};
use crate::traits::{ErrorSink, LogErrorSink};
use crate::types::{AlertBulletin, Error, NarrativeText, RealtimeReading, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Public bucket root of the provider.
pub const DEFAULT_BASE_URL: &str = "https://bmkg-content-inatews.storage.googleapis.com";

#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Bucket root the four endpoint paths are resolved against.
    pub base_url: String,
    /// How long each poller waits between fetch cycles.
    pub poll_interval: Duration,
    /// Per-request network timeout, not a per-tick budget.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_secs(15),
            timeout: Duration::from_secs(30),
            user_agent: concat!("quakewatch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Receive-only halves of the three delivery channels.
///
/// Each channel holds at most one pending item; the poller behind it blocks
/// until the item is received. Not draining a stream therefore stalls that
/// feed alone; the other two keep polling.
pub struct FeedStreams {
    pub alerts: mpsc::Receiver<AlertBulletin>,
    pub realtime: mpsc::Receiver<RealtimeReading>,
    pub narratives: mpsc::Receiver<NarrativeText>,
}

// Everything start() hands over to the spawned pollers, exactly once.
struct Pending {
    alert_tx: mpsc::Sender<AlertBulletin>,
    realtime_tx: mpsc::Sender<RealtimeReading>,
    narrative_tx: mpsc::Sender<NarrativeText>,
    latest_alert_tx: watch::Sender<Option<AlertBulletin>>,
    latest_realtime_tx: watch::Sender<Option<RealtimeReading>>,
    latest_narrative_tx: watch::Sender<Option<NarrativeText>>,
    streams: FeedStreams,
}

/// Polling receiver for the three bucket feeds.
///
/// ```no_run
/// # async fn demo() -> quakewatch::Result<()> {
/// let mut receiver = quakewatch::Receiver::new(quakewatch::ReceiverConfig::default())?;
/// let mut streams = receiver.start()?;
/// while let Some(alert) = streams.alerts.recv().await {
///     println!("{}: M{}", alert.area, alert.magnitude);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Receiver {
    config: ReceiverConfig,
    fetcher: Arc<Fetcher>,
    cancel: CancellationToken,
    errors: Arc<dyn ErrorSink>,
    pending: Option<Pending>,
    latest_alert_rx: watch::Receiver<Option<AlertBulletin>>,
    latest_realtime_rx: watch::Receiver<Option<RealtimeReading>>,
    latest_narrative_rx: watch::Receiver<Option<NarrativeText>>,
}

impl Receiver {
    /// Construct a receiver. Fails synchronously on a malformed base URL or
    /// an HTTP client that cannot be built.
    pub fn new(config: ReceiverConfig) -> Result<Self> {
        let fetcher = Arc::new(Fetcher::new(&config)?);

        // Rendezvous-style delivery: a single pending item per feed.
        let (alert_tx, alerts) = mpsc::channel(1);
        let (realtime_tx, realtime) = mpsc::channel(1);
        let (narrative_tx, narratives) = mpsc::channel(1);

        let (latest_alert_tx, latest_alert_rx) = watch::channel(None);
        let (latest_realtime_tx, latest_realtime_rx) = watch::channel(None);
        let (latest_narrative_tx, latest_narrative_rx) = watch::channel(None);

        Ok(Self {
            config,
            fetcher,
            cancel: CancellationToken::new(),
            errors: Arc::new(LogErrorSink),
            pending: Some(Pending {
                alert_tx,
                realtime_tx,
                narrative_tx,
                latest_alert_tx,
                latest_realtime_tx,
                latest_narrative_tx,
                streams: FeedStreams {
                    alerts,
                    realtime,
                    narratives,
                },
            }),
            latest_alert_rx,
            latest_realtime_rx,
            latest_narrative_rx,
        })
    }

    /// Install an error sink for per-tick poll failures. Replaces the
    /// default sink, which logs at warn level. Call before [`start`].
    ///
    /// [`start`]: Receiver::start
    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.errors = sink;
        self
    }

    /// Launch the three pollers and hand back the delivery streams.
    ///
    /// A receiver starts once; a second call returns
    /// [`Error::AlreadyStarted`] rather than double-polling.
    pub fn start(&mut self) -> Result<FeedStreams> {
        let pending = self.pending.take().ok_or(Error::AlreadyStarted)?;
        let interval = self.config.poll_interval;

        tokio::spawn(
            Poller::new(
                AlertSource::new(self.fetcher.clone()),
                interval,
                pending.alert_tx,
                pending.latest_alert_tx,
                self.cancel.clone(),
                self.errors.clone(),
            )
            .run(),
        );
        tokio::spawn(
            Poller::new(
                RealtimeSource::new(self.fetcher.clone()),
                interval,
                pending.realtime_tx,
                pending.latest_realtime_tx,
                self.cancel.clone(),
                self.errors.clone(),
            )
            .run(),
        );
        // The narrative poller reads (never writes) the latest-alert cache
        // to learn which event id to request.
        tokio::spawn(
            Poller::new(
                NarrativeSource::new(self.fetcher.clone(), self.latest_alert_rx.clone()),
                interval,
                pending.narrative_tx,
                pending.latest_narrative_tx,
                self.cancel.clone(),
                self.errors.clone(),
            )
            .run(),
        );

        info!(
            base_url = %self.config.base_url,
            interval = ?interval,
            "polling started"
        );
        Ok(pending.streams)
    }

    /// One-shot historical listing; no watermark interaction, errors
    /// propagate to the caller.
    pub async fn history(&self) -> Result<Vec<RealtimeReading>> {
        self.fetcher.fetch_history().await
    }

    /// Most recently delivered alert bulletin, if any.
    pub fn latest_alert(&self) -> Option<AlertBulletin> {
        self.latest_alert_rx.borrow().clone()
    }

    /// Most recently delivered realtime reading, if any.
    pub fn latest_realtime(&self) -> Option<RealtimeReading> {
        self.latest_realtime_rx.borrow().clone()
    }

    /// Most recently delivered narrative, if any (raw text).
    pub fn latest_narrative(&self) -> Option<NarrativeText> {
        self.latest_narrative_rx.borrow().clone()
    }

    /// Token shared by all three pollers; cancel it to stop them.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop all three pollers. Cooperative: a poller waiting out its
    /// interval stops immediately, one mid-request stops after the request
    /// resolves. No emission happens after the loops observe the signal.
    pub fn shutdown(&self) {
        info!("shutting down pollers");
        self.cancel.cancel();
    }
}
