//! Polling client for the BMKG InaTEWS earthquake bulletin bucket.
//!
//! Three feeds are polled independently on a shared interval: alert
//! bulletins (`datagempa.json`), realtime quake readings (`lastQL.json`) and
//! free-text narrative reports (`{eventid}_narasi.txt`). Each feed keeps a
//! "last seen" watermark and delivers every newly observed item exactly once
//! over its own channel. A single [`tokio_util::sync::CancellationToken`]
//! stops all three loops.

pub mod fetcher;
pub mod parser;
pub mod poller;
pub mod receiver;
pub mod sources;
pub mod traits;
pub mod types;
pub mod utils;
pub mod watermark;

pub use fetcher::Fetcher;
pub use poller::Poller;
pub use receiver::{FeedStreams, Receiver, ReceiverConfig, DEFAULT_BASE_URL};
pub use traits::{ErrorSink, FeedSource};
pub use types::{
    AlertBulletin, Error, Feed, NarrativeText, RealtimeReading, Result, WarningZone,
};
pub use utils::clean_narrative;
pub use watermark::Watermark;
