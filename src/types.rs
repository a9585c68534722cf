use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Earthquake alert bulletin, decoded from one fetch of `datagempa.json`.
///
/// The provider publishes most numeric values as strings; decoding converts
/// magnitude and the epicenter point into numbers and fails with a decode
/// error when they do not parse. `depth` keeps the provider's unit annotation
/// (for example `"10 km"`) as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertBulletin {
    /// Globally unique per event + message type; the alert feed watermark.
    pub identifier: String,
    /// Numeric event id as published; keys the narrative feed.
    pub event_id: String,
    pub subject: String,
    pub headline: String,
    pub description: String,
    pub area: String,
    pub potential: String,
    pub instruction: String,
    pub felt: String,
    pub shakemap: String,
    /// Epicenter as (longitude, latitude) in degrees.
    pub coordinates: (f64, f64),
    pub magnitude: f64,
    pub depth: String,
    /// Tsunami-only fields; absent on ordinary quake bulletins.
    pub wz_map: Option<String>,
    pub tt_map: Option<String>,
    pub ssh_map: Option<String>,
    pub warning_zones: Vec<WarningZone>,
}

/// One tsunami warning zone entry from a bulletin's `wzarea` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarningZone {
    pub province: String,
    pub district: String,
    pub level: String,
    pub date: String,
    pub time: String,
}

/// Single realtime quake reading, decoded from one feature of the
/// `lastQL.json` / `gempaQL.json` collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealtimeReading {
    pub place: String,
    /// ISO-like timestamp string as published; the realtime feed watermark.
    pub time: String,
    pub magnitude: f64,
    pub depth: f64,
    /// Heterogeneous longitude/latitude(/depth) list, preserved as-is. The
    /// provider mixes numeric and string elements here.
    pub coordinates: Vec<Value>,
    pub phase: u32,
    pub status: String,
}

/// Raw narrative report for one event id. The text is HTML-bearing; see
/// [`crate::utils::clean_narrative`] for cleanup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeText {
    pub event_id: String,
    pub text: String,
}

/// The three independently polled data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Alert,
    Realtime,
    Narrative,
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feed::Alert => write!(f, "alert"),
            Feed::Realtime => write!(f, "realtime"),
            Feed::Narrative => write!(f, "narrative"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure: connection refused, timeout, TLS, body read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status code.
    #[error("unexpected HTTP status: {0}")]
    Status(u16),

    /// Structurally malformed JSON payload.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Payload decoded but a field had an unexpected shape or value.
    #[error("malformed field: {0}")]
    Malformed(String),

    /// A feature collection arrived with no features to read.
    #[error("feature collection is empty")]
    EmptyFeed,

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The receiver was started twice without cancelling in between.
    #[error("receiver already started; cancel it before starting again")]
    AlreadyStarted,
}

pub type Result<T> = std::result::Result<T, Error>;
