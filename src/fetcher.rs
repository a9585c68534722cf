//! HTTP collaborator for the four bucket endpoints.

use crate::parser::{self, RawBulletin, RawFeatureCollection};
use crate::receiver::ReceiverConfig;
use crate::types::{AlertBulletin, Error, NarrativeText, RealtimeReading, Result};
use crate::utils::unix_millis;
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

pub struct Fetcher {
    client: Client,
    base: Url,
}

impl Fetcher {
    /// Build a client against the configured bucket root. A malformed base
    /// URL or a client construction failure is reported synchronously.
    pub fn new(config: &ReceiverConfig) -> Result<Self> {
        let mut base = Url::parse(&config.base_url)?;
        // Url::join treats a path without a trailing slash as a file.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, base })
    }

    async fn get(&self, path: &str) -> Result<Response> {
        let url = self.base.join(path)?;
        debug!(%url, "fetching");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }
        Ok(response)
    }

    /// Latest alert bulletin (`datagempa.json`, cache-busted).
    pub async fn fetch_alert(&self) -> Result<AlertBulletin> {
        let path = format!("datagempa.json?t={}", unix_millis());
        let body = self.get(&path).await?.bytes().await?;
        let raw: RawBulletin = serde_json::from_slice(&body)?;
        parser::parse_bulletin(raw)
    }

    /// Latest realtime reading (`lastQL.json`, cache-busted). The collection
    /// carries a single relevant feature; an empty one is an error.
    pub async fn fetch_realtime(&self) -> Result<RealtimeReading> {
        let path = format!("lastQL.json?t={}", unix_millis());
        let body = self.get(&path).await?.bytes().await?;
        let raw: RawFeatureCollection = serde_json::from_slice(&body)?;
        parser::first_reading(raw)
    }

    /// Full historical listing (`gempaQL.json`, no cache-busting).
    pub async fn fetch_history(&self) -> Result<Vec<RealtimeReading>> {
        let body = self.get("gempaQL.json").await?.bytes().await?;
        let raw: RawFeatureCollection = serde_json::from_slice(&body)?;
        parser::parse_collection(raw)
    }

    /// Narrative report for one event id, raw HTML-bearing text. Narratives
    /// are published with some delay after the bulletin, so a 404 here is
    /// routine for a while.
    pub async fn fetch_narrative(&self, event_id: &str) -> Result<NarrativeText> {
        let path = format!("{event_id}_narasi.txt");
        let text = self.get(&path).await?.text().await?;
        Ok(NarrativeText {
            event_id: event_id.to_string(),
            text,
        })
    }
}
