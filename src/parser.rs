//! Raw provider JSON shapes and their conversion into typed records.
//!
//! The bucket publishes nearly everything as strings, including magnitudes,
//! depths and coordinates. Decoding happens in two steps: serde into the
//! `Raw*` shapes below, then conversion into the typed records from
//! [`crate::types`]. A string that should be numeric but does not parse is a
//! [`Error::Malformed`], never a silent zero and never a panic.

use crate::types::{AlertBulletin, Error, RealtimeReading, Result, WarningZone};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct RawBulletin {
    pub identifier: String,
    pub info: RawBulletinInfo,
    #[serde(default)]
    pub code: String,
    #[serde(rename = "msgType", default)]
    pub msg_type: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub sent: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct RawBulletinInfo {
    #[serde(rename = "eventid")]
    pub event_id: String,
    pub magnitude: String,
    pub point: RawPoint,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub potential: String,
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub felt: String,
    #[serde(default)]
    pub shakemap: String,
    #[serde(default)]
    pub depth: String,
    // Tsunami-only properties; empty strings on ordinary bulletins.
    #[serde(rename = "wzmap", default)]
    pub wz_map: String,
    #[serde(rename = "ttmap", default)]
    pub tt_map: String,
    #[serde(rename = "sshmap", default)]
    pub ssh_map: String,
    #[serde(rename = "wzarea", default)]
    pub wz_area: Vec<RawWarningZone>,
}

#[derive(Debug, Deserialize)]
pub struct RawPoint {
    pub coordinates: String,
}

#[derive(Debug, Deserialize)]
pub struct RawWarningZone {
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct RawFeatureCollection {
    #[serde(default)]
    pub features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
pub struct RawFeature {
    pub properties: RawFeatureProperties,
    pub geometry: RawGeometry,
}

#[derive(Debug, Deserialize)]
pub struct RawGeometry {
    #[serde(default)]
    pub coordinates: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawFeatureProperties {
    #[serde(default)]
    pub place: String,
    pub time: String,
    pub mag: String,
    pub depth: String,
    #[serde(rename = "fase", default)]
    pub phase: String,
    #[serde(default)]
    pub status: String,
}

/// Convert a decoded `datagempa.json` payload into a typed bulletin.
pub fn parse_bulletin(raw: RawBulletin) -> Result<AlertBulletin> {
    let info = raw.info;
    let coordinates = parse_point(&info.point.coordinates)?;
    let magnitude = parse_f64(&info.magnitude, "magnitude")?;

    let warning_zones = info
        .wz_area
        .into_iter()
        .map(|z| WarningZone {
            province: z.province,
            district: z.district,
            level: z.level,
            date: z.date,
            time: z.time,
        })
        .collect();

    Ok(AlertBulletin {
        identifier: raw.identifier,
        event_id: info.event_id,
        subject: info.subject,
        headline: info.headline,
        description: info.description,
        area: info.area,
        potential: info.potential,
        instruction: info.instruction,
        felt: info.felt,
        shakemap: info.shakemap,
        coordinates,
        magnitude,
        depth: info.depth,
        wz_map: non_empty(info.wz_map),
        tt_map: non_empty(info.tt_map),
        ssh_map: non_empty(info.ssh_map),
        warning_zones,
    })
}

/// Convert one feature of a QL collection into a typed reading.
pub fn parse_reading(raw: RawFeature) -> Result<RealtimeReading> {
    let props = raw.properties;
    let magnitude = parse_f64(&props.mag, "mag")?;
    let depth = parse_f64(&props.depth, "depth")?;
    let phase = props
        .phase
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::Malformed(format!("fase: {:?}", props.phase)))?;

    Ok(RealtimeReading {
        place: props.place,
        time: props.time,
        magnitude,
        depth,
        coordinates: raw.geometry.coordinates,
        phase,
        status: props.status,
    })
}

/// The newest reading of a collection. By provider convention `lastQL.json`
/// carries exactly one relevant feature; an empty collection is an error.
pub fn first_reading(raw: RawFeatureCollection) -> Result<RealtimeReading> {
    let first = raw.features.into_iter().next().ok_or(Error::EmptyFeed)?;
    parse_reading(first)
}

/// Every reading of a collection, in published order (`gempaQL.json`).
pub fn parse_collection(raw: RawFeatureCollection) -> Result<Vec<RealtimeReading>> {
    raw.features.into_iter().map(parse_reading).collect()
}

/// Parse the bulletin's `"lon,lat"` point string into degrees.
fn parse_point(s: &str) -> Result<(f64, f64)> {
    let mut parts = s.split(',');
    let lon = parts.next().unwrap_or("");
    let lat = parts
        .next()
        .ok_or_else(|| Error::Malformed(format!("point coordinates: {s:?}")))?;
    Ok((
        parse_f64(lon, "point longitude")?,
        parse_f64(lat, "point latitude")?,
    ))
}

fn parse_f64(s: &str, field: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| Error::Malformed(format!("{field}: {s:?}")))
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
