#![allow(dead_code)]

use quakewatch::{Error, ErrorSink, Feed};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Minimal HTTP/1.1 fixture server backed by a path -> (status, body) table.
/// Routes can be swapped at runtime to script provider behavior.
pub struct FixtureServer {
    pub addr: SocketAddr,
    routes: Arc<Mutex<HashMap<String, (u16, String)>>>,
}

impl FixtureServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Arc<Mutex<HashMap<String, (u16, String)>>> =
            Arc::new(Mutex::new(HashMap::new()));

        let table = routes.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let table = table.clone();
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        let n = socket.read(&mut chunk).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        request.extend_from_slice(&chunk[..n]);
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let head = String::from_utf8_lossy(&request);
                    let target = head.split_whitespace().nth(1).unwrap_or("/");
                    // The alert and realtime endpoints carry a cache-buster
                    // query; routing is by path only.
                    let path = target.split('?').next().unwrap_or(target).to_string();

                    let (status, body) = table
                        .lock()
                        .unwrap()
                        .get(&path)
                        .cloned()
                        .unwrap_or((404, String::new()));
                    let reason = if status == 200 { "OK" } else { "Error" };
                    let response = format!(
                        "HTTP/1.1 {status} {reason}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { addr, routes }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set(&self, path: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub fn remove(&self, path: &str) {
        self.routes.lock().unwrap().remove(path);
    }
}

/// Provider-shaped alert bulletin payload.
pub fn alert_json(identifier: &str, event_id: &str) -> String {
    serde_json::json!({
        "code": "TEW",
        "identifier": identifier,
        "msgType": "Alert",
        "scope": "Public",
        "sender": "BMKG",
        "sent": "2024-01-01T00:00:00+07:00",
        "status": "Actual",
        "info": {
            "area": "Banten",
            "date": "01 Jan 2024",
            "depth": "10 km",
            "description": "Gempa Mag:5.6",
            "event": "gempabumi",
            "eventid": event_id,
            "felt": "III Bayah",
            "headline": "Gempa Mag:5.6, tidak berpotensi tsunami",
            "instruction": "Tetap tenang",
            "latitude": "6.76 LS",
            "longitude": "106.53 BT",
            "magnitude": "5.6",
            "point": { "coordinates": "106.53,-6.76" },
            "potential": "tidak berpotensi tsunami",
            "shakemap": "shakemap.jpg",
            "subject": "Info Gempa",
            "time": "00:00:00 WIB",
            "timesent": "20240101000000"
        }
    })
    .to_string()
}

/// Provider-shaped QL feature collection with one feature per timestamp.
pub fn ql_json(times: &[&str]) -> String {
    let features: Vec<serde_json::Value> = times
        .iter()
        .map(|time| {
            serde_json::json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": ["106.53", "-6.76", 10.0]
                },
                "properties": {
                    "depth": "10",
                    "fase": "25",
                    "id": "evt-1",
                    "mag": "5.6",
                    "place": "Banten",
                    "status": "automatic",
                    "time": time
                }
            })
        })
        .collect();
    serde_json::json!({ "type": "FeatureCollection", "features": features }).to_string()
}

/// Error sink that records every reported tick failure.
#[derive(Default)]
pub struct RecordingSink {
    errors: Mutex<Vec<(Feed, String)>>,
}

impl RecordingSink {
    pub fn count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }

    pub fn count_for(&self, feed: Feed) -> usize {
        self.errors
            .lock()
            .unwrap()
            .iter()
            .filter(|(f, _)| *f == feed)
            .count()
    }
}

impl ErrorSink for RecordingSink {
    fn poll_error(&self, feed: Feed, error: &Error) {
        self.errors.lock().unwrap().push((feed, error.to_string()));
    }
}

/// Error sink for tests that do not care about failures.
pub struct NullSink;

impl ErrorSink for NullSink {
    fn poll_error(&self, _feed: Feed, _error: &Error) {}
}
