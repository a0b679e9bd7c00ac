// File: ./src/source.rs
//! The raw feed boundary: fetch bytes, decode them into raw rows.
//!
//! Two payload shapes exist in the wild: a JSON array of field-named objects
//! and a delimited-text table whose first record is the header. Both decode
//! into the same `RawRow` maps so the normalizer never needs to know which
//! one it got.

use crate::model::normalize::RawRow;
use http::header::CACHE_CONTROL;
use http::{Request, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use thiserror::Error;

/// The only failure that crosses the core boundary. Everything row-level is
/// absorbed by normalization defaults instead.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid feed URL: {0}")]
    InvalidUrl(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("feed endpoint returned status {0}")]
    Status(u16),

    #[error("failed to read feed body: {0}")]
    Body(String),

    #[error("malformed feed payload: {0}")]
    Decode(String),
}

/// Expected wire shape of the feed. `Auto` sniffs the body: JSON payloads
/// start with `[` or `{`, everything else is treated as delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    #[default]
    Auto,
    Json,
    Csv,
}

/// Abstract source of raw feed rows. One call per render cycle.
pub trait EventSource {
    fn fetch(&self) -> impl Future<Output = Result<Vec<RawRow>, FetchError>> + Send;
}

/// A canned source for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub rows: Vec<RawRow>,
}

impl EventSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<RawRow>, FetchError> {
        Ok(self.rows.clone())
    }
}

// --- Payload decoding ---

fn lower_key(key: &str) -> String {
    key.trim().to_lowercase()
}

fn decode_json(body: &str) -> Result<Vec<RawRow>, FetchError> {
    let values: Vec<HashMap<String, serde_json::Value>> =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    let rows = values
        .into_iter()
        .map(|object| {
            object
                .into_iter()
                .map(|(key, value)| {
                    let text = match value {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    (lower_key(&key), text)
                })
                .collect()
        })
        .collect();
    Ok(rows)
}

fn decode_csv(body: &str) -> Result<Vec<RawRow>, FetchError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| FetchError::Decode(e.to_string()))?
        .iter()
        .map(lower_key)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| FetchError::Decode(e.to_string()))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), cell.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Decode a feed body into raw rows according to `format`.
pub fn decode_payload(body: &str, format: FeedFormat) -> Result<Vec<RawRow>, FetchError> {
    let trimmed = body.trim_start();
    match format {
        FeedFormat::Json => decode_json(trimmed),
        FeedFormat::Csv => decode_csv(body),
        FeedFormat::Auto => {
            if trimmed.starts_with('[') || trimmed.starts_with('{') {
                decode_json(trimmed)
            } else {
                decode_csv(body)
            }
        }
    }
}

// --- HTTP source ---

type HttpsClient = Client<
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
    String,
>;

/// Fetches the feed over HTTP(S) with `Cache-Control: no-store`, so each
/// cycle sees a fresh snapshot.
#[derive(Clone, Debug)]
pub struct HttpEventSource {
    client: HttpsClient,
    url: Uri,
    format: FeedFormat,
}

impl HttpEventSource {
    pub fn new(url: &str, format: FeedFormat) -> Result<Self, FetchError> {
        let uri: Uri = url
            .parse()
            .map_err(|e: http::uri::InvalidUri| FetchError::InvalidUrl(e.to_string()))?;

        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        root_store.add_parsable_certificates(result.certs);
        if root_store.is_empty() {
            // Plain-http feeds still work; https ones will fail the handshake.
            log::warn!("no usable system certificates found");
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(https_connector);
        Ok(Self {
            client,
            url: uri,
            format,
        })
    }
}

impl EventSource for HttpEventSource {
    async fn fetch(&self) -> Result<Vec<RawRow>, FetchError> {
        let request = Request::builder()
            .uri(self.url.clone())
            .header(CACHE_CONTROL, "no-store")
            .body(String::new())
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?
            .to_bytes();
        let body = String::from_utf8_lossy(&bytes);

        let rows = decode_payload(&body, self.format)?;
        log::debug!("fetched {} raw rows from {}", rows.len(), self.url);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_objects_become_lowercased_string_rows() {
        let body = r#"[{"Event_Name":"Hack Night","count":3,"url":null}]"#;
        let rows = decode_payload(body, FeedFormat::Auto).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["event_name"], "Hack Night");
        assert_eq!(rows[0]["count"], "3");
        assert_eq!(rows[0]["url"], "");
    }

    #[test]
    fn csv_header_maps_fields_with_quoting() {
        let body = "event_name,venue,description\nHack Night,Lab 2,\"Bring laptops, \"\"chargers\"\"\"\n";
        let rows = decode_payload(body, FeedFormat::Auto).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["event_name"], "Hack Night");
        assert_eq!(rows[0]["description"], "Bring laptops, \"chargers\"");
    }

    #[test]
    fn equivalent_payloads_decode_identically() {
        let json = r#"[{"event_name":"A","venue":"Hall"}]"#;
        let csv = "event_name,venue\nA,Hall\n";
        assert_eq!(
            decode_payload(json, FeedFormat::Json).unwrap(),
            decode_payload(csv, FeedFormat::Csv).unwrap()
        );
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = decode_payload("[{helf", FeedFormat::Json).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
