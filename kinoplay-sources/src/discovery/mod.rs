//! Discovery provider client.
//!
//! Discovery returns a live list of players for a film as a JSON array of
//! `{ source, iframeUrl, quality? }` records. The payload is validated
//! defensively: anything that is not an array is malformed, and individual
//! records with missing fields or unusable URLs are dropped.

use std::time::Duration;

use async_trait::async_trait;
use kinoplay_core::CatalogId;
use kinoplay_core::config::{CATALOG_ID_PLACEHOLDER, DiscoveryConfig};
use serde_json::Value;
use url::Url;

use crate::errors::SourceError;
use crate::providers::is_web_url;

#[cfg(test)]
pub(crate) mod mock;

/// One usable record from a discovery response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredSource {
    pub name: String,
    pub url: Url,
    pub quality: Option<String>,
}

/// Trait for discovery backends.
///
/// Implementations fetch the live provider list for a film (HTTP in
/// production, scripted doubles in tests).
#[async_trait]
pub trait DiscoveryClient: Send + Sync + std::fmt::Debug {
    /// Fetch playable sources for `catalog_id`, in the provider's order.
    ///
    /// # Errors
    /// - `SourceError::Network` - Request could not be completed
    /// - `SourceError::HttpStatus` - Non-success status
    /// - `SourceError::MalformedResponse` - Payload is not a JSON array
    /// - `SourceError::Timeout` - Deadline expired
    async fn discover(&self, catalog_id: CatalogId) -> Result<Vec<DiscoveredSource>, SourceError>;
}

/// HTTP discovery client.
#[derive(Debug, Clone)]
pub struct HttpDiscoveryClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpDiscoveryClient {
    /// Creates a client for `endpoint`, a URL template containing `{catalog_id}`.
    ///
    /// # Errors
    /// - `SourceError::InvalidEndpoint` - Placeholder missing or not an http(s) URL
    /// - `SourceError::Network` - HTTP client could not be constructed
    pub fn new(endpoint: &str, config: &DiscoveryConfig) -> Result<Self, SourceError> {
        if !endpoint.contains(CATALOG_ID_PLACEHOLDER) {
            return Err(SourceError::InvalidEndpoint {
                reason: format!("missing {CATALOG_ID_PLACEHOLDER} placeholder in {endpoint}"),
            });
        }

        let probe = endpoint.replace(CATALOG_ID_PLACEHOLDER, "1");
        let probe_url = Url::parse(&probe).map_err(|e| SourceError::InvalidEndpoint {
            reason: format!("{endpoint}: {e}"),
        })?;
        if !is_web_url(&probe_url) {
            return Err(SourceError::InvalidEndpoint {
                reason: format!("{endpoint}: not an http(s) URL"),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()
            .map_err(|e| SourceError::Network {
                reason: format!("HTTP client creation failed: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            timeout: config.timeout,
        })
    }

    /// Creates the configured client, or `None` when discovery is disabled.
    ///
    /// # Errors
    /// - `SourceError::InvalidEndpoint` - Configured endpoint is unusable
    pub fn from_config(config: &DiscoveryConfig) -> Result<Option<Self>, SourceError> {
        config
            .endpoint
            .as_deref()
            .map(|endpoint| Self::new(endpoint, config))
            .transpose()
    }

    fn request_url(&self, catalog_id: CatalogId) -> String {
        self.endpoint
            .replace(CATALOG_ID_PLACEHOLDER, &catalog_id.to_string())
    }
}

#[async_trait]
impl DiscoveryClient for HttpDiscoveryClient {
    async fn discover(&self, catalog_id: CatalogId) -> Result<Vec<DiscoveredSource>, SourceError> {
        let url = self.request_url(catalog_id);
        tracing::debug!(%catalog_id, %url, "Requesting discovery");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout {
                    after: self.timeout,
                }
            } else {
                SourceError::Network {
                    reason: format!("Discovery request failed: {e}"),
                }
            }
        })?;

        if !response.status().is_success() {
            return Err(SourceError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout {
                    after: self.timeout,
                }
            } else {
                SourceError::Network {
                    reason: format!("Reading discovery body failed: {e}"),
                }
            }
        })?;

        let payload: Value =
            serde_json::from_slice(&body).map_err(|e| SourceError::MalformedResponse {
                reason: format!("invalid JSON: {e}"),
            })?;

        parse_discovery_payload(&payload)
    }
}

/// Validates a discovery payload and keeps its usable records in order.
///
/// # Errors
/// - `SourceError::MalformedResponse` - The payload is not a JSON array
pub fn parse_discovery_payload(payload: &Value) -> Result<Vec<DiscoveredSource>, SourceError> {
    let entries = payload
        .as_array()
        .ok_or_else(|| SourceError::MalformedResponse {
            reason: format!("expected an array, got {}", json_kind(payload)),
        })?;

    let sources: Vec<DiscoveredSource> = entries
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            let source = parse_entry(entry);
            if source.is_none() {
                tracing::debug!(position, "Dropping unusable discovery entry");
            }
            source
        })
        .collect();

    Ok(sources)
}

fn parse_entry(entry: &Value) -> Option<DiscoveredSource> {
    let record = entry.as_object()?;

    let name = record.get("source")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let url = normalize_embed_url(record.get("iframeUrl")?.as_str()?)?;

    let quality = record
        .get("quality")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string);

    Some(DiscoveredSource {
        name: name.to_string(),
        url,
        quality,
    })
}

/// Parses an embed URL, upgrading protocol-relative `//host/...` to https.
fn normalize_embed_url(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    let url = if raw.starts_with("//") {
        Url::parse(&format!("https:{raw}"))
    } else {
        Url::parse(raw)
    }
    .ok()?;

    is_web_url(&url).then_some(url)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
