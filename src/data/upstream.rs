//! Public data API client.
//!
//! # Responsibilities
//! - Fetch the full entry collection from the configured URL
//! - Enforce a bounded timeout on every fetch
//! - Distinguish transport, status and decode failures for logging
//!
//! No caching: every call goes to the network.

use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::ApiError;
use crate::observability::metrics;

/// Errors from the public data API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream URL '{0}'")]
    InvalidUrl(String),

    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("upstream body could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        tracing::error!(error = %err, "Error fetching API data");
        ApiError::UpstreamUnavailable("Failed to fetch data from the API".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct EntriesPayload {
    entries: Vec<Value>,
}

/// HTTP client for the entries collection.
#[derive(Debug, Clone)]
pub struct EntriesClient {
    client: reqwest::Client,
    url: Url,
}

impl EntriesClient {
    /// Build a client from configuration. The timeout covers the whole request.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let url = Url::parse(&config.entries_url)
            .map_err(|_| UpstreamError::InvalidUrl(config.entries_url.clone()))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(UpstreamError::Client)?;

        Ok(Self { client, url })
    }

    /// Fetch every entry.
    pub async fn fetch_entries(&self) -> Result<Vec<Value>, UpstreamError> {
        let started = Instant::now();
        let result = self.fetch().await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::record_upstream("entries", outcome, started);
        match &result {
            Ok(entries) => tracing::debug!(
                count = entries.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Fetched entries"
            ),
            Err(e) => tracing::warn!(url = %self.url, error = %e, "Entries fetch failed"),
        }

        result
    }

    async fn fetch(&self) -> Result<Vec<Value>, UpstreamError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(UpstreamError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let payload: EntriesPayload = response.json().await.map_err(UpstreamError::Decode)?;
        Ok(payload.entries)
    }

    /// The URL this client fetches from.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_url() {
        let config = UpstreamConfig {
            entries_url: "not a url".into(),
            timeout_secs: 1,
        };
        assert!(matches!(
            EntriesClient::new(&config),
            Err(UpstreamError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_transport_error() {
        let config = UpstreamConfig {
            entries_url: "http://127.0.0.1:1/entries".into(),
            timeout_secs: 1,
        };
        let client = EntriesClient::new(&config).unwrap();
        assert!(matches!(
            client.fetch_entries().await,
            Err(UpstreamError::Transport(_))
        ));
    }

    #[test]
    fn test_maps_to_upstream_unavailable() {
        let err: ApiError = UpstreamError::Status(503).into();
        assert_eq!(err.user_message(), "Failed to fetch data from the API");
        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
