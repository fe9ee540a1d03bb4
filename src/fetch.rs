//! Fetch capability for the stats endpoint
//!
//! [`StatsSource`] is the seam between a poll cycle and the transport. The
//! production implementation, [`HttpStatsSource`], performs a plain HTTP GET
//! with a fixed timeout and hands back the body as text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{instrument, trace};

/// Errors that can occur while fetching the raw stats payload
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent (DNS, connection refused, TLS, ...)
    #[error("failed to fetch stats: {0}")]
    Request(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The endpoint answered with something other than `200 OK`
    #[error("server returned status: {0}")]
    Status(StatusCode),

    /// The response body could not be read
    #[error("failed to read response: {0}")]
    Body(#[source] reqwest::Error),
}

/// Source of raw stats payloads
///
/// Implementations must be `Send + Sync` as the source is owned by the
/// poller task.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetch one raw payload
    async fn fetch(&self) -> Result<String, FetchError>;
}

/// Fetches the payload from an HTTP endpoint
///
/// The client is built once and reused across cycles.
#[derive(Debug, Clone)]
pub struct HttpStatsSource {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpStatsSource {
    /// Create a source for `url` whose requests are bounded by `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error, body: bool) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if body {
            FetchError::Body(err)
        } else {
            FetchError::Request(err)
        }
    }
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<String, FetchError> {
        trace!("requesting stats");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.classify(e, false))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await.map_err(|e| self.classify(e, true))?;
        trace!("received {} bytes", body.len());

        Ok(body)
    }
}
