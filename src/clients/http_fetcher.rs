//! reqwest-backed network boundary.

use crate::config::AppConfig;
use crate::framework::{FetchError, Fetcher, Submitter};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// HTTP client for the portfolio backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::build(None)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        Self::build(Some(timeout))
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::build(config.request_timeout)
    }

    fn build(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(transport)?;
        Ok(Self { client })
    }
}

fn transport(e: reqwest::Error) -> FetchError {
    FetchError::Transport(e.to_string())
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn get(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        debug!(status = status.as_u16(), "Response received");
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Submitter for HttpFetcher {
    /// Returns the status of a 2xx answer; anything else is [`FetchError::Status`].
    #[instrument(skip(self, body))]
    async fn post(&self, url: &str, body: Value) -> Result<u16, FetchError> {
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        debug!(status = status.as_u16(), "Response received");
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(status.as_u16())
    }
}
