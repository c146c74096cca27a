use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use qsearch_common::{CatalogError, Result};
use tracing::debug;

use crate::target::RequestTarget;

// --- Fetcher trait ---

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieve the body for a target. A non-success status is an error.
    async fn fetch(&self, target: &RequestTarget) -> Result<Bytes>;
    fn name(&self) -> &str;
}

// --- Plain HTTP GET fetcher ---

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// `timeout` bounds each whole request; `None` leaves it unbounded.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("qsearch/0.1");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CatalogError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, target: &RequestTarget) -> Result<Bytes> {
        debug!(url = target.as_url(), "GET");

        let resp = self
            .client
            .get(target.as_url())
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message,
            });
        }

        resp.bytes()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))
    }

    fn name(&self) -> &str {
        "http"
    }
}
