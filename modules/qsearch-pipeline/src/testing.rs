//! In-memory [`Fetcher`] for tests and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use qsearch_common::{CatalogError, Result};

use crate::fetcher::Fetcher;
use crate::target::RequestTarget;

#[derive(Debug, Clone)]
enum Canned {
    Body(Bytes),
    Status(u16),
    Network(String),
    Hang,
}

/// Serves canned responses by URL. Unknown URLs answer 404.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    responses: HashMap<String, Canned>,
    delay: Option<Duration>,
    requests: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.responses.insert(url.into(), Canned::Body(body.into()));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), Canned::Status(status));
        self
    }

    pub fn with_network_error(mut self, url: impl Into<String>, message: &str) -> Self {
        self.responses
            .insert(url.into(), Canned::Network(message.to_string()));
        self
    }

    /// The URL never answers; only cancellation gets a worker out.
    pub fn with_hang(mut self, url: impl Into<String>) -> Self {
        self.responses.insert(url.into(), Canned::Hang);
        self
    }

    /// Sleep this long before every response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests started so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Most requests ever in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, target: &RequestTarget) -> Result<Bytes> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.responses.get(target.as_url()) {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(CatalogError::Status {
                status: *status,
                message: String::new(),
            }),
            Some(Canned::Network(message)) => Err(CatalogError::Network(message.clone())),
            Some(Canned::Hang) => std::future::pending().await,
            None => Err(CatalogError::Status {
                status: 404,
                message: format!("no canned response for {}", target.as_url()),
            }),
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}
