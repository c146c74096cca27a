//! Bulk retrieval of per-event detail documents.
//!
//! A [`QuakeMlClient`] fetches one document per public id through a bounded
//! worker pool, decodes it in the catalog's [`Dialect`] and links it into an
//! [`EventDocument`]. Failures are logged and skipped, so the result may hold
//! fewer events than were asked for.

pub mod catalog;
pub mod dialect;
pub mod json;
pub mod quakeml12;
pub mod seiscompml07;
mod wire;

pub use catalog::{Catalog, EventDecoder};
pub use dialect::Dialect;

use std::sync::Arc;

use qsearch_common::{CatalogError, EventDocument, Result};
use qsearch_pipeline::{CancellationToken, Fetcher, Harvest, Policy, WorkerPool};
use tracing::info;

pub struct QuakeMlClient {
    pool: WorkerPool,
    catalog: Catalog,
}

impl QuakeMlClient {
    pub fn new(fetcher: Arc<dyn Fetcher>, catalog: Catalog, workers: usize) -> Self {
        Self {
            pool: WorkerPool::new(fetcher, workers),
            catalog,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.pool = self.pool.with_cancellation(token);
        self
    }

    /// Fetch every id, keeping the ones that decode and link. Keys in the
    /// result are the requested ids.
    pub async fn get(&self, public_ids: &[String]) -> Result<Harvest<EventDocument>> {
        let targets = public_ids
            .iter()
            .map(|id| self.catalog.target(id))
            .collect();
        let decoder = Arc::new(EventDecoder::new(self.catalog.dialect()));

        let harvest = self.pool.run(targets, decoder, Policy::Tolerant).await?;

        info!(
            requested = public_ids.len(),
            fetched = harvest.len(),
            failed = harvest.failures.len(),
            dialect = self.catalog.dialect().name(),
            "Downloaded quakes"
        );
        Ok(harvest)
    }

    /// Fetch a single event. Any failure is returned.
    pub async fn get_one(&self, public_id: &str) -> Result<EventDocument> {
        let decoder = Arc::new(EventDecoder::new(self.catalog.dialect()));
        let mut harvest = self
            .pool
            .run(vec![self.catalog.target(public_id)], decoder, Policy::Strict)
            .await?;
        harvest.items.remove(public_id).ok_or_else(|| {
            CatalogError::Decode(format!("no event decoded for {public_id}"))
        })
    }
}
