pub mod query;
pub mod types;

pub use query::{Query, UNSET_MAGNITUDE, UNSET_PHASE_COUNT};
pub use types::decode_features;

use std::collections::BTreeMap;
use std::sync::Arc;

use qsearch_common::fields::{event_fields, FieldMap};
use qsearch_common::{Config, Feature, Result};
use qsearch_pipeline::{
    CancellationToken, Decoder, Fetcher, Harvest, Policy, RequestTarget, WorkerPool,
};
use tracing::info;

/// Keys each decoded feature by its public id.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureDecoder;

impl Decoder for FeatureDecoder {
    type Item = Feature;

    fn decode(&self, _target: &RequestTarget, body: &[u8]) -> Result<Vec<(String, Feature)>> {
        Ok(decode_features(body)?
            .into_iter()
            .map(|f| (f.public_id.clone(), f))
            .collect())
    }
}

pub struct WfsClient {
    pool: WorkerPool,
    base_url: String,
}

impl WfsClient {
    pub fn new(fetcher: Arc<dyn Fetcher>, base_url: impl Into<String>, workers: usize) -> Self {
        Self {
            pool: WorkerPool::new(fetcher, workers),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(fetcher: Arc<dyn Fetcher>, config: &Config) -> Self {
        Self::new(fetcher, config.wfs_url.clone(), config.range_workers)
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.pool = self.pool.with_cancellation(token);
        self
    }

    /// Run the search one calendar-year chunk per request. Any failed chunk
    /// fails the whole search; features seen in two chunks are kept once.
    pub async fn search(&self, query: &Query) -> Result<BTreeMap<String, Feature>> {
        query.validate()?;

        let targets: Vec<RequestTarget> = query
            .chunks()
            .iter()
            .map(|chunk| RequestTarget::url(chunk.url(&self.base_url)))
            .collect();
        let chunks = targets.len();

        let features = self
            .pool
            .run(targets, Arc::new(FeatureDecoder), Policy::Strict)
            .await
            .map(Harvest::into_items)?;

        info!(chunks, quakes = features.len(), "Found quakes from the WFS");
        Ok(features)
    }

    /// [`search`](Self::search), rendered as event field maps.
    pub async fn quakes(&self, query: &Query) -> Result<Vec<FieldMap>> {
        let features = self.search(query).await?;
        Ok(features.values().map(event_fields).collect())
    }
}
