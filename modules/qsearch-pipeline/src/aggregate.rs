use std::collections::BTreeMap;

use qsearch_common::{CatalogError, Result};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::target::FetchResult;

/// Tolerant runs log progress every this many documents.
const PROGRESS_EVERY: usize = 50;

/// How the aggregator treats a failed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Log and record the failure, leave its key out, keep going.
    Tolerant,
    /// Cancel the run and return the first failure. Nothing partial is kept.
    Strict,
}

/// A target that failed under [`Policy::Tolerant`].
#[derive(Debug)]
pub struct Failure {
    pub key: String,
    pub error: CatalogError,
}

/// Collected results of a run. Later entries with the same key overwrite
/// earlier ones.
#[derive(Debug)]
pub struct Harvest<T> {
    pub items: BTreeMap<String, T>,
    pub failures: Vec<Failure>,
}

impl<T> Default for Harvest<T> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Harvest<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> BTreeMap<String, T> {
        self.items
    }
}

/// Drain `results` until every worker has exited, applying `policy`.
pub(crate) async fn collect<T>(
    results: &mut mpsc::Receiver<FetchResult<T>>,
    policy: Policy,
    cancel: &CancellationToken,
) -> Result<Harvest<T>> {
    let mut harvest = Harvest::default();
    let mut documents = 0usize;
    let mut entries_seen = 0usize;

    while let Some(result) = results.recv().await {
        match result {
            FetchResult::Parsed { key, entries } => {
                documents += 1;
                entries_seen += entries.len();
                harvest.items.extend(entries);

                match policy {
                    Policy::Strict => {
                        info!(key = key.as_str(), total = entries_seen, "Downloaded quakes");
                    }
                    Policy::Tolerant if documents % PROGRESS_EVERY == 0 => {
                        info!(total = harvest.items.len(), "Downloaded quakes");
                    }
                    Policy::Tolerant => {}
                }
            }
            FetchResult::Failed { key, error } => match policy {
                Policy::Strict => {
                    warn!(key = key.as_str(), error = %error, "Fetch failed, aborting run");
                    cancel.cancel();
                    return Err(error);
                }
                Policy::Tolerant => {
                    warn!(key = key.as_str(), error = %error, "Error fetching data");
                    harvest.failures.push(Failure { key, error });
                }
            },
        }
    }

    if cancel.is_cancelled() {
        return Err(CatalogError::Cancelled);
    }

    Ok(harvest)
}
