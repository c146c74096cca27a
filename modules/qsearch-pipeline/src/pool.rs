// Worker pool: one producer feeding request targets through a bounded
// channel to N workers, which fetch and decode and push results to a single
// aggregator. Every suspension point selects against the run's cancellation
// token, and `run` joins every task before returning.

use std::sync::Arc;

use qsearch_common::Result;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::aggregate::{self, Harvest, Policy};
use crate::fetcher::Fetcher;
use crate::target::{FetchResult, RequestTarget};

/// Turns a fetched body into keyed entries for the aggregator.
pub trait Decoder: Send + Sync + 'static {
    type Item: Send + 'static;

    fn decode(&self, target: &RequestTarget, body: &[u8]) -> Result<Vec<(String, Self::Item)>>;
}

type TargetSource = Arc<Mutex<mpsc::Receiver<RequestTarget>>>;

pub struct WorkerPool {
    fetcher: Arc<dyn Fetcher>,
    workers: usize,
    cancel: CancellationToken,
}

impl WorkerPool {
    /// A pool of `workers` concurrent fetchers (at least one).
    pub fn new(fetcher: Arc<dyn Fetcher>, workers: usize) -> Self {
        Self {
            fetcher,
            workers: workers.max(1),
            cancel: CancellationToken::new(),
        }
    }

    /// Tie runs to an external token. Cancelling it stops any run in progress,
    /// which then returns `CatalogError::Cancelled`.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Fetch and decode every target, aggregating under `policy`.
    pub async fn run<D: Decoder>(
        &self,
        targets: Vec<RequestTarget>,
        decoder: Arc<D>,
        policy: Policy,
    ) -> Result<Harvest<D::Item>> {
        // Each run gets its own token so a strict abort doesn't poison the pool.
        let run_token = self.cancel.child_token();

        debug!(
            targets = targets.len(),
            workers = self.workers,
            fetcher = self.fetcher.name(),
            ?policy,
            "Starting worker pool"
        );

        let (target_tx, target_rx) = mpsc::channel(1);
        let (result_tx, mut result_rx) = mpsc::channel(self.workers);

        let producer = tokio::spawn(produce(targets, target_tx, run_token.clone()));

        let source: TargetSource = Arc::new(Mutex::new(target_rx));
        let handles: Vec<_> = (0..self.workers)
            .map(|worker| {
                tokio::spawn(work(
                    worker,
                    source.clone(),
                    self.fetcher.clone(),
                    decoder.clone(),
                    result_tx.clone(),
                    run_token.clone(),
                ))
            })
            .collect();
        // The result channel closes once the last worker drops its sender.
        drop(result_tx);

        let outcome = aggregate::collect(&mut result_rx, policy, &run_token).await;

        run_token.cancel();
        drop(result_rx);

        if let Err(e) = producer.await {
            warn!(error = %e, "Producer task failed");
        }
        for joined in futures::future::join_all(handles).await {
            if let Err(e) = joined {
                warn!(error = %e, "Worker task failed");
            }
        }

        outcome
    }
}

async fn produce(
    targets: Vec<RequestTarget>,
    tx: mpsc::Sender<RequestTarget>,
    cancel: CancellationToken,
) {
    for target in targets {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            sent = tx.send(target) => {
                if sent.is_err() {
                    return;
                }
            }
        }
    }
}

async fn next_target(source: &TargetSource) -> Option<RequestTarget> {
    source.lock().await.recv().await
}

async fn work<D: Decoder>(
    worker: usize,
    source: TargetSource,
    fetcher: Arc<dyn Fetcher>,
    decoder: Arc<D>,
    results: mpsc::Sender<FetchResult<D::Item>>,
    cancel: CancellationToken,
) {
    loop {
        let target = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            target = next_target(&source) => match target {
                Some(target) => target,
                None => break,
            },
        };

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            body = fetcher.fetch(&target) => body,
        };

        let key = target.key().to_string();
        let result = match fetched.and_then(|body| decoder.decode(&target, &body)) {
            Ok(entries) => FetchResult::Parsed { key, entries },
            Err(error) => FetchResult::Failed { key, error },
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = results.send(result) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }
    debug!(worker, "Worker exiting");
}
