//! Worker pool behavior against an in-memory fetcher.

use std::sync::Arc;
use std::time::Duration;

use qsearch_common::{CatalogError, Result};
use qsearch_pipeline::testing::MemoryFetcher;
use qsearch_pipeline::{CancellationToken, Decoder, Policy, RequestTarget, WorkerPool};

// ---------------------------------------------------------------------------
// Test decoder: each non-empty line of the body is an entry id. A body of
// "garbage" is a decode failure.
// ---------------------------------------------------------------------------

struct LinesDecoder;

impl Decoder for LinesDecoder {
    type Item = String;

    fn decode(&self, target: &RequestTarget, body: &[u8]) -> Result<Vec<(String, String)>> {
        let text = std::str::from_utf8(body).map_err(|e| CatalogError::Decode(e.to_string()))?;
        if text == "garbage" {
            return Err(CatalogError::Decode("unexpected body".into()));
        }
        Ok(text
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| (l.to_string(), target.key().to_string()))
            .collect())
    }
}

fn url(id: &str) -> String {
    format!("http://catalog.test/{id}")
}

fn targets(ids: &[&str]) -> Vec<RequestTarget> {
    ids.iter().map(|id| RequestTarget::new(*id, url(id))).collect()
}

#[tokio::test]
async fn tolerant_run_skips_failures() {
    let fetcher = MemoryFetcher::new()
        .with_body(url("a"), "a")
        .with_body(url("b"), "b")
        .with_status(url("c"), 500)
        .with_body(url("d"), "garbage")
        .with_network_error(url("e"), "connection reset")
        .with_body(url("f"), "f");

    let pool = WorkerPool::new(Arc::new(fetcher), 3);
    let harvest = pool
        .run(
            targets(&["a", "b", "c", "d", "e", "f"]),
            Arc::new(LinesDecoder),
            Policy::Tolerant,
        )
        .await
        .unwrap();

    assert_eq!(harvest.len(), 3);
    assert_eq!(
        harvest.items.keys().cloned().collect::<Vec<_>>(),
        vec!["a", "b", "f"]
    );

    let mut failed: Vec<&str> = harvest.failures.iter().map(|f| f.key.as_str()).collect();
    failed.sort_unstable();
    assert_eq!(failed, vec!["c", "d", "e"]);

    let transport = harvest
        .failures
        .iter()
        .filter(|f| f.error.is_transport())
        .count();
    assert_eq!(transport, 2);
}

#[tokio::test]
async fn strict_run_surfaces_the_failure() {
    let fetcher = MemoryFetcher::new()
        .with_body(url("a"), "2014p1\n2014p2")
        .with_status(url("b"), 502)
        .with_body(url("c"), "2014p3");

    let pool = WorkerPool::new(Arc::new(fetcher), 2);
    let err = pool
        .run(targets(&["a", "b", "c"]), Arc::new(LinesDecoder), Policy::Strict)
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Status { status: 502, .. }));
}

#[tokio::test]
async fn strict_failure_releases_hung_workers() {
    let fetcher = MemoryFetcher::new()
        .with_hang(url("a"))
        .with_hang(url("b"))
        .with_status(url("c"), 500)
        .with_hang(url("d"));

    let pool = WorkerPool::new(Arc::new(fetcher), 4);
    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        pool.run(targets(&["a", "b", "c", "d"]), Arc::new(LinesDecoder), Policy::Strict),
    )
    .await
    .expect("run should finish once the failure cancels the hung workers");

    assert!(matches!(outcome, Err(CatalogError::Status { status: 500, .. })));
}

#[tokio::test]
async fn strict_run_merges_overlapping_chunks() {
    let fetcher = MemoryFetcher::new()
        .with_body(url("2013"), "2013p1\n2013p2")
        .with_body(url("2014"), "2013p2\n2014p1");

    let pool = WorkerPool::new(Arc::new(fetcher), 2);
    let harvest = pool
        .run(targets(&["2013", "2014"]), Arc::new(LinesDecoder), Policy::Strict)
        .await
        .unwrap();

    assert_eq!(harvest.len(), 3);
    assert!(harvest.failures.is_empty());
}

#[tokio::test]
async fn concurrency_is_bounded_by_pool_size() {
    let ids: Vec<String> = (0..24).map(|i| format!("id{i}")).collect();
    let mut fetcher = MemoryFetcher::new().with_delay(Duration::from_millis(20));
    for id in &ids {
        fetcher = fetcher.with_body(url(id), id.clone());
    }
    let fetcher = Arc::new(fetcher);

    let pool = WorkerPool::new(fetcher.clone(), 4);
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let harvest = pool
        .run(targets(&id_refs), Arc::new(LinesDecoder), Policy::Tolerant)
        .await
        .unwrap();

    assert_eq!(harvest.len(), 24);
    assert_eq!(fetcher.requests(), 24);
    assert!(fetcher.peak_in_flight() <= 4);
    assert!(fetcher.peak_in_flight() >= 2);
}

#[tokio::test]
async fn external_cancellation_stops_the_run() {
    let fetcher = MemoryFetcher::new().with_hang(url("a")).with_hang(url("b"));
    let token = CancellationToken::new();
    let pool = WorkerPool::new(Arc::new(fetcher), 2).with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        pool.run(targets(&["a", "b"]), Arc::new(LinesDecoder), Policy::Tolerant),
    )
    .await
    .expect("cancellation should end the run");

    canceller.await.unwrap();
    assert!(matches!(outcome, Err(CatalogError::Cancelled)));
}

#[tokio::test]
async fn empty_input_yields_empty_harvest() {
    let pool = WorkerPool::new(Arc::new(MemoryFetcher::new()), 3);
    let harvest = pool
        .run(Vec::new(), Arc::new(LinesDecoder), Policy::Strict)
        .await
        .unwrap();
    assert!(harvest.is_empty());
}

#[tokio::test]
async fn pool_is_reusable_after_a_strict_abort() {
    let fetcher = Arc::new(
        MemoryFetcher::new()
            .with_status(url("bad"), 500)
            .with_body(url("good"), "2014p1"),
    );
    let pool = WorkerPool::new(fetcher, 2);

    assert!(pool
        .run(targets(&["bad"]), Arc::new(LinesDecoder), Policy::Strict)
        .await
        .is_err());

    let harvest = pool
        .run(targets(&["good"]), Arc::new(LinesDecoder), Policy::Strict)
        .await
        .unwrap();
    assert_eq!(harvest.len(), 1);
}
