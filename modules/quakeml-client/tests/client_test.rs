//! Tolerant bulk fetches against canned catalog responses.

use std::sync::Arc;

use qsearch_common::{CatalogError, IncompleteDocument};
use qsearch_pipeline::testing::MemoryFetcher;
use quakeml_client::{Catalog, QuakeMlClient};

const BASE: &str = "http://sc3.test/";

fn fixture(name: &str) -> Vec<u8> {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read(&path).unwrap_or_else(|e| panic!("reading {path}: {e}"))
}

fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn failures_are_dropped_from_the_result() {
    let fetcher = MemoryFetcher::new()
        .with_body(format!("{BASE}2012p070732.xml"), fixture("2012p070732-sc3.xml"))
        .with_body(
            format!("{BASE}2012p070733.xml"),
            fixture("2012p070732-missing-sc3.xml"),
        )
        .with_body(format!("{BASE}999.xml"), fixture("999.xml"))
        .with_status(format!("{BASE}2012p070734.xml"), 503);

    let client = QuakeMlClient::new(Arc::new(fetcher), Catalog::seiscompml07(BASE), 15);
    let harvest = client
        .get(&ids(&["2012p070732", "2012p070733", "999", "2012p070734"]))
        .await
        .unwrap();

    assert_eq!(harvest.len(), 1);
    let event = &harvest.items["2012p070732"];
    assert_eq!(event.public_id, "2012p070732");

    assert_eq!(harvest.failures.len(), 3);
    let missing = harvest
        .failures
        .iter()
        .find(|f| f.key == "2012p070733")
        .unwrap();
    assert!(matches!(
        missing.error,
        CatalogError::Incomplete(IncompleteDocument::MissingPreferredOrigin)
    ));
}

#[tokio::test]
async fn results_are_keyed_by_requested_id() {
    // The document's own public id differs from the id used to fetch it.
    let fetcher = MemoryFetcher::new().with_body(
        "http://quakeml.test/2014p562279",
        fixture("2014p562279-quakeml.xml"),
    );

    let client = QuakeMlClient::new(
        Arc::new(fetcher),
        Catalog::quakeml12("http://quakeml.test/"),
        4,
    );
    let harvest = client.get(&ids(&["2014p562279"])).await.unwrap();

    let event = &harvest.items["2014p562279"];
    assert_eq!(event.public_id, "smi:nz.org.geonet/2014p562279");
}

#[tokio::test]
async fn no_ids_means_no_requests() {
    let fetcher = Arc::new(MemoryFetcher::new());
    let client = QuakeMlClient::new(fetcher.clone(), Catalog::quakeml12("http://quakeml.test/"), 4);

    let harvest = client.get(&[]).await.unwrap();
    assert!(harvest.is_empty());
    assert_eq!(fetcher.requests(), 0);
}

#[tokio::test]
async fn get_one_returns_the_failure() {
    let fetcher = MemoryFetcher::new().with_status("http://quakeml.test/2014p1", 404);
    let client = QuakeMlClient::new(
        Arc::new(fetcher),
        Catalog::quakeml12("http://quakeml.test/"),
        1,
    );

    let err = client.get_one("2014p1").await.unwrap_err();
    assert!(matches!(err, CatalogError::Status { status: 404, .. }));
}
