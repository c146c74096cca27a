//! Chunked strict searches against canned WFS responses.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use qsearch_common::CatalogError;
use qsearch_pipeline::testing::MemoryFetcher;
use wfs_client::{Query, WfsClient};

const BASE: &str = "http://wfs.test/ows?service=WFS&outputFormat=json";

fn t(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap()
}

fn collection(ids: &[&str]) -> String {
    let features: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                r#"{{"type":"Feature","properties":{{"publicid":"{id}","magnitude":3.1,"depth":12.5,"usedphasecount":null}}}}"#
            )
        })
        .collect();
    format!(
        r#"{{"type":"FeatureCollection","features":[{}]}}"#,
        features.join(",")
    )
}

fn two_year_query() -> Query {
    Query::by_time(t(2012, 6, 1), t(2014, 3, 1))
}

fn chunk_urls(query: &Query) -> Vec<String> {
    query.chunks().iter().map(|c| c.url(BASE)).collect()
}

#[tokio::test]
async fn merges_chunks_and_drops_boundary_duplicates() {
    let urls = chunk_urls(&two_year_query());
    assert_eq!(urls.len(), 3);

    let fetcher = MemoryFetcher::new()
        .with_body(urls[0].clone(), collection(&["2012p1", "2013p1"]))
        .with_body(urls[1].clone(), collection(&["2013p1", "2013p2"]))
        .with_body(urls[2].clone(), collection(&["2014p1"]));

    let client = WfsClient::new(Arc::new(fetcher), BASE, 10);
    let features = client.search(&two_year_query()).await.unwrap();

    assert_eq!(
        features.keys().cloned().collect::<Vec<_>>(),
        vec!["2012p1", "2013p1", "2013p2", "2014p1"]
    );
    assert_eq!(features["2014p1"].magnitude, 3.1);
    assert_eq!(features["2014p1"].used_phase_count, 0);
}

#[tokio::test]
async fn one_failed_chunk_fails_the_search() {
    let urls = chunk_urls(&two_year_query());
    let fetcher = MemoryFetcher::new()
        .with_body(urls[0].clone(), collection(&["2012p1"]))
        .with_status(urls[1].clone(), 500)
        .with_body(urls[2].clone(), collection(&["2014p1"]));

    let client = WfsClient::new(Arc::new(fetcher), BASE, 10);
    let err = client.search(&two_year_query()).await.unwrap_err();

    assert!(matches!(err, CatalogError::Status { status: 500, .. }));
}

#[tokio::test]
async fn undecodable_chunk_fails_the_search() {
    let query = Query::by_event_id("2014p549333");
    let fetcher = MemoryFetcher::new().with_body(query.url(BASE), "<html>busy</html>");

    let client = WfsClient::new(Arc::new(fetcher), BASE, 10);
    let err = client.search(&query).await.unwrap_err();

    assert!(matches!(err, CatalogError::Decode(_)));
}

#[tokio::test]
async fn invalid_query_is_rejected_before_fetching() {
    let fetcher = Arc::new(MemoryFetcher::new());
    let client = WfsClient::new(fetcher.clone(), BASE, 10);

    let err = client
        .search(&Query::by_event_id("not-an-id"))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Validation(_)));
    assert_eq!(fetcher.requests(), 0);
}

#[tokio::test]
async fn quakes_render_event_fields() {
    let query = Query::by_event_id("2014p549333");
    let fetcher = MemoryFetcher::new().with_body(query.url(BASE), collection(&["2014p549333"]));

    let client = WfsClient::new(Arc::new(fetcher), BASE, 10);
    let quakes = client.quakes(&query).await.unwrap();

    assert_eq!(quakes.len(), 1);
    assert_eq!(quakes[0]["EventID"], "2014p549333");
    assert_eq!(quakes[0]["Depth"], "12.500000");
    assert_eq!(quakes[0]["Magnitude"], "3.1");
}
