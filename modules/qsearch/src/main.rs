mod cli;
mod output;

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use qsearch_common::fields::{arrival_rows, event_fields, pick_rows};
use qsearch_common::{Config, EventDocument};
use qsearch_pipeline::{CancellationToken, Fetcher, HttpFetcher};
use quakeml_client::{Catalog, QuakeMlClient};
use wfs_client::WfsClient;

use crate::cli::{Cli, Request};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only CSV.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("qsearch=info".parse()?)
                .add_directive("quakeml_client=info".parse()?)
                .add_directive("wfs_client=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    let request = Cli::parse().into_request()?;

    let config = Config::from_env()?;
    config.log_summary();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling fetches");
            on_interrupt.cancel();
        }
    });

    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(config.http_timeout)?);

    info!("Searching the WFS");
    let wfs = WfsClient::from_config(fetcher.clone(), &config).with_cancellation(cancel.clone());
    let features = wfs.search(&request.query).await?;

    let details = if request.needs_details() {
        fetch_details(&request, &config, fetcher, cancel, features.keys().cloned().collect())
            .await?
    } else {
        BTreeMap::new()
    };

    let mut out = io::stdout().lock();
    if let Some(selection) = &request.event {
        output::write_table(
            &mut out,
            selection,
            request.header,
            features.values().map(event_fields),
        )?;
    }
    if let Some(selection) = &request.picks {
        output::write_table(
            &mut out,
            selection,
            request.header,
            details.iter().flat_map(|(id, event)| pick_rows(id, event)),
        )?;
    }
    if let Some(selection) = &request.arrivals {
        output::write_table(
            &mut out,
            selection,
            request.header,
            details.iter().flat_map(|(id, event)| arrival_rows(id, event)),
        )?;
    }
    out.flush()?;

    Ok(())
}

/// Detail documents for every id the WFS returned. Ids whose documents could
/// not be fetched or linked are left out.
async fn fetch_details(
    request: &Request,
    config: &Config,
    fetcher: Arc<dyn Fetcher>,
    cancel: CancellationToken,
    ids: Vec<String>,
) -> Result<BTreeMap<String, EventDocument>> {
    let catalog = Catalog::from_config(request.dialect, config);
    info!(
        quakes = ids.len(),
        dialect = catalog.dialect().name(),
        "Searching for quake details. This can take some time."
    );

    let client =
        QuakeMlClient::new(fetcher, catalog, config.id_workers).with_cancellation(cancel);
    let harvest = client.get(&ids).await?;

    info!(quakes = harvest.len(), "Found quake details");
    let missing = ids.len().saturating_sub(harvest.len());
    if missing > 0 {
        warn!(
            missing,
            "Failed to find details for some quakes. These might be in The Gap \
             (http://info.geonet.org.nz/display/appdata/The+Gap)."
        );
    }

    Ok(harvest.into_items())
}
