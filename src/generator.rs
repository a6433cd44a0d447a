//! One generation run: catalog lookup, collection walk, file write.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::catalog_lookup::CatalogClient;
use crate::collection::{CollectionFetcher, DiscogsClient};
use crate::config::AppConfig;
use crate::models::CollectionEntry;
use crate::writer::save_collection;

#[derive(Debug)]
pub struct GenerateOutcome {
    pub path: PathBuf,
    pub entries: Vec<CollectionEntry>,
}

/// Generate the collection file for `year`.
///
/// A failing catalog index only costs the artwork; any collection API
/// failure other than rate limiting or end of pages aborts the run.
pub async fn generate_collection(config: &AppConfig, year: i32) -> Result<GenerateOutcome> {
    info!(
        "Fetching {} collection for user: {}",
        year, config.fetch.username
    );

    let catalog = CatalogClient::new(config.catalog_url.as_str(), config.fetch.request_timeout)?;
    let lookup = catalog.fetch_lookup().await;

    let client = DiscogsClient::new(&config.token, &config.fetch)?;
    let fetcher = CollectionFetcher::new(client, &config.fetch);
    let entries = fetcher
        .fetch_year(year, &lookup)
        .await
        .with_context(|| format!("Failed to fetch {} collection", year))?;

    let path = config.output_path(year);
    save_collection(&entries, &path).await?;

    Ok(GenerateOutcome { path, entries })
}
