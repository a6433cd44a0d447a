//! russ.fm catalog index client.
//!
//! The catalog index lists every release published on russ.fm together with
//! its artwork and page URIs. It is fetched once per run and turned into
//! lookup tables keyed by Discogs release id.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info};

pub const DEFAULT_CATALOG_URL: &str = "https://www.russ.fm/index.json";

#[derive(Debug, Deserialize, Default)]
struct CatalogIndex {
    #[serde(default)]
    documents: Vec<CatalogDocument>,
}

/// One record of the catalog index.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    /// Discogs release id, published either as a string or as a number.
    #[serde(default)]
    pub discogs_release: Option<Value>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub artist_image: Option<String>,
    #[serde(default)]
    pub album_uri: Option<String>,
    #[serde(default)]
    pub artist_uri: Option<String>,
}

/// Artwork and URIs attached to a single release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogImages {
    pub cover_image: Option<String>,
    pub artist_image: Option<String>,
    pub album_uri: Option<String>,
    pub artist_uri: Option<String>,
}

/// Lookup tables from Discogs release id to catalog metadata.
///
/// Built once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct CatalogLookup {
    cover_images: HashMap<String, Option<String>>,
    artist_images: HashMap<String, Option<String>>,
    album_uris: HashMap<String, Option<String>>,
    artist_uris: HashMap<String, Option<String>>,
}

impl CatalogLookup {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: Vec<CatalogDocument>) -> Self {
        let mut lookup = Self::default();

        for document in documents {
            let Some(release_id) = document.discogs_release.as_ref().and_then(release_key) else {
                continue;
            };
            lookup
                .cover_images
                .insert(release_id.clone(), document.cover_image);
            lookup
                .artist_images
                .insert(release_id.clone(), document.artist_image);
            lookup
                .album_uris
                .insert(release_id.clone(), document.album_uri);
            lookup.artist_uris.insert(release_id, document.artist_uri);
        }

        lookup
    }

    pub fn len(&self) -> usize {
        self.cover_images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cover_images.is_empty()
    }

    /// Catalog metadata for a release. All fields are `None` for releases
    /// the catalog doesn't know about.
    pub fn images_for(&self, release_id: &str) -> CatalogImages {
        let get = |map: &HashMap<String, Option<String>>| map.get(release_id).cloned().flatten();
        CatalogImages {
            cover_image: get(&self.cover_images),
            artist_image: get(&self.artist_images),
            album_uri: get(&self.album_uris),
            artist_uri: get(&self.artist_uris),
        }
    }
}

/// Normalizes a release id to its string form. Empty strings and zero are
/// treated as absent.
fn release_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => match n.as_u64() {
            Some(0) => None,
            Some(id) => Some(id.to_string()),
            None => Some(n.to_string()),
        },
        _ => None,
    }
}

/// HTTP client for the catalog index document.
pub struct CatalogClient {
    client: Client,
    url: String,
}

impl CatalogClient {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Fetch the catalog index and build the lookup tables.
    ///
    /// Never fails: any error is logged and an empty lookup is returned, so
    /// the run proceeds without artwork.
    pub async fn fetch_lookup(&self) -> CatalogLookup {
        match self.fetch_documents().await {
            Ok(documents) => {
                debug!("Catalog index returned {} documents", documents.len());
                let lookup = CatalogLookup::from_documents(documents);
                info!("Loaded catalog artwork for {} releases", lookup.len());
                lookup
            }
            Err(e) => {
                error!("Error fetching catalog index from {}: {:#}", self.url, e);
                CatalogLookup::empty()
            }
        }
    }

    async fn fetch_documents(&self) -> Result<Vec<CatalogDocument>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to connect to catalog index")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Catalog index request failed with status: {}",
                response.status()
            );
        }

        let index: CatalogIndex = response
            .json()
            .await
            .context("Failed to parse catalog index")?;

        Ok(index.documents)
    }
}
