//! Wire types and errors for the Discogs collection API.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors returned by a [`super::CollectionSource`] when fetching a page.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 429. `retry_after` is the server's `Retry-After`, if it sent one.
    #[error("rate limited by collection API")]
    RateLimited { retry_after: Option<Duration> },

    /// HTTP 404, returned by Discogs for pages past the end.
    #[error("collection page not found")]
    NotFound,

    #[error("collection API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to reach collection API: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to decode collection page: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Errors that cause a single release to be skipped.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("invalid date_added {value:?}: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("malformed release: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors that abort the collection fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("still rate limited on page {page} after {attempts} retries")]
    RateLimitExhausted { page: u32, attempts: u32 },

    #[error("failed to fetch collection page {page}: {source}")]
    Api {
        page: u32,
        #[source]
        source: ApiError,
    },
}

/// One page of the collection listing.
///
/// Releases are kept as raw JSON so one malformed release can't fail the
/// whole page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionPage {
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub releases: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub pages: Option<u32>,
}

impl CollectionPage {
    pub fn new(releases: Vec<Value>) -> Self {
        Self {
            pagination: None,
            releases,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Whether the server reported `page` as the last one.
    pub fn is_last(&self, page: u32) -> bool {
        self.pagination
            .as_ref()
            .and_then(|p| p.pages)
            .is_some_and(|pages| page >= pages)
    }
}

/// A collection item as listed by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRelease {
    pub id: u64,
    pub date_added: String,
    pub basic_information: RawBasicInformation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBasicInformation {
    /// Release id shared with the catalog index.
    pub id: Value,
    pub title: String,
    pub year: i32,
    pub artists: Vec<RawArtist>,
    pub formats: Vec<FormatRecord>,
    pub labels: Vec<LabelRecord>,
    pub genres: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArtist {
    pub name: String,
}

/// Format as documented by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub qty: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub descriptions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLabel {
    #[serde(default)]
    pub name: Option<String>,
}

/// A format entry, either matching the documented schema or any other
/// shape the API happens to send.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FormatRecord {
    Typed(RawFormat),
    Map(Map<String, Value>),
    Other(Value),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LabelRecord {
    Typed(RawLabel),
    Map(Map<String, Value>),
    Other(Value),
}
