//! Discogs collection access.
//!
//! - `client`: HTTP client for the collection listing
//! - `fetcher`: pagination, year filtering and rate-limit handling
//! - `normalize`: conversion of raw releases into output entries

mod client;
mod fetcher;
pub mod normalize;
mod retry_policy;
pub mod types;

pub use client::{DiscogsClient, DEFAULT_API_BASE_URL, USER_AGENT};
pub use fetcher::CollectionFetcher;
pub use retry_policy::RetryPolicy;
pub use types::{ApiError, CollectionPage, EntryError, FetchError};

use async_trait::async_trait;

/// A paginated source of collection releases.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Fetch a page of the collection. Pages are numbered from 1.
    async fn fetch_page(&self, page: u32) -> Result<CollectionPage, ApiError>;
}
