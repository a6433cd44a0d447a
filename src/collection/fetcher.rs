//! Walks the collection page by page and collects the releases added during
//! a given year.

use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::normalize::entry_from_release;
use super::retry_policy::RetryPolicy;
use super::types::{ApiError, FetchError};
use super::CollectionSource;
use crate::catalog_lookup::CatalogLookup;
use crate::config::FetchSettings;
use crate::models::CollectionEntry;

pub struct CollectionFetcher<S: CollectionSource> {
    source: S,
    retry_policy: RetryPolicy,
    /// Pause between consecutive pages.
    page_delay: Duration,
}

impl<S: CollectionSource> CollectionFetcher<S> {
    pub fn new(source: S, settings: &FetchSettings) -> Self {
        Self {
            source,
            retry_policy: RetryPolicy::new(settings),
            page_delay: settings.delay,
        }
    }

    pub fn with_policy(source: S, retry_policy: RetryPolicy, page_delay: Duration) -> Self {
        Self {
            source,
            retry_policy,
            page_delay,
        }
    }

    /// Fetch every release added during `year`, in collection order, with
    /// catalog artwork attached from `lookup`.
    ///
    /// Releases that fail to parse are logged and skipped. Pagination ends
    /// on an empty page, a 404, or the last page reported by the server.
    pub async fn fetch_year(
        &self,
        year: i32,
        lookup: &CatalogLookup,
    ) -> Result<Vec<CollectionEntry>, FetchError> {
        let mut items = Vec::new();
        let mut page = 1;
        let mut retries = 0;

        loop {
            debug!("Fetching page {}", page);
            let collection_page = match self.source.fetch_page(page).await {
                Ok(collection_page) => collection_page,
                Err(ApiError::RateLimited { retry_after }) => {
                    if !self.retry_policy.should_retry(retries) {
                        return Err(FetchError::RateLimitExhausted {
                            page,
                            attempts: retries,
                        });
                    }
                    retries += 1;
                    let wait = self.retry_policy.backoff(retry_after);
                    warn!(
                        "Rate limit hit on page {}, waiting {} seconds (retry {}/{})...",
                        page,
                        wait.as_secs(),
                        retries,
                        self.retry_policy.max_retries
                    );
                    tokio::time::sleep(wait).await;
                    continue;
                }
                Err(ApiError::NotFound) => {
                    debug!("Reached the last page");
                    break;
                }
                Err(source) => return Err(FetchError::Api { page, source }),
            };
            retries = 0;

            if collection_page.is_empty() {
                debug!("No more releases found");
                break;
            }

            for release in &collection_page.releases {
                match entry_from_release(release, year, lookup) {
                    Ok(Some(entry)) => {
                        debug!("Processing release: {}", entry.title);
                        items.push(entry);
                    }
                    Ok(None) => {}
                    Err(e) => error!("Error processing item on page {}: {}", page, e),
                }
            }

            if collection_page.is_last(page) {
                debug!("Page {} is the last page", page);
                break;
            }

            tokio::time::sleep(self.page_delay).await;
            page += 1;
        }

        info!("Found {} items from {}", items.len(), year);
        Ok(items)
    }
}
