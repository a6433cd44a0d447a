//! HTTP client for the Discogs collection API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{ApiError, CollectionPage};
use super::CollectionSource;
use crate::config::FetchSettings;

pub const DEFAULT_API_BASE_URL: &str = "https://api.discogs.com";
pub const USER_AGENT: &str = "VinylUnwrapped/1.0";

/// Authenticated client for one user's collection.
///
/// Reads the "All" folder (id 0), which contains every release in the
/// collection.
pub struct DiscogsClient {
    client: Client,
    base_url: String,
    username: String,
    per_page: u32,
}

impl DiscogsClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `token` - Personal access token sent as `Discogs token=...`
    /// * `settings` - API base URL, username, page size and request timeout
    pub fn new(token: &str, settings: &FetchSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Discogs token={}", token))
            .context("Access token contains invalid characters")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        // Ensure base_url doesn't have trailing slash
        let base_url = settings.api_base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            username: settings.username.clone(),
            per_page: settings.per_page,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn releases_url(&self) -> String {
        format!(
            "{}/users/{}/collection/folders/0/releases",
            self.base_url,
            urlencoding::encode(&self.username)
        )
    }
}

#[async_trait]
impl CollectionSource for DiscogsClient {
    async fn fetch_page(&self, page: u32) -> Result<CollectionPage, ApiError> {
        let url = self.releases_url();
        debug!("GET {} page={} per_page={}", url, page, self.per_page);

        let response = self
            .client
            .get(&url)
            .query(&[("page", page), ("per_page", self.per_page)])
            .send()
            .await
            .map_err(ApiError::Transport)?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited {
                retry_after: parse_retry_after(response.headers()),
            }),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
            _ => response.json().await.map_err(ApiError::Decode),
        }
    }
}

/// `Retry-After` in delta-seconds form. HTTP-date values are not used by the
/// collection API and are ignored.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    match value.parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => {
            warn!("Ignoring unparseable Retry-After header: {:?}", value);
            None
        }
    }
}
