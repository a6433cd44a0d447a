//! Retry policy for rate-limited collection requests.
//!
//! The collection API answers 429 with an optional `Retry-After`. The policy
//! decides how long to wait and how many consecutive rate-limited responses
//! to tolerate for a single page.

use std::time::Duration;

use crate::config::FetchSettings;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum consecutive retries of the same page.
    pub max_retries: u32,
    /// Wait used when the server sends no `Retry-After`.
    pub default_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(settings: &FetchSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            default_backoff: settings.delay,
        }
    }

    /// Check whether another retry is allowed after `retries` retries of the
    /// same page.
    pub fn should_retry(&self, retries: u32) -> bool {
        retries < self.max_retries
    }

    /// How long to wait before retrying.
    pub fn backoff(&self, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or(self.default_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            default_backoff: Duration::from_secs(2),
        }
    }
}
