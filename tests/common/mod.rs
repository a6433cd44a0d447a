//! Common test infrastructure
//!
//! Spawns a mock server that plays both the Discogs collection API and the
//! russ.fm catalog index, plus helpers to build releases and configs.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{release, test_config, MockServer, TARGET_YEAR};
//!
//! #[tokio::test]
//! async fn test_generate() {
//!     let server = MockServer::builder()
//!         .page(vec![release(1, "2024-01-01T00:00:00-08:00")])
//!         .spawn()
//!         .await;
//!     let output = tempfile::TempDir::new().unwrap();
//!     let config = test_config(&server, output.path());
//!     vinyl_unwrapped::generate_collection(&config, TARGET_YEAR).await.unwrap();
//! }
//! ```

mod fixtures;
mod server;

// Public API - this is what tests import
pub use constants::*;
pub use fixtures::{catalog_document, release, test_config};
pub use server::{MockServer, PastEnd};
