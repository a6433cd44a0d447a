//! Vinyl Unwrapped collection generator library.
//!
//! Fetches the releases added to a Discogs collection during a given year,
//! attaches cover and artist artwork from the russ.fm catalog index, and
//! writes the merged list to a JSON file consumed by the web front-end.

pub mod catalog_lookup;
pub mod collection;
pub mod config;
pub mod generator;
pub mod models;
pub mod writer;

// Re-export commonly used types for convenience
pub use catalog_lookup::{CatalogClient, CatalogLookup};
pub use collection::{CollectionFetcher, CollectionSource, DiscogsClient};
pub use config::AppConfig;
pub use generator::{generate_collection, GenerateOutcome};
pub use models::{CollectionEntry, Format};
