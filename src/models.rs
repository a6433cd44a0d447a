//! Output records written to the collection JSON file.

use serde::{Deserialize, Serialize};

/// A release added to the collection during the requested year, merged with
/// its catalog artwork.
///
/// Field names match the JSON consumed by the web front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub id: u64,
    pub title: String,
    /// Artist names in credit order.
    pub artist: Vec<String>,
    /// Timestamp exactly as reported by the collection API.
    pub date_added: String,
    pub year: i32,
    pub formats: Vec<Format>,
    pub labels: Vec<String>,
    pub genres: Vec<String>,
    pub styles: Vec<String>,
    pub cover_image: Option<String>,
    pub artist_image: Option<String>,
    pub album_uri: Option<String>,
    pub artist_uri: Option<String>,
}

/// A physical format of a release, e.g. `Vinyl` x2 `LP, Album`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format {
    pub name: String,
    pub qty: String,
    pub text: String,
    pub descriptions: Vec<String>,
}

pub const UNKNOWN_FORMAT: &str = "Unknown Format";
pub const UNKNOWN_LABEL: &str = "Unknown Label";
pub const DEFAULT_FORMAT_QTY: &str = "1";

impl Default for Format {
    fn default() -> Self {
        Self {
            name: UNKNOWN_FORMAT.to_string(),
            qty: DEFAULT_FORMAT_QTY.to_string(),
            text: String::new(),
            descriptions: Vec::new(),
        }
    }
}
