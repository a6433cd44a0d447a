//! Test data builders

use super::constants::*;
use super::server::MockServer;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use vinyl_unwrapped::config::{AppConfig, FetchSettings};

/// A collection release as listed by the Discogs API.
pub fn release(id: u64, date_added: &str) -> Value {
    json!({
        "id": id,
        "instance_id": 1000 + id,
        "rating": 0,
        "date_added": date_added,
        "basic_information": {
            "id": id,
            "master_id": 0,
            "title": format!("Album {}", id),
            "year": 1990 + (id % 30),
            "thumb": "",
            "cover_image": "",
            "artists": [
                {"name": "Stereolab", "anv": "", "join": ",", "id": 5},
                {"name": "Nurse With Wound", "anv": "", "join": "", "id": 6}
            ],
            "formats": [
                {"name": "Vinyl", "qty": "1", "text": "Clear", "descriptions": ["LP", "Album"]},
                {"name": "CD", "qty": 1}
            ],
            "labels": [
                {"name": "Duophonic Ultra High Frequency Disks", "catno": "D-UHF-D01", "id": 7},
                {"catno": "none"}
            ],
            "genres": ["Electronic", "Rock"],
            "styles": ["Indie Rock"]
        }
    })
}

/// A catalog index document for release `id`.
pub fn catalog_document(id: u64) -> Value {
    json!({
        "title": format!("Album {}", id),
        "discogsRelease": id.to_string(),
        "coverImage": format!("https://www.russ.fm/albums/{}/cover.jpg", id),
        "artistImage": "https://www.russ.fm/artists/stereolab/stereolab.jpg",
        "albumUri": format!("/albums/{}/", id),
        "artistUri": "/artists/stereolab/"
    })
}

/// Config pointing both endpoints at `server`, with no delays.
pub fn test_config(server: &MockServer, output_dir: &Path) -> AppConfig {
    AppConfig {
        token: TEST_TOKEN.to_string(),
        output_dir: output_dir.to_path_buf(),
        catalog_url: server.catalog_url(),
        fetch: FetchSettings {
            username: TEST_USERNAME.to_string(),
            delay: Duration::ZERO,
            api_base_url: server.base_url.clone(),
            request_timeout: Some(Duration::from_secs(10)),
            ..Default::default()
        },
    }
}
