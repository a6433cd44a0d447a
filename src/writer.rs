//! Reading and writing collection files.
//!
//! Collection files live in one output directory, one file per year, named
//! `collection_<year>.json`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::models::CollectionEntry;

const FILE_PREFIX: &str = "collection_";
const FILE_EXTENSION: &str = ".json";

pub fn collection_path(output_dir: &Path, year: i32) -> PathBuf {
    output_dir.join(format!("{}{}{}", FILE_PREFIX, year, FILE_EXTENSION))
}

/// Write `entries` as indented JSON, replacing any existing file.
///
/// Creates parent directories if they don't exist. Non-ASCII text is written
/// as UTF-8, not escaped.
pub async fn save_collection(entries: &[CollectionEntry], path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(entries).context("Failed to serialize collection")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }

    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create {:?}", path))?;
    file.write_all(&json)
        .await
        .with_context(|| format!("Failed to write {:?}", path))?;
    file.flush().await.context("Failed to flush file")?;

    info!("Saved {} items to {}", entries.len(), path.display());
    Ok(())
}

pub async fn load_collection(path: &Path) -> Result<Vec<CollectionEntry>> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_slice(&content).with_context(|| format!("Failed to parse {:?}", path))
}

/// Years with a collection file in `output_dir`, newest first.
pub async fn list_years(output_dir: &Path) -> Result<Vec<i32>> {
    let mut dir = tokio::fs::read_dir(output_dir)
        .await
        .with_context(|| format!("Failed to read output directory {:?}", output_dir))?;

    let mut years = Vec::new();
    while let Some(entry) = dir.next_entry().await? {
        let file_name = entry.file_name();
        if let Some(year) = file_name.to_str().and_then(year_from_file_name) {
            years.push(year);
        }
    }

    years.sort_unstable_by(|a, b| b.cmp(a));
    Ok(years)
}

fn year_from_file_name(name: &str) -> Option<i32> {
    let year = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_EXTENSION)?;
    if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    year.parse().ok()
}
