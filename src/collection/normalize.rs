//! Conversion of raw collection releases into [`CollectionEntry`] records.

use chrono::{DateTime, Datelike, FixedOffset};
use serde_json::{Map, Value};

use super::types::{EntryError, FormatRecord, LabelRecord, RawFormat, RawLabel, RawRelease};
use crate::catalog_lookup::CatalogLookup;
use crate::models::{CollectionEntry, Format, DEFAULT_FORMAT_QTY, UNKNOWN_FORMAT, UNKNOWN_LABEL};

const DATE_ADDED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Read access to the fields of a format, whatever shape it arrived in.
pub trait FormatFields {
    fn name(&self) -> Option<String>;
    fn qty(&self) -> Option<String>;
    fn text(&self) -> Option<String>;
    fn descriptions(&self) -> Option<Vec<String>>;
}

impl FormatFields for RawFormat {
    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn qty(&self) -> Option<String> {
        self.qty.clone()
    }

    fn text(&self) -> Option<String> {
        self.text.clone()
    }

    fn descriptions(&self) -> Option<Vec<String>> {
        self.descriptions.clone()
    }
}

impl FormatFields for Map<String, Value> {
    fn name(&self) -> Option<String> {
        string_field(self, "name")
    }

    fn qty(&self) -> Option<String> {
        string_field(self, "qty")
    }

    fn text(&self) -> Option<String> {
        string_field(self, "text")
    }

    fn descriptions(&self) -> Option<Vec<String>> {
        self.get("descriptions")?.as_array().map(|items| {
            items
                .iter()
                .filter_map(|d| d.as_str().map(str::to_string))
                .collect()
        })
    }
}

/// Read access to the name of a label.
pub trait LabelFields {
    fn name(&self) -> Option<String>;
}

impl LabelFields for RawLabel {
    fn name(&self) -> Option<String> {
        self.name.clone()
    }
}

impl LabelFields for Map<String, Value> {
    fn name(&self) -> Option<String> {
        string_field(self, "name")
    }
}

/// Strings are taken as-is, numbers in their decimal form, anything else
/// counts as missing.
fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl Format {
    pub fn from_fields(fields: &impl FormatFields) -> Self {
        Self {
            name: fields.name().unwrap_or_else(|| UNKNOWN_FORMAT.to_string()),
            qty: fields.qty().unwrap_or_else(|| DEFAULT_FORMAT_QTY.to_string()),
            text: fields.text().unwrap_or_default(),
            descriptions: fields.descriptions().unwrap_or_default(),
        }
    }
}

impl From<&FormatRecord> for Format {
    fn from(record: &FormatRecord) -> Self {
        match record {
            FormatRecord::Typed(raw) => Format::from_fields(raw),
            FormatRecord::Map(map) => Format::from_fields(map),
            FormatRecord::Other(_) => Format::default(),
        }
    }
}

pub fn label_name(fields: &impl LabelFields) -> String {
    fields.name().unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}

impl LabelRecord {
    pub fn label_name(&self) -> String {
        match self {
            LabelRecord::Typed(raw) => label_name(raw),
            LabelRecord::Map(map) => label_name(map),
            LabelRecord::Other(_) => UNKNOWN_LABEL.to_string(),
        }
    }
}

/// The release id as the catalog index keys it. Any string or number is
/// kept, including `0` and `""`, which simply match no catalog record.
fn release_id(value: &Value) -> Result<String, EntryError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Err(EntryError::MissingField("basic_information.id")),
        other => Err(EntryError::InvalidField {
            field: "basic_information.id",
            reason: format!("expected a string or number, got {}", other),
        }),
    }
}

pub fn parse_date_added(value: &str) -> Result<DateTime<FixedOffset>, EntryError> {
    DateTime::parse_from_str(value, DATE_ADDED_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map_err(|source| EntryError::InvalidDate {
            value: value.to_string(),
            source,
        })
}

/// Build the output entry for a raw release.
///
/// Returns `Ok(None)` when the release wasn't added during `year`. Releases
/// outside the year are not validated beyond their `date_added`.
pub fn entry_from_release(
    release: &Value,
    year: i32,
    lookup: &CatalogLookup,
) -> Result<Option<CollectionEntry>, EntryError> {
    let date_added = release
        .get("date_added")
        .and_then(Value::as_str)
        .ok_or(EntryError::MissingField("date_added"))?;

    if parse_date_added(date_added)?.year() != year {
        return Ok(None);
    }

    let raw: RawRelease = serde_json::from_value(release.clone())?;
    let info = raw.basic_information;
    let key = release_id(&info.id)?;
    let images = lookup.images_for(&key);

    Ok(Some(CollectionEntry {
        id: raw.id,
        title: info.title,
        artist: info.artists.into_iter().map(|a| a.name).collect(),
        date_added: raw.date_added,
        year: info.year,
        formats: info.formats.iter().map(Format::from).collect(),
        labels: info.labels.iter().map(LabelRecord::label_name).collect(),
        genres: info.genres,
        styles: info.styles,
        cover_image: images.cover_image,
        artist_image: images.artist_image,
        album_uri: images.album_uri,
        artist_uri: images.artist_uri,
    }))
}
