use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use exif::{In, Reader, Value};

/// `DateTimeOriginal` (Exif sub-IFD): when the shutter fired.
pub const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
/// `DateTime` (IFD0): last modification, used when the capture time is missing.
pub const TAG_DATE_TIME: u16 = 0x0132;

// Tried in order of preference.
const DATE_TAGS: [u16; 2] = [TAG_DATE_TIME_ORIGINAL, TAG_DATE_TIME];

const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Value of a single metadata entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValue {
    /// ASCII value with the terminating NUL removed.
    Text(String),
    /// Any other type, rendered for display.
    Other(String),
}

impl std::fmt::Display for EntryValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) | Self::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataEntry {
    pub id: u16,
    pub name: String,
    pub value: EntryValue,
}

/// Tag entries of the primary image (IFD0 and its Exif sub-IFD).
///
/// GPS and interoperability entries are left out because their tag numbers
/// overlap with IFD0 numbering.
#[derive(Debug, Clone, Default)]
pub struct MetadataEntries {
    entries: Vec<MetadataEntry>,
}

impl MetadataEntries {
    /// Decode a raw EXIF payload.
    pub fn from_blob(blob: &[u8]) -> Result<Self> {
        let exif = Reader::new()
            .read_raw(blob.to_vec())
            .context("Failed to decode EXIF data")?;

        let entries = exif
            .fields()
            .filter(|f| f.ifd_num == In::PRIMARY)
            .filter(|f| matches!(f.tag.context(), exif::Context::Tiff | exif::Context::Exif))
            .map(|f| MetadataEntry {
                id: f.tag.number(),
                name: f.tag.to_string(),
                value: match &f.value {
                    Value::Ascii(parts) => EntryValue::Text(ascii_to_string(parts)),
                    _ => EntryValue::Other(f.display_value().to_string()),
                },
            })
            .collect();

        Ok(Self { entries })
    }

    /// Like [`from_blob`](Self::from_blob), but an absent or broken payload
    /// yields an empty set.
    pub fn read(blob: Option<&[u8]>) -> Self {
        let Some(blob) = blob else {
            return Self::default();
        };
        match Self::from_blob(blob) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Ignoring unreadable EXIF data: {e:#}");
                Self::default()
            }
        }
    }

    /// First entry with the given tag id.
    pub fn get(&self, id: u16) -> Option<&EntryValue> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetadataEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Find the capture timestamp: `DateTimeOriginal`, then `DateTime`.
///
/// A present value that does not match `YYYY:MM:DD HH:MM:SS` is logged and
/// the next tag is tried.
pub fn capture_time(entries: &MetadataEntries) -> Option<NaiveDateTime> {
    if entries.is_empty() {
        return None;
    }

    for tag in DATE_TAGS {
        let Some(value) = entries.get(tag) else {
            continue;
        };
        let raw = value.to_string();
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        match parse_exif_datetime(raw) {
            Some(dt) => return Some(dt),
            None => {
                log::warn!("Invalid date format '{raw}' for tag {tag}. Trying next.");
            }
        }
    }

    None
}

/// Parse an EXIF date string (`YYYY:MM:DD HH:MM:SS`).
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim_end_matches(['\0', ' ']), EXIF_DATE_FORMAT).ok()
}

fn ascii_to_string(parts: &[Vec<u8>]) -> String {
    parts
        .first()
        .map(|bytes| String::from_utf8_lossy(bytes).trim_end_matches('\0').to_string())
        .unwrap_or_default()
}
