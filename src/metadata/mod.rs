//! EXIF metadata access.
//!
//! - [`extract_blob`] / [`attach_blob`] — carry the raw EXIF payload from the
//!   input container into the re-encoded JPEG untouched
//! - [`MetadataEntries`] — decoded tag entries of the primary image
//! - [`capture_time`] — the capture timestamp, `DateTimeOriginal` first, then `DateTime`

mod blob;
mod reader;

pub use blob::{attach_blob, extract_blob};
pub use reader::{
    EntryValue, MetadataEntries, MetadataEntry, TAG_DATE_TIME, TAG_DATE_TIME_ORIGINAL,
    capture_time, parse_exif_datetime,
};
