//! # exif-watermark
//!
//! Burns the capture date of each photo into its bottom-right corner as a
//! localized watermark ("17 May 2023, 14:30"), writing the result to a
//! separate output directory. Files already present in the output are left
//! alone, so the tool can be re-run as new photos arrive.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use exif_watermark::config::Config;
//! use exif_watermark::format::LocaleFormatter;
//! use exif_watermark::pipeline::run_batch;
//! use exif_watermark::watermark::WatermarkFont;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default(); // ./input → ./output
//!     let font = WatermarkFont::load(&config.font_paths)?;
//!     let formatter = LocaleFormatter::from_env();
//!
//!     let summary = run_batch(&config, &font, &formatter);
//!     println!("{} processed, {} skipped or failed", summary.processed, summary.failed());
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! ```rust,no_run
//! use exif_watermark::config::Config;
//! use exif_watermark::format::{DateFormatter, LocaleFormatter};
//! use exif_watermark::metadata::{capture_time, extract_blob, MetadataEntries};
//! use exif_watermark::watermark::{render_file, WatermarkFont};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let bytes = std::fs::read("photo.jpg")?;
//!     let blob = extract_blob(&bytes)?;
//!     let entries = MetadataEntries::read(blob.as_deref());
//!
//!     if let Some(taken) = capture_time(&entries) {
//!         let text = LocaleFormatter::from_env().format(&taken);
//!         let font = WatermarkFont::embedded()?;
//!         let config = Config::default();
//!         render_file(Path::new("photo.jpg"), Path::new("out.jpg"), &text, &font, &config)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Fixed run settings
//! - [`metadata`] — EXIF payload extraction, entry decoding, capture date lookup
//! - [`format`] — Localized watermark text
//! - [`watermark`] — Layout, drawing and JPEG output
//! - [`pipeline`] — Directory diff, per-file outcomes and the batch summary

pub mod config;
pub mod format;
pub mod metadata;
pub mod pipeline;
pub mod watermark;

#[cfg(test)]
mod test_support;
