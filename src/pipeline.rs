use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::format::{DateFormatter, format_capture_time};
use crate::metadata::{self, MetadataEntries};
use crate::watermark::{self, WatermarkFont};

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Watermarked copy written.
    Processed { output: PathBuf },
    /// No usable capture date. Nothing written.
    Skipped { reason: String },
    /// Read, decode, encode or write failure.
    Errored { reason: String },
}

/// Counters for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errored: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Processed { .. } => self.processed += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Errored { .. } => self.errored += 1,
        }
    }

    /// Files that did not produce output, for whatever reason.
    pub fn failed(&self) -> usize {
        self.skipped + self.errored
    }
}

/// Work for one run, computed once before any file is touched.
#[derive(Debug, Clone, Default)]
pub struct BatchPlan {
    /// Accepted files found in the input directory.
    pub input_count: usize,
    /// Names of any kind already in the output directory.
    pub output_count: usize,
    /// Input names missing from the output, sorted.
    pub pending: Vec<OsString>,
}

/// Create the input and output directories if they are missing.
pub fn prepare_directories(config: &Config) -> Result<()> {
    for dir in [&config.input_dir, &config.output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

/// Accepted file names directly inside `dir`.
fn list_inputs(dir: &Path, config: &Config) -> BTreeSet<OsString> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && config.accepts(e.path()))
        .map(|e| e.file_name().to_os_string())
        .collect()
}

/// Every name directly inside `dir`, files or not. Missing directory = empty.
fn list_existing(dir: &Path) -> BTreeSet<OsString> {
    if !dir.is_dir() {
        return BTreeSet::new();
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_os_string())
        .collect()
}

/// Diff the input directory against the output directory by file name.
///
/// A missing input directory is reported and yields an empty plan.
pub fn plan_batch(config: &Config) -> BatchPlan {
    if !config.input_dir.is_dir() {
        log::error!(
            "Directory '{}' does not exist. Please ensure it is created.",
            config.input_dir.display()
        );
        return BatchPlan::default();
    }

    let inputs = list_inputs(&config.input_dir, config);
    let existing = list_existing(&config.output_dir);
    let pending: Vec<OsString> = inputs.difference(&existing).cloned().collect();

    log::info!("Found {} files in '{}'.", inputs.len(), config.input_dir.display());
    log::info!(
        "Found {} already processed files in '{}'.",
        existing.len(),
        config.output_dir.display()
    );
    log::info!("To process: {} files.", pending.len());

    BatchPlan {
        input_count: inputs.len(),
        output_count: existing.len(),
        pending,
    }
}

/// Process one file from discovery to a final outcome.
pub fn process_file(
    input: &Path,
    output: &Path,
    font: &WatermarkFont,
    formatter: &dyn DateFormatter,
    config: &Config,
) -> FileOutcome {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    match try_process_file(input, output, font, formatter, config) {
        Ok(Some(path)) => {
            log::info!("Processing '{name}'... Done.");
            FileOutcome::Processed { output: path }
        }
        Ok(None) => {
            log::warn!("EXIF 'DateTimeOriginal' not found for '{name}'. Skipping.");
            FileOutcome::Skipped {
                reason: "no usable capture date".to_string(),
            }
        }
        Err(e) => {
            log::error!("Error processing '{name}': {e:#}");
            FileOutcome::Errored {
                reason: format!("{e:#}"),
            }
        }
    }
}

/// `Ok(None)` means the file has no usable date.
fn try_process_file(
    input: &Path,
    output: &Path,
    font: &WatermarkFont,
    formatter: &dyn DateFormatter,
    config: &Config,
) -> Result<Option<PathBuf>> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let blob = metadata::extract_blob(&bytes)?;

    let entries = MetadataEntries::read(blob.as_deref());
    let captured = metadata::capture_time(&entries);
    let text = format_capture_time(formatter, captured.as_ref());
    if text.is_empty() {
        return Ok(None);
    }

    let img = image::load_from_memory(&bytes).context("Failed to decode image")?;
    watermark::render_image(img, blob.as_deref(), output, &text, font, config).map(Some)
}

/// Run the whole batch: prepare directories, plan, process, summarize.
pub fn run_batch(
    config: &Config,
    font: &WatermarkFont,
    formatter: &dyn DateFormatter,
) -> BatchSummary {
    if let Err(e) = prepare_directories(config) {
        log::error!("{e:#}");
    }

    let plan = plan_batch(config);
    let mut summary = BatchSummary::default();

    if plan.pending.is_empty() {
        log::info!("No new files to process.");
        return summary;
    }

    let total = plan.pending.len();
    for (i, name) in plan.pending.iter().enumerate() {
        let input = config.input_dir.join(name);
        let output = config.output_dir.join(name);
        log::debug!("[{}/{}] {}", i + 1, total, input.display());

        let outcome = process_file(&input, &output, font, formatter, config);
        summary.record(&outcome);
    }

    log::info!("--- Execution Summary ---");
    log::info!("Successfully processed: {}", summary.processed);
    log::info!("Errors or skipped: {}", summary.failed());

    summary
}

/// Decode every EXIF entry of a single file.
pub fn inspect_file(path: &Path) -> Result<MetadataEntries> {
    let bytes =
        std::fs::read(path).with_context(|| format!("File not found at '{}'", path.display()))?;
    let blob = metadata::extract_blob(&bytes)?;
    match blob {
        Some(blob) => MetadataEntries::from_blob(&blob),
        None => Ok(MetadataEntries::default()),
    }
}
