//! Burning the date into the pixels.
//!
//! Size and position scale with the shorter image side. The text gets a
//! one-pixel dark outline on the four diagonals and a light fill on top, so it
//! stays readable on both bright and dark backgrounds.

mod font;

pub use font::{FontSource, TextBounds, WatermarkFont};

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::metadata;

const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const OUTLINE_OFFSETS: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// Font size in pixels: `max(min_font_size, min(w, h) / font_size_ratio)`.
pub fn font_size(width: u32, height: u32, config: &Config) -> u32 {
    (width.min(height) / config.font_size_ratio.max(1)).max(config.min_font_size)
}

/// Distance from the bottom and right edges: `max(min_margin, min(w, h) / margin_ratio)`.
pub fn margin(width: u32, height: u32, config: &Config) -> u32 {
    (width.min(height) / config.margin_ratio.max(1)).max(config.min_margin)
}

/// Top-left corner of the text's ink box, chosen so the box ends `margin`
/// pixels before the right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
}

impl Placement {
    /// Coordinates can go negative when the text is larger than the image.
    pub fn compute(
        width: u32,
        height: u32,
        text_width: u32,
        text_height: u32,
        margin: u32,
    ) -> Self {
        Self {
            x: width as i32 - text_width as i32 - margin as i32,
            y: height as i32 - text_height as i32 - margin as i32,
        }
    }
}

/// Layout of the watermark on an image of the given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub font_size: u32,
    pub margin: u32,
    /// Ink box relative to the draw origin.
    pub text: TextBounds,
    /// Where the ink box lands on the image.
    pub placement: Placement,
    /// Draw origin that puts the ink at `placement`.
    pub origin: (i32, i32),
}

impl Layout {
    pub fn compute(
        width: u32,
        height: u32,
        text: &str,
        font: &WatermarkFont,
        config: &Config,
    ) -> Self {
        let font_size = font_size(width, height, config);
        let margin = margin(width, height, config);
        let bounds = font.measure(text, font_size);
        let placement = Placement::compute(width, height, bounds.width, bounds.height, margin);
        Self {
            font_size,
            margin,
            text: bounds,
            placement,
            origin: (placement.x - bounds.left, placement.y - bounds.top),
        }
    }
}

/// Draw `text` onto the image: diagonal outline first, then the fill.
pub fn draw_watermark(
    img: &mut RgbImage,
    text: &str,
    font: &WatermarkFont,
    config: &Config,
) -> Layout {
    let (width, height) = img.dimensions();
    let layout = Layout::compute(width, height, text, font, config);
    let (x, y) = layout.origin;

    for (dx, dy) in OUTLINE_OFFSETS {
        font.draw(img, OUTLINE_COLOR, x + dx, y + dy, layout.font_size, text);
    }
    font.draw(img, TEXT_COLOR, x, y, layout.font_size, text);

    layout
}

/// Encode as baseline JPEG, reattaching the original EXIF payload unchanged.
pub fn encode_jpeg(img: &RgbImage, quality: u8, blob: Option<&[u8]>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(img)
        .context("Failed to encode JPEG")?;

    match blob {
        Some(blob) => metadata::attach_blob(buf, blob),
        None => Ok(buf),
    }
}

/// Watermark an already decoded image and write it to `output`.
///
/// Images that are not 8-bit RGB (alpha, grayscale, 16-bit) are converted first.
pub fn render_image(
    img: DynamicImage,
    blob: Option<&[u8]>,
    output: &Path,
    text: &str,
    font: &WatermarkFont,
    config: &Config,
) -> Result<PathBuf> {
    let mut rgb = img.into_rgb8();
    let layout = draw_watermark(&mut rgb, text, font, config);
    log::debug!(
        "  {}x{} text at ({}, {}), size {}, margin {}",
        layout.text.width,
        layout.text.height,
        layout.placement.x,
        layout.placement.y,
        layout.font_size,
        layout.margin
    );

    let bytes = encode_jpeg(&rgb, config.jpeg_quality, blob)?;
    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(output.to_path_buf())
}

/// Decode `input`, watermark it and write the JPEG to `output`.
/// The input file is never touched.
pub fn render_file(
    input: &Path,
    output: &Path,
    text: &str,
    font: &WatermarkFont,
    config: &Config,
) -> Result<PathBuf> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let blob = metadata::extract_blob(&bytes)?;
    let img = image::load_from_memory(&bytes).context("Failed to decode image")?;

    render_image(img, blob.as_deref(), output, text, font, config)
}
