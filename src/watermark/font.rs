use ab_glyph::{Font, FontArc, GlyphId, OutlinedGlyph, PxScale, ScaleFont, point};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// DejaVu Sans (Bitstream Vera license, see `fonts/DejaVuSans.LICENSE`).
/// Covers Latin, Greek and Cyrillic month names.
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");

/// Where the watermark face came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    File(PathBuf),
    Embedded,
}

/// Ink extent of a string, relative to the origin passed to [`WatermarkFont::draw`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBounds {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

/// Typeface used for the watermark.
pub struct WatermarkFont {
    font: FontArc,
    source: FontSource,
}

impl std::fmt::Debug for WatermarkFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkFont")
            .field("source", &self.source)
            .finish()
    }
}

impl WatermarkFont {
    /// Load the first usable font from `paths`, falling back to the embedded face.
    ///
    /// A missing or corrupt font file only produces a warning.
    pub fn load(paths: &[impl AsRef<Path>]) -> Result<Self> {
        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                continue;
            }
            match Self::from_file(path) {
                Ok(font) => {
                    log::debug!("Using font {}", path.display());
                    return Ok(font);
                }
                Err(e) => log::warn!("{e:#}"),
            }
        }

        let first = paths
            .first()
            .map(|p| p.as_ref().display().to_string())
            .unwrap_or_else(|| "<none>".to_string());
        log::warn!("Font '{first}' not found. Using built-in DejaVu Sans.");
        Self::embedded()
    }

    /// The face compiled into the binary.
    pub fn embedded() -> Result<Self> {
        let font = FontArc::try_from_slice(EMBEDDED_FONT_DATA)
            .map_err(|e| anyhow::anyhow!("Invalid embedded font: {e}"))?;
        Ok(Self {
            font,
            source: FontSource::Embedded,
        })
    }

    /// Parse a font file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read font {}", path.display()))?;
        let font = FontArc::try_from_vec(data)
            .map_err(|e| anyhow::anyhow!("Invalid font {}: {e}", path.display()))?;
        Ok(Self {
            font,
            source: FontSource::File(path.to_path_buf()),
        })
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    /// Whether every visible character of `text` has a glyph in this face.
    pub fn covers(&self, text: &str) -> bool {
        text.chars()
            .filter(|c| !c.is_whitespace())
            .all(|c| self.font.glyph_id(c) != GlyphId(0))
    }

    /// Ink extent of `text` at `size` pixels.
    ///
    /// Shares its glyph layout with [`draw`](Self::draw), so drawn pixels never
    /// leave the returned box.
    pub fn measure(&self, text: &str, size: u32) -> TextBounds {
        let mut boxes = self.outline(text, size).into_iter().map(|g| g.px_bounds());
        let Some(first) = boxes.next() else {
            return TextBounds::default();
        };

        let (mut x0, mut y0) = (first.min.x, first.min.y);
        let (mut x1, mut y1) = (first.max.x, first.max.y);
        for b in boxes {
            x0 = x0.min(b.min.x);
            y0 = y0.min(b.min.y);
            x1 = x1.max(b.max.x);
            y1 = y1.max(b.max.y);
        }

        let (left, top) = (x0.floor(), y0.floor());
        TextBounds {
            left: left as i32,
            top: top as i32,
            width: (x1.ceil() - left) as u32,
            height: (y1.ceil() - top) as u32,
        }
    }

    /// Draw `text` anti-aliased with its layout origin at `(x, y)`.
    /// Pixels outside the image are dropped.
    pub fn draw(
        &self,
        img: &mut RgbImage,
        color: Rgb<u8>,
        x: i32,
        y: i32,
        size: u32,
        text: &str,
    ) {
        let (width, height) = img.dimensions();
        for glyph in self.outline(text, size) {
            let bounds = glyph.px_bounds();
            let origin_x = x + bounds.min.x.floor() as i32;
            let origin_y = y + bounds.min.y.floor() as i32;

            glyph.draw(|gx, gy, coverage| {
                let px = origin_x + gx as i32;
                let py = origin_y + gy as i32;
                if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                    return;
                }
                let existing = *img.get_pixel(px as u32, py as u32);
                img.put_pixel(px as u32, py as u32, blend(existing, color, coverage));
            });
        }
    }

    /// Positioned outlines, baseline at the ascent below the origin.
    fn outline(&self, text: &str, size: u32) -> Vec<OutlinedGlyph> {
        let scale = PxScale::from(size as f32);
        let scaled = self.font.as_scaled(scale);

        let mut caret = 0.0f32;
        let mut prev: Option<GlyphId> = None;
        let mut glyphs = Vec::new();

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                glyphs.push(outlined);
            }
            caret += scaled.h_advance(id);
            prev = Some(id);
        }

        glyphs
    }
}

fn blend(bottom: Rgb<u8>, top: Rgb<u8>, coverage: f32) -> Rgb<u8> {
    let c = coverage.clamp(0.0, 1.0);
    let mix = |b: u8, t: u8| (b as f32 + (t as f32 - b as f32) * c).round() as u8;
    Rgb([
        mix(bottom[0], top[0]),
        mix(bottom[1], top[1]),
        mix(bottom[2], top[2]),
    ])
}
