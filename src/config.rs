use std::path::PathBuf;

/// Fixed settings for a watermark run.
///
/// There is no config file: [`Config::default`] yields the production values.
/// Tests build their own value pointing at temporary directories.
///
/// ```rust
/// use exif_watermark::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.jpeg_quality, 95);
/// assert_eq!(config.input_dir.to_str(), Some("input"));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for photos (not recursive).
    pub input_dir: PathBuf,
    /// Directory receiving watermarked copies. Names present here are never reprocessed.
    pub output_dir: PathBuf,
    /// Accepted input extensions, lowercase, without the dot.
    pub extensions: Vec<String>,
    /// JPEG encoder quality (1-100).
    pub jpeg_quality: u8,
    /// Denominator applied to the shorter image side to get the font size.
    pub font_size_ratio: u32,
    /// Lower bound for the font size in pixels.
    pub min_font_size: u32,
    /// Denominator applied to the shorter image side to get the margin.
    pub margin_ratio: u32,
    /// Lower bound for the margin in pixels.
    pub min_margin: u32,
    /// TrueType fonts tried in order. The embedded DejaVu Sans is used when none loads.
    pub font_paths: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            jpeg_quality: 95,
            font_size_ratio: 50,
            min_font_size: 15,
            margin_ratio: 50,
            min_margin: 10,
            font_paths: [
                "arial.ttf",
                "C:\\Windows\\Fonts\\arial.ttf",
                "/Library/Fonts/Arial.ttf",
                "/System/Library/Fonts/Supplemental/Arial.ttf",
                "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
        }
    }
}

impl Config {
    /// Same settings with different input/output directories.
    pub fn with_dirs(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Check whether a file name carries one of the accepted extensions (case-insensitive).
    pub fn accepts(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}
