//! Fixture builders shared by the unit tests.

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use img_parts::png::Png;
use img_parts::{Bytes, ImageEXIF};
use std::io::Cursor;

const TAG_IMAGE_DESCRIPTION: u16 = 0x010E;
const TAG_DATE_TIME: u16 = 0x0132;
const TAG_EXIF_IFD_POINTER: u16 = 0x8769;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;

const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;

fn push_entry(out: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&value.to_le_bytes());
}

fn ascii(s: &str) -> Vec<u8> {
    let mut bytes = s.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

/// Little-endian TIFF payload with an `ImageDescription`, and optionally
/// `DateTime` (IFD0) and `DateTimeOriginal` (Exif sub-IFD).
///
/// All strings must be longer than three bytes so they live out of line.
pub fn exif_blob(date_time: Option<&str>, original: Option<&str>) -> Vec<u8> {
    let description = ascii("watermark fixture");
    let date_time = date_time.map(ascii);
    let original = original.map(ascii);

    let ifd0_count = 1 + date_time.is_some() as u16 + original.is_some() as u16;
    let ifd0_len = 2 + 12 * ifd0_count as u32 + 4;
    let exif_ifd_offset = 8 + ifd0_len;
    let exif_ifd_len = if original.is_some() { 2 + 12 + 4 } else { 0 };
    let mut data_offset = exif_ifd_offset + exif_ifd_len;

    let mut out = b"II\x2a\x00".to_vec();
    out.extend_from_slice(&8u32.to_le_bytes());
    let mut data = Vec::new();

    // IFD0, entries sorted by tag
    out.extend_from_slice(&ifd0_count.to_le_bytes());
    push_entry(&mut out, TAG_IMAGE_DESCRIPTION, TYPE_ASCII, description.len() as u32, data_offset);
    data_offset += description.len() as u32;
    data.extend_from_slice(&description);

    if let Some(ref value) = date_time {
        push_entry(&mut out, TAG_DATE_TIME, TYPE_ASCII, value.len() as u32, data_offset);
        data_offset += value.len() as u32;
        data.extend_from_slice(value);
    }
    if original.is_some() {
        push_entry(&mut out, TAG_EXIF_IFD_POINTER, TYPE_LONG, 1, exif_ifd_offset);
    }
    out.extend_from_slice(&0u32.to_le_bytes());

    // Exif sub-IFD
    if let Some(ref value) = original {
        out.extend_from_slice(&1u16.to_le_bytes());
        push_entry(&mut out, TAG_DATE_TIME_ORIGINAL, TYPE_ASCII, value.len() as u32, data_offset);
        data.extend_from_slice(value);
        out.extend_from_slice(&0u32.to_le_bytes());
    }

    out.extend_from_slice(&data);
    out
}

/// A mid-gray baseline JPEG without metadata.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([128, 128, 128]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

/// A half-transparent RGBA PNG without metadata.
pub fn png_rgba_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([40, 90, 160, 128]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Attach `blob` as the `eXIf` chunk of a PNG.
pub fn with_png_exif(png_bytes: Vec<u8>, blob: &[u8]) -> Vec<u8> {
    let mut png = Png::from_bytes(Bytes::from(png_bytes)).unwrap();
    png.set_exif(Some(Bytes::copy_from_slice(blob)));
    png.encoder().bytes().to_vec()
}

/// A JPEG carrying `blob` as its EXIF segment.
pub fn jpeg_with_exif(width: u32, height: u32, blob: &[u8]) -> Vec<u8> {
    crate::metadata::attach_blob(jpeg_bytes(width, height), blob).unwrap()
}
