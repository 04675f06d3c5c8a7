use anyhow::Result;
use img_parts::jpeg::Jpeg;
use img_parts::{Bytes, DynImage, ImageEXIF};

/// Pull the raw EXIF payload (TIFF structure, without the `Exif\0\0` marker)
/// out of a JPEG or PNG file.
///
/// Returns `Ok(None)` for containers img-parts does not know and for images
/// without EXIF. A recognized container that fails to parse is an error.
pub fn extract_blob(bytes: &[u8]) -> Result<Option<Bytes>> {
    let image = DynImage::from_bytes(Bytes::copy_from_slice(bytes))
        .map_err(|e| anyhow::anyhow!("Failed to parse image container: {e}"))?;

    Ok(image.and_then(|img| img.exif()).filter(|blob| !blob.is_empty()))
}

/// Insert `blob` verbatim as the EXIF segment of an encoded JPEG.
pub fn attach_blob(jpeg_bytes: Vec<u8>, blob: &[u8]) -> Result<Vec<u8>> {
    let mut jpeg = Jpeg::from_bytes(Bytes::from(jpeg_bytes))
        .map_err(|e| anyhow::anyhow!("Failed to parse encoded JPEG: {e}"))?;

    jpeg.set_exif(Some(Bytes::copy_from_slice(blob)));

    Ok(jpeg.encoder().bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{exif_blob, jpeg_bytes, png_rgba_bytes, with_png_exif};

    #[test]
    fn plain_jpeg_has_no_blob() {
        let bytes = jpeg_bytes(32, 24);
        assert!(extract_blob(&bytes).unwrap().is_none());
    }

    #[test]
    fn attached_blob_reads_back_identical() {
        let blob = exif_blob(Some("2020:01:02 03:04:05"), Some("2023:05:17 14:30:00"));
        let bytes = attach_blob(jpeg_bytes(32, 24), &blob).unwrap();

        let read = extract_blob(&bytes).unwrap().unwrap();
        assert_eq!(read.as_ref(), blob.as_slice());
    }

    #[test]
    fn attached_jpeg_still_decodes() {
        let blob = exif_blob(None, Some("2023:05:17 14:30:00"));
        let bytes = attach_blob(jpeg_bytes(40, 30), &blob).unwrap();

        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (40, 30));
    }

    #[test]
    fn png_exif_chunk_is_extracted() {
        let blob = exif_blob(Some("2021:07:08 09:10:11"), None);
        let bytes = with_png_exif(png_rgba_bytes(16, 16), &blob);

        let read = extract_blob(&bytes).unwrap().unwrap();
        assert_eq!(read.as_ref(), blob.as_slice());
    }

    #[test]
    fn unknown_container_has_no_blob() {
        assert!(extract_blob(b"definitely not an image").unwrap().is_none());
    }

    #[test]
    fn attach_rejects_non_jpeg() {
        assert!(attach_blob(b"nope".to_vec(), &[1, 2, 3]).is_err());
    }
}
