use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::{CoverError, CoverResult};

/// JPEG quality used when re-encoding covers.
const JPEG_QUALITY: u8 = 80;

/// Default bound on a stored cover's longest side, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 400;

/// Decode an uploaded image, shrink it to fit within `max_dimension` on both
/// sides, and re-encode it as JPEG for the blob store.
///
/// Images already within bounds are re-encoded but not resized.
pub fn prepare_cover(bytes: &[u8], max_dimension: u32) -> CoverResult<Vec<u8>> {
    if bytes.is_empty() {
        return Err(CoverError::Empty);
    }
    let img = image::load_from_memory(bytes)?;
    let img = if img.width() > max_dimension || img.height() > max_dimension {
        img.resize(max_dimension, max_dimension, FilterType::CatmullRom)
    } else {
        img
    };

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))?;
    log::debug!(
        "Prepared cover {}x{} ({} -> {} bytes)",
        rgb.width(),
        rgb.height(),
        bytes.len(),
        out.len()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_large_cover_is_downscaled() {
        let prepared = prepare_cover(&png(800, 400), 400).unwrap();

        assert_eq!(&prepared[..3], &[0xff, 0xd8, 0xff]);
        let decoded = image::load_from_memory(&prepared).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (400, 200));
    }

    #[test]
    fn test_small_cover_keeps_size() {
        let prepared = prepare_cover(&png(120, 160), 400).unwrap();
        let decoded = image::load_from_memory(&prepared).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 160));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(prepare_cover(&[], 400), Err(CoverError::Empty)));
        assert!(matches!(
            prepare_cover(b"not an image", 400),
            Err(CoverError::Image(_))
        ));
    }
}
