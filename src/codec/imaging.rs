use std::io::Cursor;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};

pub fn decode(data: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(data).context("Failed to load image from memory")
}

/// Reads only the header. `None` when the format is unknown or truncated.
pub fn dimensions(data: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Shrinks `img` so neither side exceeds `max_dim`, keeping the aspect ratio.
/// Images already small enough are returned untouched.
pub fn fit_within(img: DynamicImage, max_dim: u32) -> DynamicImage {
    if img.width() > max_dim || img.height() > max_dim {
        img.resize(max_dim, max_dim, FilterType::Lanczos3)
    } else {
        img
    }
}

/// Shrinks `img` so its width does not exceed `max_width`.
pub fn fit_width(img: DynamicImage, max_width: u32) -> DynamicImage {
    if img.width() > max_width {
        let (w, h) = img.dimensions();
        let height = ((h as u64 * max_width as u64) / w as u64).max(1) as u32;
        img.resize_exact(max_width, height, FilterType::Lanczos3)
    } else {
        img
    }
}

/// Reduces the image to 8-bit RGB, or 8-bit gray if it already is.
/// Alpha is discarded, not composited.
pub fn flatten(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => img,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    img.write_with_encoder(encoder)
        .with_context(|| format!("JPEG encoding failed (q={})", quality))?;
    Ok(buffer)
}

pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new_with_quality(
        &mut buffer,
        CompressionType::Best,
        image::codecs::png::FilterType::Adaptive,
    );
    img.write_with_encoder(encoder)
        .context("PNG encoding failed")?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn test_fit_within_keeps_aspect_ratio() {
        let img = DynamicImage::new_rgb8(4000, 3000);
        let img = fit_within(img, 1200);
        assert_eq!(img.dimensions(), (1200, 900));
    }

    #[test]
    fn test_fit_within_leaves_small_images() {
        let img = DynamicImage::new_rgb8(640, 480);
        assert_eq!(fit_within(img, 1200).dimensions(), (640, 480));
    }

    #[test]
    fn test_fit_width() {
        let img = DynamicImage::new_rgb8(1000, 1400);
        assert_eq!(fit_width(img, 800).dimensions(), (800, 1120));
        let img = DynamicImage::new_rgb8(600, 2000);
        assert_eq!(fit_width(img, 800).dimensions(), (600, 2000));
    }

    #[test]
    fn test_flatten_drops_alpha() {
        let rgba = ImageBuffer::from_pixel(4, 4, Rgba([10u8, 20, 30, 0]));
        let flat = flatten(DynamicImage::ImageRgba8(rgba));
        let rgb = flat.as_rgb8().unwrap();
        assert_eq!(rgb.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_flatten_keeps_gray() {
        let gray = DynamicImage::new_luma8(4, 4);
        assert!(matches!(flatten(gray), DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn test_jpeg_round_trip_decodes() {
        let img = DynamicImage::new_rgb8(32, 16);
        let bytes = encode_jpeg(&img, 50).unwrap();
        assert_eq!(decode(&bytes).unwrap().dimensions(), (32, 16));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode(b"definitely not an image").is_err());
    }
}
