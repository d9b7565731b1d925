//! Encoding rendered pixels to the export formats.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ImageError, RgbImage, RgbaImage};

use crate::error::RenderError;
use crate::export::ExportFormat;

/// Encodes `img` as `format`.
///
/// `quality` (0-1) only affects JPEG. PNG is lossless and the WebP encoder
/// available here is lossless only. JPEG has no alpha channel, so
/// transparent areas are flattened onto black.
pub fn encode_image(
    img: &RgbaImage,
    format: ExportFormat,
    quality: f32,
) -> Result<Vec<u8>, RenderError> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    let encode_err = |source: ImageError| RenderError::Encode {
        format: format.label(),
        source,
    };

    match format {
        ExportFormat::Png => img
            .write_with_encoder(PngEncoder::new(&mut cursor))
            .map_err(encode_err)?,
        ExportFormat::Jpeg => {
            let quality = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
            flatten_on_black(img)
                .write_with_encoder(JpegEncoder::new_with_quality(&mut cursor, quality))
                .map_err(encode_err)?
        }
        ExportFormat::Webp => img
            .write_with_encoder(WebPEncoder::new_lossless(&mut cursor))
            .map_err(encode_err)?,
    }

    Ok(buffer)
}

fn flatten_on_black(img: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0;
        let over = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
        image::Rgb([over(r), over(g), over(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(8, 8, Rgba([250, 10, 10, 255]));
        img.put_pixel(0, 0, Rgba([255, 255, 255, 0]));
        img
    }

    #[test]
    fn png_roundtrips_losslessly() {
        let bytes = encode_image(&sample(), ExportFormat::Png, 0.5).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn jpeg_has_magic_and_no_alpha() {
        let bytes = encode_image(&sample(), ExportFormat::Jpeg, 0.92).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn webp_is_riff() {
        let bytes = encode_image(&sample(), ExportFormat::Webp, 0.92).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn transparent_pixels_flatten_to_black() {
        let flat = flatten_on_black(&sample());
        assert_eq!(flat.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(flat.get_pixel(3, 3).0, [250, 10, 10]);
    }
}
