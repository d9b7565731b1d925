//! Conversions between `image` buffers and tiny-skia pixmaps.
//!
//! `RgbaImage` holds straight (unpremultiplied) alpha; `Pixmap` holds
//! premultiplied alpha.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{ColorU8, Pixmap};

use crate::error::RenderError;

// ============================================================================
// Pixmap <-> RgbaImage
// ============================================================================

/// Converts a pixmap to a straight-alpha image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let (r, g, b, a) = unpremultiply(src.red(), src.green(), src.blue(), src.alpha());
        *dst = Rgba([r, g, b, a]);
    }
    img
}

/// Converts a straight-alpha image to a pixmap.
pub fn rgba_image_to_pixmap(img: &RgbaImage) -> Result<Pixmap, RenderError> {
    let mut pixmap = Pixmap::new(img.width(), img.height()).ok_or(RenderError::Canvas {
        width: img.width(),
        height: img.height(),
    })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Allocates a transparent pixmap, failing on zero or oversized dimensions.
pub fn new_pixmap(width: u32, height: u32) -> Result<Pixmap, RenderError> {
    Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixmap_roundtrip_keeps_opaque_colors() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([200, 100, 50, 255]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let pixmap = rgba_image_to_pixmap(&img).unwrap();
        let back = pixmap_to_rgba_image(&pixmap);
        assert_eq!(back, img);
    }

    #[test]
    fn zero_sized_pixmap_is_an_error() {
        assert!(matches!(
            new_pixmap(0, 10),
            Err(RenderError::Canvas { width: 0, height: 10 })
        ));
    }
}
