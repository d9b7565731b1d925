//! The `filter` stage.
//!
//! The filter chain is not evaluated here. The image is wrapped in a one-node
//! SVG document whose group carries the exact `filter` value the CSS
//! serializer emits, and resvg renders it. The SVG viewport is sized in CSS
//! pixels while the canvas keeps the export resolution, so blur radii and
//! shadow offsets scale with the export factor.

use base64::{Engine as _, engine::general_purpose};
use image::RgbaImage;
use log::debug;

use super::encode::encode_image;
use super::loader::render_svg;
use super::{RenderContext, RenderEffect};
use crate::css::build_filter_value;
use crate::error::RenderError;
use crate::export::ExportFormat;
use crate::model::Filters;

impl RenderEffect for Filters {
    fn is_identity(&self) -> bool {
        self.is_neutral()
    }

    fn apply(&self, ctx: &mut RenderContext) -> Result<(), RenderError> {
        let value = build_filter_value(self);
        if value.is_empty() {
            return Ok(());
        }
        debug!("filter: {value}");
        ctx.image = apply_filter_value(&ctx.image, &value, ctx.scale)?;
        Ok(())
    }
}

/// Renders `img` through a CSS `filter` value such as
/// `blur(4px) invert(100%)`.
///
/// `scale` is the number of output pixels per CSS pixel.
pub fn apply_filter_value(
    img: &RgbaImage,
    filter: &str,
    scale: f32,
) -> Result<RgbaImage, RenderError> {
    let (width, height) = img.dimensions();
    let svg = filter_document(img, filter, scale)?;
    Ok(render_svg(&svg, Some((width, height)))?)
}

fn filter_document(img: &RgbaImage, filter: &str, scale: f32) -> Result<String, RenderError> {
    let png = encode_image(img, ExportFormat::Png, 1.0)?;
    let href = format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(png)
    );
    let scale = if scale > 0.0 { scale } else { 1.0 };
    let w = img.width() as f32 / scale;
    let h = img.height() as f32 / scale;
    let filter = filter.replace('"', "&quot;");
    Ok(format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" "#,
            r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<g filter="{filter}">"#,
            r#"<image width="{w}" height="{h}" preserveAspectRatio="none" "#,
            r#"image-rendering="optimizeSpeed" xlink:href="{href}"/>"#,
            r#"</g></svg>"#
        ),
        w = w,
        h = h,
        filter = filter,
        href = href,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DropShadow, FilterKind};
    use crate::render::test_support::{MemoryLoader, solid};
    use image::Rgba;

    fn close(actual: u8, expected: u8, tolerance: u8) -> bool {
        actual.abs_diff(expected) <= tolerance
    }

    fn filtered(rgba: [u8; 4], kind: FilterKind, value: f64) -> [u8; 4] {
        let loader = MemoryLoader::default();
        let mut ctx = RenderContext::new(solid(4, 4, rgba), 1.0, &loader);
        let mut filters = Filters::default();
        filters.set(kind, value);
        filters.apply(&mut ctx).unwrap();
        ctx.image.get_pixel(2, 2).0
    }

    #[test]
    fn neutral_filters_are_identity() {
        assert!(Filters::default().is_identity());
        let loader = MemoryLoader::default();
        let mut ctx = RenderContext::new(solid(3, 3, [1, 2, 3, 255]), 1.0, &loader);
        Filters::default().apply(&mut ctx).unwrap();
        assert_eq!(ctx.image, solid(3, 3, [1, 2, 3, 255]));
    }

    #[test]
    fn invert_and_opacity() {
        let [r, g, b, a] = filtered([200, 200, 200, 255], FilterKind::Invert, 100.0);
        assert!(close(r, 55, 2) && close(g, 55, 2) && close(b, 55, 2), "{r} {g} {b}");
        assert_eq!(a, 255);

        let [_, _, _, a] = filtered([9, 9, 9, 255], FilterKind::Opacity, 50.0);
        assert!(close(a, 128, 2), "{a}");
    }

    #[test]
    fn grayscale_equalizes_channels() {
        let [r, g, b, _] = filtered([255, 0, 0, 255], FilterKind::Grayscale, 100.0);
        assert!(close(r, 54, 3), "{r}");
        assert!(close(g, r, 1) && close(b, r, 1), "{r} {g} {b}");
    }

    #[test]
    fn blur_softens_an_edge() {
        let mut img = solid(20, 9, [255, 0, 0, 255]);
        for y in 0..9 {
            for x in 10..20 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
        let out = apply_filter_value(&img, "blur(2px)", 1.0).unwrap();
        let edge = out.get_pixel(10, 4);
        assert!(edge[3] > 0 && edge[3] < 255, "{edge:?}");
        assert!(out.get_pixel(2, 4)[3] > 240);
    }

    #[test]
    fn drop_shadow_offset_scales() {
        let mut img = RgbaImage::new(10, 10);
        for y in 2..5 {
            for x in 2..5 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        let mut filters = Filters::default();
        filters.drop_shadow = DropShadow {
            enabled: true,
            x: 2.0,
            y: 2.0,
            blur: 0.0,
            color: "#ff0000".into(),
            color_opacity: 1.0,
        };
        let value = build_filter_value(&filters);

        let out = apply_filter_value(&img, &value, 1.0).unwrap();
        assert_eq!(out.get_pixel(3, 3).0, [255, 255, 255, 255]);
        let shadow = out.get_pixel(5, 5).0;
        assert!(shadow[0] > 240 && shadow[1] < 15 && shadow[3] > 240, "{shadow:?}");
        assert!(out.get_pixel(0, 0)[3] < 10);

        // At 2x the 2px offset is 4 output pixels.
        let doubled = apply_filter_value(&img, &value, 2.0).unwrap();
        let shadow = doubled.get_pixel(7, 7).0;
        assert!(shadow[0] > 240 && shadow[1] < 15 && shadow[3] > 240, "{shadow:?}");
    }

    #[test]
    fn filter_document_is_sized_in_css_pixels() {
        let svg = filter_document(&solid(8, 4, [0, 0, 0, 255]), "blur(1px)", 2.0).unwrap();
        assert!(svg.contains(r#"viewBox="0 0 4 2""#));
        assert!(svg.contains(r#"filter="blur(1px)""#));
    }
}
