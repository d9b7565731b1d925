//! Rasterizer for exports.
//!
//! Renders a [`DocumentState`] to pixels the way a browser paints the
//! generated CSS on an `<img>`: filters first, then the clip-path, then the
//! mask stack. Mix-blend-mode has no backdrop in an isolated export and is
//! not applied.
//!
//! # Architecture
//!
//! Each stage implements [`RenderEffect`] and transforms the image held by a
//! [`RenderContext`]. The context also carries the export scale, so lengths
//! given in CSS pixels (blur radius, shadow offset, mask tile sizes) stay
//! proportional at 2x and 4x, and the [`ImageLoader`] used for `url()` masks.

mod clip;
mod encode;
mod filter;
mod loader;
mod mask;
mod pixels;

pub use clip::clip_shape_path;
pub use encode::encode_image;
pub use filter::apply_filter_value;
pub use loader::{DefaultLoader, ImageLoader, decode_data_url, render_svg};
pub use mask::{MaskStack, render_layer_alpha};
pub use pixels::{pixmap_to_rgba_image, rgba_image_to_pixmap};

use image::RgbaImage;
use image::imageops::{self, FilterType};
use log::debug;

use crate::error::RenderError;
use crate::export::ExportSettings;
use crate::model::{BlendMode, DocumentState};

// ============================================================================
// Render Context
// ============================================================================

/// State that flows through the rendering pipeline.
pub struct RenderContext<'a> {
    /// The image being processed, straight alpha.
    pub image: RgbaImage,
    /// Output pixels per CSS pixel.
    pub scale: f32,
    /// Resolves `url()` mask sources.
    pub loader: &'a dyn ImageLoader,
}

impl<'a> RenderContext<'a> {
    pub fn new(image: RgbaImage, scale: f32, loader: &'a dyn ImageLoader) -> Self {
        Self {
            image,
            scale,
            loader,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// A pipeline stage.
pub trait RenderEffect {
    /// True when applying the stage would leave the image unchanged.
    fn is_identity(&self) -> bool {
        false
    }

    /// Transforms `ctx.image` in place.
    fn apply(&self, ctx: &mut RenderContext) -> Result<(), RenderError>;
}

// ============================================================================
// Entry points
// ============================================================================

/// Renders the document's image with every effect applied.
///
/// The output is `natural size * scale` pixels.
pub fn render_document(
    doc: &DocumentState,
    scale: f32,
    loader: &dyn ImageLoader,
) -> Result<RgbaImage, RenderError> {
    let image_data = doc.image.as_ref().ok_or(RenderError::NoImage)?;
    let source = loader.load(&image_data.src, None)?;

    let width = ((image_data.natural_width.max(1) as f32) * scale).round().max(1.0) as u32;
    let height = ((image_data.natural_height.max(1) as f32) * scale).round().max(1.0) as u32;
    let base = if source.dimensions() == (width, height) {
        source
    } else {
        debug!(
            "resizing source {}x{} to {width}x{height}",
            source.width(),
            source.height()
        );
        imageops::resize(&source, width, height, FilterType::CatmullRom)
    };

    let mut ctx = RenderContext::new(base, scale, loader);
    let masks = MaskStack::new(&doc.mask_layers);
    let stages: [&dyn RenderEffect; 3] = [&doc.filters, &doc.clip_path, &masks];
    for stage in stages {
        if !stage.is_identity() {
            stage.apply(&mut ctx)?;
        }
    }

    if doc.blend_mode != BlendMode::Normal {
        debug!(
            "mix-blend-mode {} has no backdrop in an export; skipped",
            doc.blend_mode.as_css()
        );
    }

    Ok(ctx.image)
}

/// Renders and encodes the document according to `settings`.
pub fn render_to_bytes(
    doc: &DocumentState,
    settings: &ExportSettings,
    loader: &dyn ImageLoader,
) -> Result<Vec<u8>, RenderError> {
    let image = render_document(doc, settings.scale.factor(), loader)?;
    encode_image(&image, settings.format, settings.quality())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use image::{Rgba, RgbaImage};

    use super::ImageLoader;
    use crate::error::LoadError;

    /// Serves solid images by source string.
    #[derive(Default)]
    pub struct MemoryLoader {
        pub images: HashMap<String, RgbaImage>,
    }

    impl MemoryLoader {
        pub fn with(src: &str, image: RgbaImage) -> Self {
            let mut loader = Self::default();
            loader.images.insert(src.to_string(), image);
            loader
        }
    }

    impl ImageLoader for MemoryLoader {
        fn load(&self, src: &str, size: Option<(u32, u32)>) -> Result<RgbaImage, LoadError> {
            let img = self
                .images
                .get(src)
                .cloned()
                .ok_or_else(|| LoadError::UnsupportedSource(src.to_string()))?;
            Ok(match size {
                Some((w, h)) if img.dimensions() != (w, h) => {
                    image::imageops::resize(&img, w, h, image::imageops::FilterType::Nearest)
                }
                _ => img,
            })
        }
    }

    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(rgba))
    }
}
