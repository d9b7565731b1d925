//! Image resource loading for the rasterizer.
//!
//! Sources are the strings the model stores: `data:` URLs, plain or
//! `file://` paths. SVG resources are rasterized with resvg at the size the
//! caller asks for, so vector masks stay crisp at every export scale.

use std::io::Cursor;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose};
use image::{ImageReader, RgbaImage};
use log::debug;
use resvg::tiny_skia::Transform;
use resvg::usvg::{Options, Tree};

use super::pixels::{new_pixmap, pixmap_to_rgba_image};
use crate::error::LoadError;

/// Resolves an image source string to pixels.
///
/// `size` is the desired output size for resolution-independent sources;
/// raster sources ignore it and return their natural size.
pub trait ImageLoader {
    fn load(&self, src: &str, size: Option<(u32, u32)>) -> Result<RgbaImage, LoadError>;
}

/// Loads `data:` URLs and local files. Remote URLs are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLoader;

impl ImageLoader for DefaultLoader {
    fn load(&self, src: &str, size: Option<(u32, u32)>) -> Result<RgbaImage, LoadError> {
        let src = src.trim();
        if let Some(rest) = src.strip_prefix("data:") {
            let (mime, bytes) = decode_data_url(rest)?;
            debug!("loading {} byte data URL ({mime})", bytes.len());
            return decode_bytes(&bytes, mime == "image/svg+xml", size);
        }
        if src.starts_with("http://") || src.starts_with("https://") || src.starts_with("blob:") {
            return Err(LoadError::UnsupportedSource(src.to_string()));
        }

        let path = Path::new(src.strip_prefix("file://").unwrap_or(src));
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_svg = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
        decode_bytes(&bytes, is_svg, size)
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Splits `<mime>[;base64],<payload>` (the part after `data:`).
pub fn decode_data_url(rest: &str) -> Result<(String, Vec<u8>), LoadError> {
    let (header, payload) = rest.split_once(',').ok_or(LoadError::MalformedDataUrl)?;
    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default().to_ascii_lowercase();
    let is_base64 = params.any(|p| p.eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        general_purpose::STANDARD.decode(payload.trim())?
    } else {
        percent_decode(payload)
    };
    Ok((mime, bytes))
}

fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

fn decode_bytes(bytes: &[u8], is_svg: bool, size: Option<(u32, u32)>) -> Result<RgbaImage, LoadError> {
    if is_svg || looks_like_svg(bytes) {
        let svg = std::str::from_utf8(bytes).map_err(|e| LoadError::Svg(e.to_string()))?;
        return render_svg(svg, size);
    }
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| LoadError::Decode(image::ImageError::IoError(e)))?
        .decode()?
        .to_rgba8();
    if img.width() == 0 || img.height() == 0 {
        return Err(LoadError::Empty);
    }
    Ok(img)
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Renders SVG markup, stretched to `size` when given and at its intrinsic
/// size otherwise.
pub fn render_svg(svg_data: &str, size: Option<(u32, u32)>) -> Result<RgbaImage, LoadError> {
    let opts = Options::default();
    let tree = Tree::from_str(svg_data, &opts).map_err(|e| LoadError::Svg(e.to_string()))?;

    let svg_size = tree.size();
    let (width, height) = size.unwrap_or((
        svg_size.width().ceil() as u32,
        svg_size.height().ceil() as u32,
    ));
    if width == 0 || height == 0 {
        return Err(LoadError::Empty);
    }

    let mut pixmap = new_pixmap(width, height).map_err(|_| LoadError::Empty)?;
    let transform = Transform::from_scale(
        width as f32 / svg_size.width(),
        height as f32 / svg_size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}
