//! Image acquisition.
//!
//! Turns uploaded bytes, local files or URLs into the [`ImageData`] the
//! store expects. Validation happens before anything reaches the store, so a
//! rejected upload leaves the document untouched.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose};
use image::ImageFormat;
use log::debug;

use crate::error::{LoadError, UploadError};
use crate::model::ImageData;
use crate::render::{DefaultLoader, ImageLoader};

/// Largest accepted upload, in bytes.
pub const MAX_IMAGE_SIZE: usize = 20 * 1024 * 1024;

/// Validates an uploaded file and embeds it as a base64 `data:` URL.
pub fn image_from_bytes(
    bytes: &[u8],
    mime_type: &str,
    file_name: &str,
) -> Result<ImageData, UploadError> {
    let mime_type = mime_type.trim().to_ascii_lowercase();
    if !mime_type.starts_with("image/") {
        return Err(UploadError::NotAnImage);
    }
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(UploadError::TooLarge { size: bytes.len() });
    }

    let src = format!(
        "data:{mime_type};base64,{}",
        general_purpose::STANDARD.encode(bytes)
    );
    let decoded = DefaultLoader.load(&src, None)?;
    debug!(
        "accepted {file_name} ({mime_type}, {}x{})",
        decoded.width(),
        decoded.height()
    );
    Ok(ImageData {
        src,
        natural_width: decoded.width(),
        natural_height: decoded.height(),
        file_name: file_name.to_string(),
    })
}

/// Reads a local file, inferring its MIME type from the extension.
///
/// Oversized files are refused from their metadata, before any read.
pub fn image_from_path(path: &Path) -> Result<ImageData, UploadError> {
    let mime_type = mime_type_for_path(path).ok_or(UploadError::NotAnImage)?;
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let len = std::fs::metadata(path).map_err(io_err)?.len();
    if len > MAX_IMAGE_SIZE as u64 {
        return Err(UploadError::TooLarge {
            size: usize::try_from(len).unwrap_or(usize::MAX),
        });
    }
    let bytes = std::fs::read(path).map_err(io_err)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    image_from_bytes(&bytes, mime_type, &file_name)
}

/// References an image by URL. The image is loaded once to learn its size.
pub fn image_from_url(url: &str, loader: &dyn ImageLoader) -> Result<ImageData, UploadError> {
    if url.trim().is_empty() {
        return Err(UploadError::EmptyUrl);
    }
    let decoded = loader.load(url, None)?;
    Ok(ImageData {
        src: url.to_string(),
        natural_width: decoded.width(),
        natural_height: decoded.height(),
        file_name: file_name_from_url(url),
    })
}

/// Last path segment of `url`, or `image` when it is empty.
pub fn file_name_from_url(url: &str) -> String {
    match url.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => "image".to_string(),
    }
}

fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        return Some("image/svg+xml");
    }
    ImageFormat::from_path(path).ok().map(|format| format.to_mime_type())
}
