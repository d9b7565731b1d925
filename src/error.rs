//! Error types.
//!
//! Only the edges that touch pixels or the filesystem can fail. The store and
//! the CSS serializers are total and never return errors.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to fetch or decode an image resource.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),
    #[error("Malformed data URL")]
    MalformedDataUrl,
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Failed to parse SVG: {0}")]
    Svg(String),
    #[error("Image has zero size")]
    Empty,
}

/// Failure while rasterizing or encoding an export.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No image loaded")]
    NoImage,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("Cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("Failed to encode {format}: {source}")]
    Encode {
        format: &'static str,
        #[source]
        source: image::ImageError,
    },
}

/// Rejected image acquisition. The store is left untouched.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("File must be an image")]
    NotAnImage,
    #[error("Image must be under 20MB ({size} bytes given)")]
    TooLarge { size: usize },
    #[error("Image URL is empty")]
    EmptyUrl,
    #[error("Failed to load image: {0}")]
    Load(#[from] LoadError),
}

/// Failure of an export session.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("An export is already in progress")]
    InProgress,
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
