//! Export sessions.
//!
//! An [`Exporter`] renders the current document to an encoded image and
//! writes it as `<basename>-masked.<ext>`. Only one export runs at a time:
//! a second request while one is in flight is refused, and the in-flight
//! flag is released on every exit path. The export dialog is closed after
//! each attempt, successful or not.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::model::{DocumentState, generate_id};
use crate::render::{DefaultLoader, ImageLoader, render_to_bytes};
use crate::store::StudioStore;

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Png, Self::Jpeg, Self::Webp];

    /// File extension, which is also the serialized keyword.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Webp => "WebP",
        }
    }
}

/// Output resolution multiplier. Serialized as the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(try_from = "u8", into = "u8")]
pub enum ExportScale {
    #[default]
    X1,
    X2,
    X4,
}

impl ExportScale {
    pub fn factor(self) -> f32 {
        match self {
            Self::X1 => 1.0,
            Self::X2 => 2.0,
            Self::X4 => 4.0,
        }
    }
}

impl TryFrom<u8> for ExportScale {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::X1),
            2 => Ok(Self::X2),
            4 => Ok(Self::X4),
            other => Err(format!("export scale must be 1, 2 or 4, got {other}")),
        }
    }
}

impl From<ExportScale> for u8 {
    fn from(scale: ExportScale) -> u8 {
        match scale {
            ExportScale::X1 => 1,
            ExportScale::X2 => 2,
            ExportScale::X4 => 4,
        }
    }
}

pub const MIN_QUALITY: f32 = 0.1;
pub const MAX_QUALITY: f32 = 1.0;
pub const DEFAULT_QUALITY: f32 = 0.92;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(default)]
pub struct ExportSettings {
    pub format: ExportFormat,
    pub scale: ExportScale,
    /// Lossy encoder quality, 0.1-1. Ignored for PNG.
    pub quality: f32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            scale: ExportScale::X1,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl ExportSettings {
    pub fn new(format: ExportFormat, scale: ExportScale) -> Self {
        Self {
            format,
            scale,
            ..Self::default()
        }
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality.clamp(MIN_QUALITY, MAX_QUALITY);
        self
    }

    /// Quality clamped to the accepted range.
    pub fn quality(&self) -> f32 {
        if self.quality.is_nan() {
            return DEFAULT_QUALITY;
        }
        self.quality.clamp(MIN_QUALITY, MAX_QUALITY)
    }
}

/// `photo.final.png` becomes `photo.final-masked.<ext>`.
///
/// Only the base name of `file_name` is used, so directory components never
/// reach the output path. Only the last extension is stripped, and only when
/// it is non-empty.
pub fn export_file_name(file_name: &str, format: ExportFormat) -> String {
    let name = base_name(file_name);
    let stem = match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() => &name[..dot],
        _ => name,
    };
    format!("{stem}-masked.{}", format.extension())
}

/// Last path component of `file_name` under either separator, or `image`
/// when there is none.
fn base_name(file_name: &str) -> &str {
    match file_name.rsplit(['/', '\\']).next().map(str::trim) {
        Some(name) if !name.is_empty() && name != "." && name != ".." => name,
        _ => "image",
    }
}

// ============================================================================
// Exporter
// ============================================================================

/// An encoded export, ready to be saved or handed to a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

pub struct Exporter<L: ImageLoader = DefaultLoader> {
    loader: L,
    in_flight: AtomicBool,
}

impl Default for Exporter<DefaultLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter<DefaultLoader> {
    pub fn new() -> Self {
        Self::with_loader(DefaultLoader)
    }
}

impl<L: ImageLoader> Exporter<L> {
    pub fn with_loader(loader: L) -> Self {
        Self {
            loader,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_exporting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Renders and encodes `doc` without touching the filesystem.
    pub fn render(
        &self,
        doc: &DocumentState,
        settings: &ExportSettings,
    ) -> Result<ExportedImage, ExportError> {
        let _flight = InFlight::acquire(&self.in_flight)?;
        self.render_unguarded(doc, settings)
    }

    fn render_unguarded(
        &self,
        doc: &DocumentState,
        settings: &ExportSettings,
    ) -> Result<ExportedImage, ExportError> {
        let bytes = render_to_bytes(doc, settings, &self.loader)?;
        let source_name = doc.image.as_ref().map_or("image", |img| img.file_name.as_str());
        Ok(ExportedImage {
            file_name: export_file_name(source_name, settings.format),
            mime_type: settings.format.mime_type(),
            bytes,
        })
    }

    /// Exports the store's document into `out_dir` and closes the export
    /// dialog. Returns the written path.
    pub fn export_to_dir(
        &self,
        store: &mut StudioStore,
        settings: &ExportSettings,
        out_dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        let result = self.write_export(store.document(), settings, out_dir);
        store.close_export_dialog();
        match &result {
            Ok(path) => info!("exported {}", path.display()),
            Err(err) => warn!("export failed: {err}"),
        }
        result
    }

    fn write_export(
        &self,
        doc: &DocumentState,
        settings: &ExportSettings,
        out_dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        let _flight = InFlight::acquire(&self.in_flight)?;
        let exported = self.render_unguarded(doc, settings)?;
        let path = out_dir.join(&exported.file_name);
        write_atomically(&path, &exported.bytes)?;
        Ok(path)
    }
}

/// Holds the in-flight flag until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ExportError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::InProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// An output file that is deleted unless committed.
struct PartialFile {
    path: PathBuf,
    committed: bool,
}

impl PartialFile {
    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(err) = std::fs::remove_file(&self.path) {
                warn!("could not remove partial export {}: {err}", self.path.display());
            }
        }
    }
}

/// Writes `bytes` to a hidden sibling of `path` and renames it into place,
/// so an existing file at `path` is only replaced by a complete one.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let write_err = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    let staging = staging_path(path);
    let mut file = File::create(&staging).map_err(write_err)?;
    let partial = PartialFile {
        path: staging.clone(),
        committed: false,
    };
    file.write_all(bytes).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);
    std::fs::rename(&staging, path).map_err(write_err)?;
    partial.commit();
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.part", generate_id()))
}
