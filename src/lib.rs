//! maskit: a CSS mask, filter and clip-path studio
//!
//! This crate holds the editor core of the studio: the effect data model,
//! CSS generation, an undoable state store, a preset catalog and a raster
//! export engine that reproduces the effects on pixels.
//!
//! # Example
//!
//! ```
//! use maskit::{CssOutputTab, FilterKind, StudioStore, find_preset};
//!
//! let mut store = StudioStore::new();
//! store.add_mask_layer();
//! store.set_filter(FilterKind::Grayscale, 100.0);
//!
//! let css = store.css(CssOutputTab::Filter);
//! assert!(css.contains("filter: grayscale(100%);"));
//!
//! // Presets replace only the parts of the document they carry
//! let preset = find_preset("clip-circle").unwrap();
//! store.apply_preset(&preset.patch());
//! assert!(store.css(CssOutputTab::Clip).contains("circle(45% at 50% 50%)"));
//! assert_eq!(store.document().filters.grayscale, 100.0);
//! ```
//!
//! # Persisted state
//!
//! [`StudioState`] serializes to the same JSON document the web front-end
//! keeps, so a saved session can be reopened here:
//!
//! ```
//! use maskit::{StudioState, StudioStore};
//!
//! let json = StudioStore::new().state().to_json().unwrap();
//! let restored = StudioState::from_json(&json).unwrap();
//! assert_eq!(restored, StudioState::new());
//! ```
//!
//! # Export
//!
//! With an image loaded, [`Exporter`] renders the document at 1x, 2x or 4x
//! and encodes it as PNG, JPEG or WebP. See [`render::render_document`] for
//! the pipeline order.

pub mod color;
pub mod css;
mod error;
mod export;
pub mod model;
mod preset;
pub mod render;
mod shortcuts;
mod store;
mod upload;

pub use error::{ExportError, LoadError, RenderError, UploadError};
pub use export::{
    DEFAULT_QUALITY, ExportFormat, ExportScale, ExportSettings, ExportedImage, Exporter,
    MAX_QUALITY, MIN_QUALITY, export_file_name,
};
pub use model::{
    BlendMode, ClipPath, ClipPathKind, ClipPoint, ConicGradient, CssOutputTab, DocumentState,
    DropShadow, FilterKind, Filters, GradientKind, GradientStop, ImageData, LinearGradient,
    MaskClip, MaskComposite, MaskImage, MaskLayer, MaskMode, MaskOrigin, MaskPosition,
    MaskRepeat, MaskSize, RadialGradient, RadialShape, RadialSize, SidebarPanel, StudioState,
    UiState, UrlMask, Viewport, generate_id,
};
pub use preset::{Preset, PresetCategory, PresetPatch, find_preset, presets, presets_in};
pub use shortcuts::{KeyEvent, ShortcutAction, ShortcutOutcome, handle_shortcut};
pub use store::{
    History, MAX_HISTORY, MAX_ZOOM, MIN_ZOOM, StudioStore, ZOOM_STEP,
    create_default_gradient_stop, create_default_linear_gradient, create_default_mask_layer,
    create_linear_gradient,
};
pub use upload::{
    MAX_IMAGE_SIZE, file_name_from_url, image_from_bytes, image_from_path, image_from_url,
};
