//! The effect data model.
//!
//! Everything the editor composes lives here as plain serde types: gradient
//! stops and mask images, mask layers, filters, clip paths, blend modes, and
//! the [`StudioState`] aggregate that owns them. The JSON form uses camelCase
//! fields and CSS keywords so it round-trips with the web front-end.

pub mod clip;
pub mod filter;
pub mod mask;
pub mod state;

pub use clip::{ClipPath, ClipPathKind, ClipPoint, POLYGON_PRESETS, polygon_preset};
pub use filter::{DropShadow, FilterKind, Filters};
pub use mask::{
    ConicGradient, GradientKind, GradientStop, LinearGradient, MaskClip, MaskComposite,
    MaskImage, MaskLayer, MaskMode, MaskOrigin, MaskPosition, MaskRepeat, MaskSize,
    RadialGradient, RadialShape, RadialSize, UrlMask,
};
pub use state::{
    BlendMode, CssOutputTab, DocumentState, ImageData, SidebarPanel, StudioState, UiState,
    Viewport,
};

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Generates a session-unique identifier for layers and gradient stops.
///
/// Ids combine the wall-clock millisecond with a process-wide counter, so two
/// ids minted in the same millisecond still differ.
pub fn generate_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let seq = NEXT_ID.fetch_add(1, Ordering::Relaxed) + 1;
    format!("{millis}-{seq}")
}
