//! The root aggregate and its presentation-only subtrees.

use serde::{Deserialize, Serialize};

use super::{ClipPath, Filters, MaskLayer};

// ============================================================================
// BlendMode
// ============================================================================

/// CSS `mix-blend-mode` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    pub const ALL: [BlendMode; 16] = [
        Self::Normal,
        Self::Multiply,
        Self::Screen,
        Self::Overlay,
        Self::Darken,
        Self::Lighten,
        Self::ColorDodge,
        Self::ColorBurn,
        Self::HardLight,
        Self::SoftLight,
        Self::Difference,
        Self::Exclusion,
        Self::Hue,
        Self::Saturation,
        Self::Color,
        Self::Luminosity,
    ];

    pub fn as_css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Color => "color",
            Self::Luminosity => "luminosity",
        }
    }
}

// ============================================================================
// Image and presentation state
// ============================================================================

/// The loaded source image as the acquisition boundary hands it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    /// `data:` URL, file path or remote URL.
    pub src: String,
    pub natural_width: u32,
    pub natural_height: u32,
    pub file_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum SidebarPanel {
    #[default]
    Masks,
    Filters,
    Clip,
    Presets,
}

/// Which generated stylesheet the CSS output panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum CssOutputTab {
    #[default]
    Full,
    Mask,
    Filter,
    Clip,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct UiState {
    pub active_panel: SidebarPanel,
    pub css_output_expanded: bool,
    pub css_output_tab: CssOutputTab,
    pub export_dialog_open: bool,
}

// ============================================================================
// DocumentState / StudioState
// ============================================================================

/// The undo-tracked part of the editor state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentState {
    pub image: Option<ImageData>,
    pub mask_layers: Vec<MaskLayer>,
    pub active_mask_layer_id: Option<String>,
    pub filters: Filters,
    pub blend_mode: BlendMode,
    pub clip_path: ClipPath,
}

impl DocumentState {
    pub fn layer(&self, id: &str) -> Option<&MaskLayer> {
        self.mask_layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: &str) -> Option<&mut MaskLayer> {
        self.mask_layers.iter_mut().find(|l| l.id == id)
    }

    pub fn active_layer(&self) -> Option<&MaskLayer> {
        self.active_mask_layer_id
            .as_deref()
            .and_then(|id| self.layer(id))
    }

    /// Visible layers in painting order.
    pub fn visible_layers(&self) -> impl Iterator<Item = &MaskLayer> {
        self.mask_layers.iter().filter(|l| l.visible)
    }
}

/// Complete editor state: the document plus viewport and UI flags.
///
/// The JSON form is flat, the same object the web front-end holds:
///
/// ```
/// use maskit::StudioState;
///
/// let state = StudioState::from_json(r#"{"blendMode": "multiply"}"#).unwrap();
/// assert_eq!(state.document.blend_mode.as_css(), "multiply");
/// assert!(state.to_json().unwrap().contains("\"maskLayers\":[]"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct StudioState {
    #[serde(flatten)]
    pub document: DocumentState,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub ui: UiState,
}

impl StudioState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
