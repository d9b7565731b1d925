//! CSS `filter` settings.

use serde::{Deserialize, Serialize};

/// The optional `drop-shadow()` filter term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DropShadow {
    pub enabled: bool,
    pub x: f64,
    pub y: f64,
    pub blur: f64,
    /// Hex color, e.g. `#000000`.
    pub color: String,
    /// Shadow alpha, 0-1.
    pub color_opacity: f64,
}

impl Default for DropShadow {
    fn default() -> Self {
        Self {
            enabled: false,
            x: 4.0,
            y: 4.0,
            blur: 8.0,
            color: "#000000".into(),
            color_opacity: 0.5,
        }
    }
}

/// The nine scalar filter sliders plus the drop shadow.
///
/// [`Filters::default`] is the neutral configuration: serializing it yields
/// no filter terms at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct Filters {
    pub blur: f64,
    pub brightness: f64,
    pub contrast: f64,
    pub grayscale: f64,
    pub hue_rotate: f64,
    pub invert: f64,
    pub opacity: f64,
    pub saturate: f64,
    pub sepia: f64,
    pub drop_shadow: DropShadow,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            blur: 0.0,
            brightness: 100.0,
            contrast: 100.0,
            grayscale: 0.0,
            hue_rotate: 0.0,
            invert: 0.0,
            opacity: 100.0,
            saturate: 100.0,
            sepia: 0.0,
            drop_shadow: DropShadow::default(),
        }
    }
}

impl Filters {
    pub fn get(&self, kind: FilterKind) -> f64 {
        match kind {
            FilterKind::Blur => self.blur,
            FilterKind::Brightness => self.brightness,
            FilterKind::Contrast => self.contrast,
            FilterKind::Grayscale => self.grayscale,
            FilterKind::HueRotate => self.hue_rotate,
            FilterKind::Invert => self.invert,
            FilterKind::Opacity => self.opacity,
            FilterKind::Saturate => self.saturate,
            FilterKind::Sepia => self.sepia,
        }
    }

    pub fn set(&mut self, kind: FilterKind, value: f64) {
        let slot = match kind {
            FilterKind::Blur => &mut self.blur,
            FilterKind::Brightness => &mut self.brightness,
            FilterKind::Contrast => &mut self.contrast,
            FilterKind::Grayscale => &mut self.grayscale,
            FilterKind::HueRotate => &mut self.hue_rotate,
            FilterKind::Invert => &mut self.invert,
            FilterKind::Opacity => &mut self.opacity,
            FilterKind::Saturate => &mut self.saturate,
            FilterKind::Sepia => &mut self.sepia,
        };
        *slot = value;
    }

    /// Scalar filters that differ from their neutral value, in CSS order.
    pub fn active(&self) -> impl Iterator<Item = (FilterKind, f64)> + '_ {
        FilterKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|&(kind, value)| value != kind.neutral())
    }

    /// True when no scalar filter is active and the shadow is off.
    pub fn is_neutral(&self) -> bool {
        self.active().next().is_none() && !self.drop_shadow.enabled
    }
}

// ============================================================================
// FilterKind
// ============================================================================

/// One of the scalar filter functions, in the order they are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Blur,
    Brightness,
    Contrast,
    Grayscale,
    HueRotate,
    Invert,
    Opacity,
    Saturate,
    Sepia,
}

impl FilterKind {
    pub const ALL: [FilterKind; 9] = [
        Self::Blur,
        Self::Brightness,
        Self::Contrast,
        Self::Grayscale,
        Self::HueRotate,
        Self::Invert,
        Self::Opacity,
        Self::Saturate,
        Self::Sepia,
    ];

    /// CSS function name.
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Grayscale => "grayscale",
            Self::HueRotate => "hue-rotate",
            Self::Invert => "invert",
            Self::Opacity => "opacity",
            Self::Saturate => "saturate",
            Self::Sepia => "sepia",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Blur => "Blur",
            Self::Brightness => "Brightness",
            Self::Contrast => "Contrast",
            Self::Grayscale => "Grayscale",
            Self::HueRotate => "Hue Rotate",
            Self::Invert => "Invert",
            Self::Opacity => "Opacity",
            Self::Saturate => "Saturate",
            Self::Sepia => "Sepia",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Blur => "px",
            Self::HueRotate => "deg",
            _ => "%",
        }
    }

    /// Slider range as `(min, max)`.
    pub fn range(self) -> (f64, f64) {
        match self {
            Self::Blur => (0.0, 50.0),
            Self::Brightness | Self::Contrast | Self::Saturate => (0.0, 300.0),
            Self::HueRotate => (0.0, 360.0),
            Self::Grayscale | Self::Invert | Self::Opacity | Self::Sepia => (0.0, 100.0),
        }
    }

    /// The value at which the filter has no effect and is omitted from CSS.
    pub fn neutral(self) -> f64 {
        match self {
            Self::Brightness | Self::Contrast | Self::Opacity | Self::Saturate => 100.0,
            _ => 0.0,
        }
    }
}
