//! Mask layers and the gradient images they paint with.

use serde::{Deserialize, Serialize};

use super::generate_id;
use crate::color::{interpolate_at_position, sorted_stops};

// ============================================================================
// GradientStop
// ============================================================================

/// A control point along a gradient axis.
///
/// Stops are stored in editing order; every consumer sorts by `position`
/// before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct GradientStop {
    pub id: String,
    /// Hex color, e.g. `#000000`.
    pub color: String,
    /// Position along the axis, 0-100.
    pub position: f64,
    /// Stop opacity, 0-1.
    pub opacity: f64,
}

impl GradientStop {
    /// Creates a stop with a fresh id.
    pub fn new(position: f64, color: impl Into<String>, opacity: f64) -> Self {
        Self {
            id: generate_id(),
            color: color.into(),
            position,
            opacity,
        }
    }
}

// ============================================================================
// Gradient variants
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum RadialShape {
    #[default]
    Circle,
    Ellipse,
}

impl RadialShape {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
        }
    }
}

/// Radial gradient extent keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum RadialSize {
    ClosestSide,
    FarthestSide,
    ClosestCorner,
    #[default]
    FarthestCorner,
}

impl RadialSize {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::ClosestSide => "closest-side",
            Self::FarthestSide => "farthest-side",
            Self::ClosestCorner => "closest-corner",
            Self::FarthestCorner => "farthest-corner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct LinearGradient {
    /// CSS angle in degrees; 0 points up, 90 points right.
    pub angle: f64,
    pub stops: Vec<GradientStop>,
    #[serde(default)]
    pub repeating: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct RadialGradient {
    pub shape: RadialShape,
    pub size_keyword: RadialSize,
    /// Center as a percentage of the mask tile width.
    pub center_x: f64,
    /// Center as a percentage of the mask tile height.
    pub center_y: f64,
    pub stops: Vec<GradientStop>,
    #[serde(default)]
    pub repeating: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ConicGradient {
    /// Starting angle in degrees, clockwise from up.
    pub from_angle: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub stops: Vec<GradientStop>,
    #[serde(default)]
    pub repeating: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct UrlMask {
    pub url: String,
}

// ============================================================================
// MaskImage
// ============================================================================

/// The image a mask layer paints with. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(tag = "type")]
pub enum MaskImage {
    #[serde(rename = "linear-gradient")]
    Linear(LinearGradient),
    #[serde(rename = "radial-gradient")]
    Radial(RadialGradient),
    #[serde(rename = "conic-gradient")]
    Conic(ConicGradient),
    #[serde(rename = "url")]
    Url(UrlMask),
}

/// Discriminant of [`MaskImage`], used when switching a layer's image type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    Linear,
    Radial,
    Conic,
    Url,
}

impl GradientKind {
    pub const ALL: [GradientKind; 4] = [Self::Linear, Self::Radial, Self::Conic, Self::Url];

    pub fn as_css(self) -> &'static str {
        match self {
            Self::Linear => "linear-gradient",
            Self::Radial => "radial-gradient",
            Self::Conic => "conic-gradient",
            Self::Url => "url",
        }
    }
}

impl MaskImage {
    pub fn kind(&self) -> GradientKind {
        match self {
            Self::Linear(_) => GradientKind::Linear,
            Self::Radial(_) => GradientKind::Radial,
            Self::Conic(_) => GradientKind::Conic,
            Self::Url(_) => GradientKind::Url,
        }
    }

    /// Gradient stops, or `None` for URL masks.
    pub fn stops(&self) -> Option<&[GradientStop]> {
        match self {
            Self::Linear(g) => Some(&g.stops),
            Self::Radial(g) => Some(&g.stops),
            Self::Conic(g) => Some(&g.stops),
            Self::Url(_) => None,
        }
    }

    pub fn stops_mut(&mut self) -> Option<&mut Vec<GradientStop>> {
        match self {
            Self::Linear(g) => Some(&mut g.stops),
            Self::Radial(g) => Some(&mut g.stops),
            Self::Conic(g) => Some(&mut g.stops),
            Self::Url(_) => None,
        }
    }

    pub fn is_repeating(&self) -> bool {
        match self {
            Self::Linear(g) => g.repeating,
            Self::Radial(g) => g.repeating,
            Self::Conic(g) => g.repeating,
            Self::Url(_) => false,
        }
    }

    pub fn set_repeating(&mut self, repeating: bool) {
        match self {
            Self::Linear(g) => g.repeating = repeating,
            Self::Radial(g) => g.repeating = repeating,
            Self::Conic(g) => g.repeating = repeating,
            Self::Url(_) => {}
        }
    }

    /// Switches to another image type.
    ///
    /// Gradient-to-gradient switches keep the stops and the repeating flag and
    /// reset the geometry to the editor defaults. Switching to a URL mask
    /// discards the stops. Converting to the current kind returns a clone.
    pub fn convert_to(&self, kind: GradientKind) -> MaskImage {
        if kind == self.kind() {
            return self.clone();
        }
        let stops = self.stops().map(<[GradientStop]>::to_vec).unwrap_or_default();
        let repeating = self.is_repeating();
        match kind {
            GradientKind::Linear => Self::Linear(LinearGradient {
                angle: 180.0,
                stops,
                repeating,
            }),
            GradientKind::Radial => Self::Radial(RadialGradient {
                shape: RadialShape::Circle,
                size_keyword: RadialSize::FarthestCorner,
                center_x: 50.0,
                center_y: 50.0,
                stops,
                repeating,
            }),
            GradientKind::Conic => Self::Conic(ConicGradient {
                from_angle: 0.0,
                center_x: 50.0,
                center_y: 50.0,
                stops,
                repeating,
            }),
            GradientKind::Url => Self::Url(UrlMask::default()),
        }
    }

    // ---- Stop editing ----

    /// Inserts a stop at `position`, colored the way the gradient already
    /// paints that point. Returns the new stop's id.
    pub fn add_stop_at(&mut self, position: f64) -> Option<String> {
        let stops = self.stops_mut()?;
        let sample = interpolate_at_position(stops, position);
        let stop = GradientStop::new(position, sample.color, sample.opacity);
        let id = stop.id.clone();
        stops.push(stop);
        Some(id)
    }

    /// Removes a stop, refusing to go below two. Returns true if removed.
    pub fn remove_stop(&mut self, id: &str) -> bool {
        let Some(stops) = self.stops_mut() else {
            return false;
        };
        if stops.len() <= 2 {
            return false;
        }
        let before = stops.len();
        stops.retain(|s| s.id != id);
        stops.len() != before
    }

    /// Edits one stop in place. Returns true if the stop exists.
    pub fn update_stop(&mut self, id: &str, edit: impl FnOnce(&mut GradientStop)) -> bool {
        match self
            .stops_mut()
            .and_then(|stops| stops.iter_mut().find(|s| s.id == id))
        {
            Some(stop) => {
                edit(stop);
                true
            }
            None => false,
        }
    }

    /// Mirrors every stop position around the middle of the axis.
    pub fn reverse_positions(&mut self) {
        if let Some(stops) = self.stops_mut() {
            for stop in stops.iter_mut() {
                stop.position = 100.0 - stop.position;
            }
        }
    }

    /// Spreads stops evenly across 0-100, keeping their positional order.
    pub fn distribute_evenly(&mut self) {
        let Some(stops) = self.stops_mut() else {
            return;
        };
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        let count = stops.len();
        for (i, stop) in stops.iter_mut().enumerate() {
            stop.position = if count == 1 {
                50.0
            } else {
                (i as f64 / (count - 1) as f64 * 100.0).round()
            };
        }
    }

    /// Reverses the color/opacity sequence while keeping positions fixed.
    pub fn flip_colors(&mut self) {
        let Some(stops) = self.stops_mut() else {
            return;
        };
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        let paints: Vec<(String, f64)> = sorted_stops(stops)
            .into_iter()
            .rev()
            .map(|s| (s.color.clone(), s.opacity))
            .collect();
        for (stop, (color, opacity)) in stops.iter_mut().zip(paints) {
            stop.color = color;
            stop.opacity = opacity;
        }
    }
}

// ============================================================================
// Layer properties
// ============================================================================

/// `mask-position`, as raw CSS length/keyword strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct MaskPosition {
    pub x: String,
    pub y: String,
}

impl Default for MaskPosition {
    fn default() -> Self {
        Self {
            x: "center".into(),
            y: "center".into(),
        }
    }
}

/// `mask-size`, as raw CSS length/keyword strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct MaskSize {
    pub width: String,
    pub height: String,
}

impl Default for MaskSize {
    fn default() -> Self {
        Self {
            width: "100%".into(),
            height: "100%".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum MaskRepeat {
    #[default]
    NoRepeat,
    Repeat,
    RepeatX,
    RepeatY,
    Space,
    Round,
}

impl MaskRepeat {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::NoRepeat => "no-repeat",
            Self::Repeat => "repeat",
            Self::RepeatX => "repeat-x",
            Self::RepeatY => "repeat-y",
            Self::Space => "space",
            Self::Round => "round",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum MaskOrigin {
    #[default]
    BorderBox,
    PaddingBox,
    ContentBox,
}

impl MaskOrigin {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::BorderBox => "border-box",
            Self::PaddingBox => "padding-box",
            Self::ContentBox => "content-box",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum MaskClip {
    #[default]
    BorderBox,
    PaddingBox,
    ContentBox,
    NoClip,
}

impl MaskClip {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::BorderBox => "border-box",
            Self::PaddingBox => "padding-box",
            Self::ContentBox => "content-box",
            Self::NoClip => "no-clip",
        }
    }
}

/// How a layer combines with the layers beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum MaskComposite {
    #[default]
    Add,
    Subtract,
    Intersect,
    Exclude,
}

impl MaskComposite {
    /// Keyword for the standard `mask-composite` property.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Intersect => "intersect",
            Self::Exclude => "exclude",
        }
    }

    /// Keyword for the prefixed `-webkit-mask-composite` property.
    pub fn as_webkit(self) -> &'static str {
        match self {
            Self::Add => "source-over",
            Self::Subtract => "source-out",
            Self::Intersect => "source-in",
            Self::Exclude => "xor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum MaskMode {
    Alpha,
    Luminance,
    #[default]
    MatchSource,
}

impl MaskMode {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Luminance => "luminance",
            Self::MatchSource => "match-source",
        }
    }
}

// ============================================================================
// MaskLayer
// ============================================================================

/// One entry of the ordered mask stack. The first layer is the base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct MaskLayer {
    pub id: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    pub name: String,
    pub mask_image: MaskImage,
    #[serde(default)]
    pub mask_position: MaskPosition,
    #[serde(default)]
    pub mask_size: MaskSize,
    #[serde(default)]
    pub mask_repeat: MaskRepeat,
    #[serde(default)]
    pub mask_origin: MaskOrigin,
    #[serde(default)]
    pub mask_clip: MaskClip,
    #[serde(default)]
    pub mask_composite: MaskComposite,
    #[serde(default)]
    pub mask_mode: MaskMode,
}

impl MaskLayer {
    /// Creates a visible layer with CSS-default placement around `mask_image`.
    pub fn new(name: impl Into<String>, mask_image: MaskImage) -> Self {
        Self {
            id: generate_id(),
            visible: true,
            name: name.into(),
            mask_image,
            mask_position: MaskPosition::default(),
            mask_size: MaskSize::default(),
            mask_repeat: MaskRepeat::default(),
            mask_origin: MaskOrigin::default(),
            mask_clip: MaskClip::default(),
            mask_composite: MaskComposite::default(),
            mask_mode: MaskMode::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(stops: Vec<GradientStop>) -> MaskImage {
        MaskImage::Linear(LinearGradient {
            angle: 90.0,
            stops,
            repeating: true,
        })
    }

    fn two_stops() -> Vec<GradientStop> {
        vec![
            GradientStop::new(0.0, "#000000", 1.0),
            GradientStop::new(100.0, "#ffffff", 0.0),
        ]
    }

    #[test]
    fn convert_between_gradients_keeps_stops() {
        let image = linear(two_stops());
        let radial = image.convert_to(GradientKind::Radial);
        let MaskImage::Radial(ref g) = radial else {
            panic!("expected radial");
        };
        assert_eq!(g.stops, image.stops().unwrap());
        assert!(g.repeating);
        assert_eq!(g.size_keyword, RadialSize::FarthestCorner);

        let conic = radial.convert_to(GradientKind::Conic);
        assert_eq!(conic.stops(), image.stops());
        assert_eq!(conic.kind(), GradientKind::Conic);
    }

    #[test]
    fn convert_to_url_discards_stops() {
        let url = linear(two_stops()).convert_to(GradientKind::Url);
        assert_eq!(url, MaskImage::Url(UrlMask::default()));
        assert!(url.stops().is_none());

        let back = url.convert_to(GradientKind::Linear);
        assert_eq!(back.stops().map(<[_]>::len), Some(0));
    }

    #[test]
    fn add_stop_uses_interpolated_paint() {
        let mut image = linear(two_stops());
        let id = image.add_stop_at(50.0).unwrap();
        let stops = image.stops().unwrap();
        let added = stops.iter().find(|s| s.id == id).unwrap();
        assert_eq!(added.color, "#808080");
        assert_eq!(added.opacity, 0.5);
        assert_eq!(stops.len(), 3);
    }

    #[test]
    fn remove_stop_keeps_minimum_of_two() {
        let mut image = linear(two_stops());
        let first = image.stops().unwrap()[0].id.clone();
        assert!(!image.remove_stop(&first));

        let extra = image.add_stop_at(25.0).unwrap();
        assert!(image.remove_stop(&extra));
        assert_eq!(image.stops().unwrap().len(), 2);
        assert!(!image.remove_stop("missing"));
    }

    #[test]
    fn distribute_and_reverse() {
        let mut image = linear(vec![
            GradientStop::new(90.0, "#000000", 1.0),
            GradientStop::new(10.0, "#111111", 1.0),
            GradientStop::new(20.0, "#222222", 1.0),
        ]);
        image.distribute_evenly();
        let positions: Vec<f64> = image.stops().unwrap().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 50.0, 100.0]);
        assert_eq!(image.stops().unwrap()[0].color, "#111111");

        image.reverse_positions();
        let positions: Vec<f64> = image.stops().unwrap().iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![100.0, 50.0, 0.0]);
    }

    #[test]
    fn flip_colors_reverses_paint_order() {
        let mut image = linear(vec![
            GradientStop::new(100.0, "#ffffff", 0.0),
            GradientStop::new(0.0, "#000000", 1.0),
        ]);
        image.flip_colors();
        let stops = image.stops().unwrap();
        assert_eq!(stops[0].position, 0.0);
        assert_eq!(stops[0].color, "#ffffff");
        assert_eq!(stops[0].opacity, 0.0);
        assert_eq!(stops[1].color, "#000000");
    }

    #[test]
    fn layer_json_uses_css_keywords() {
        let mut layer = MaskLayer::new("Layer 1", linear(two_stops()));
        layer.mask_repeat = MaskRepeat::RepeatX;
        layer.mask_clip = MaskClip::NoClip;
        let json = serde_json::to_string(&layer).unwrap();
        assert!(json.contains("\"type\":\"linear-gradient\""));
        assert!(json.contains("\"maskRepeat\":\"repeat-x\""));
        assert!(json.contains("\"maskClip\":\"no-clip\""));
        assert!(json.contains("\"maskMode\":\"match-source\""));

        let restored: MaskLayer = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, layer);
    }

    #[test]
    fn layer_json_fills_missing_properties() {
        let json = r#"{
            "id": "a",
            "name": "Loose",
            "maskImage": { "type": "url", "url": "mask.png" }
        }"#;
        let layer: MaskLayer = serde_json::from_str(json).unwrap();
        assert!(layer.visible);
        assert_eq!(layer.mask_position, MaskPosition::default());
        assert_eq!(layer.mask_composite, MaskComposite::Add);
    }
}
