//! The built-in preset catalog.
//!
//! A preset is a named partial document. Applying one replaces only the keys
//! its patch carries; see [`StudioStore::apply_preset`](crate::StudioStore::apply_preset).
//! Patches are built on demand so every application mints fresh layer and
//! stop ids.

use serde::{Deserialize, Serialize};

use crate::model::{
    BlendMode, ClipPath, ClipPoint, DocumentState, Filters, GradientStop, LinearGradient,
    MaskImage, MaskLayer, MaskMode, MaskRepeat, MaskSize, RadialGradient, RadialShape, RadialSize,
    polygon_preset,
};

// ============================================================================
// PresetPatch
// ============================================================================

/// The document keys a preset replaces. `None` leaves a key untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PresetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_layers: Option<Vec<MaskLayer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_path: Option<ClipPath>,
}

impl PresetPatch {
    /// Writes the present keys into `doc`. Supplying layers also selects the
    /// first of them, or nothing for an empty list.
    pub fn apply_to(&self, doc: &mut DocumentState) {
        if let Some(layers) = &self.mask_layers {
            doc.mask_layers = layers.clone();
            doc.active_mask_layer_id = layers.first().map(|l| l.id.clone());
        }
        if let Some(filters) = &self.filters {
            doc.filters = filters.clone();
        }
        if let Some(mode) = self.blend_mode {
            doc.blend_mode = mode;
        }
        if let Some(clip) = &self.clip_path {
            doc.clip_path = clip.clone();
        }
    }
}

// ============================================================================
// Preset
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum PresetCategory {
    Mask,
    Filter,
    Clip,
    Combined,
}

impl PresetCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mask => "mask",
            Self::Filter => "filter",
            Self::Clip => "clip",
            Self::Combined => "combined",
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub category: PresetCategory,
    pub description: &'static str,
    build: fn() -> PresetPatch,
}

impl Preset {
    /// A freshly built patch for this preset.
    pub fn patch(&self) -> PresetPatch {
        (self.build)()
    }
}

/// Every built-in preset, in display order.
pub fn presets() -> &'static [Preset] {
    PRESETS
}

pub fn find_preset(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.id == id)
}

pub fn presets_in(category: PresetCategory) -> impl Iterator<Item = &'static Preset> {
    PRESETS.iter().filter(move |p| p.category == category)
}

const PRESETS: &[Preset] = &[
    // ---- Masks ----
    Preset {
        id: "fade-bottom",
        name: "Fade Bottom",
        category: PresetCategory::Mask,
        description: "Fades to transparent at the bottom",
        build: || masks(linear_layer("Fade Bottom", 180.0, &[(0.0, 1.0), (70.0, 1.0), (100.0, 0.0)])),
    },
    Preset {
        id: "fade-edges",
        name: "Fade Edges",
        category: PresetCategory::Mask,
        description: "Fades all edges to transparent",
        build: || {
            masks(radial_layer(
                "Fade Edges",
                RadialShape::Ellipse,
                RadialSize::FarthestCorner,
                &[(0.0, 1.0), (60.0, 1.0), (100.0, 0.0)],
            ))
        },
    },
    Preset {
        id: "vignette",
        name: "Vignette",
        category: PresetCategory::Mask,
        description: "Dark vignette around edges",
        build: || {
            masks(radial_layer(
                "Vignette",
                RadialShape::Ellipse,
                RadialSize::FarthestCorner,
                &[(0.0, 1.0), (50.0, 1.0), (100.0, 0.0)],
            ))
        },
    },
    Preset {
        id: "spotlight",
        name: "Spotlight",
        category: PresetCategory::Mask,
        description: "Circular spotlight in center",
        build: || {
            masks(radial_layer(
                "Spotlight",
                RadialShape::Circle,
                RadialSize::ClosestSide,
                &[(0.0, 1.0), (80.0, 1.0), (100.0, 0.0)],
            ))
        },
    },
    Preset {
        id: "diagonal-wipe",
        name: "Diagonal Wipe",
        category: PresetCategory::Mask,
        description: "Diagonal transition wipe",
        build: || masks(linear_layer("Diagonal Wipe", 135.0, &[(0.0, 1.0), (40.0, 1.0), (60.0, 0.0)])),
    },
    Preset {
        id: "wave",
        name: "Wave",
        category: PresetCategory::Mask,
        description: "Repeating wave pattern",
        build: || {
            let mut layer = linear_layer("Wave", 0.0, &[(0.0, 1.0), (50.0, 0.0), (100.0, 1.0)]);
            layer.mask_image.set_repeating(true);
            layer.mask_size = MaskSize {
                width: "100%".into(),
                height: "20%".into(),
            };
            layer.mask_repeat = MaskRepeat::Repeat;
            masks(layer)
        },
    },
    // ---- Filters ----
    Preset {
        id: "vintage",
        name: "Vintage",
        category: PresetCategory::Filter,
        description: "Warm vintage film look",
        build: || {
            filters(|f| {
                f.sepia = 40.0;
                f.saturate = 80.0;
                f.contrast = 110.0;
                f.brightness = 105.0;
            })
        },
    },
    Preset {
        id: "noir",
        name: "Noir",
        category: PresetCategory::Filter,
        description: "Black and white film noir",
        build: || {
            filters(|f| {
                f.grayscale = 100.0;
                f.contrast = 130.0;
                f.brightness = 90.0;
            })
        },
    },
    Preset {
        id: "warm",
        name: "Warm",
        category: PresetCategory::Filter,
        description: "Warm golden tone",
        build: || {
            filters(|f| {
                f.sepia = 20.0;
                f.saturate = 130.0;
                f.brightness = 105.0;
                f.hue_rotate = 350.0;
            })
        },
    },
    Preset {
        id: "cool",
        name: "Cool",
        category: PresetCategory::Filter,
        description: "Cool blue tone",
        build: || {
            filters(|f| {
                f.saturate = 80.0;
                f.brightness = 105.0;
                f.hue_rotate = 190.0;
            })
        },
    },
    Preset {
        id: "high-contrast",
        name: "High Contrast",
        category: PresetCategory::Filter,
        description: "Punchy high contrast",
        build: || {
            filters(|f| {
                f.contrast = 150.0;
                f.saturate = 120.0;
                f.brightness = 105.0;
            })
        },
    },
    Preset {
        id: "dreamy",
        name: "Dreamy",
        category: PresetCategory::Filter,
        description: "Soft dreamy blur",
        build: || {
            filters(|f| {
                f.blur = 1.0;
                f.brightness = 110.0;
                f.saturate = 120.0;
                f.contrast = 90.0;
            })
        },
    },
    // ---- Clip paths ----
    Preset {
        id: "clip-circle",
        name: "Circle",
        category: PresetCategory::Clip,
        description: "Circular crop",
        build: || {
            clip(ClipPath::Circle {
                radius: 45.0,
                center_x: 50.0,
                center_y: 50.0,
            })
        },
    },
    Preset {
        id: "clip-rounded",
        name: "Rounded",
        category: PresetCategory::Clip,
        description: "Rounded rectangle crop",
        build: || clip(inset(2.0, 2.0, 10.0)),
    },
    Preset {
        id: "clip-diamond",
        name: "Diamond",
        category: PresetCategory::Clip,
        description: "Diamond shape crop",
        build: || {
            clip(ClipPath::Polygon {
                points: vec![
                    ClipPoint::new(50.0, 0.0),
                    ClipPoint::new(100.0, 50.0),
                    ClipPoint::new(50.0, 100.0),
                    ClipPoint::new(0.0, 50.0),
                ],
                preset: "diamond".into(),
            })
        },
    },
    Preset {
        id: "clip-star",
        name: "Star",
        category: PresetCategory::Clip,
        description: "Star shape crop",
        build: || clip(named_polygon("star")),
    },
    Preset {
        id: "clip-hexagon",
        name: "Hexagon",
        category: PresetCategory::Clip,
        description: "Hexagon shape crop",
        build: || clip(named_polygon("hexagon")),
    },
    // ---- Combined ----
    Preset {
        id: "cinematic",
        name: "Cinematic",
        category: PresetCategory::Combined,
        description: "Cinematic widescreen with color grading",
        build: || PresetPatch {
            mask_layers: Some(vec![radial_layer(
                "Cinematic Mask",
                RadialShape::Ellipse,
                RadialSize::FarthestCorner,
                &[(0.0, 1.0), (60.0, 1.0), (100.0, 0.3)],
            )]),
            filters: Some(tuned_filters(|f| {
                f.contrast = 120.0;
                f.saturate = 80.0;
                f.brightness = 95.0;
            })),
            clip_path: Some(inset(10.0, 0.0, 0.0)),
            ..PresetPatch::default()
        },
    },
    Preset {
        id: "polaroid",
        name: "Polaroid",
        category: PresetCategory::Combined,
        description: "Vintage polaroid frame",
        build: || PresetPatch {
            filters: Some(tuned_filters(|f| {
                f.sepia = 30.0;
                f.contrast = 110.0;
                f.brightness = 110.0;
                f.saturate = 90.0;
            })),
            clip_path: Some(inset(2.0, 2.0, 1.0)),
            ..PresetPatch::default()
        },
    },
    Preset {
        id: "duotone",
        name: "Duotone",
        category: PresetCategory::Combined,
        description: "Duotone color effect",
        build: || {
            filters(|f| {
                f.grayscale = 100.0;
                f.sepia = 100.0;
                f.hue_rotate = 180.0;
                f.saturate = 200.0;
                f.brightness = 90.0;
                f.contrast = 120.0;
            })
        },
    },
];

// ============================================================================
// Builders
// ============================================================================

/// Black stops from `(position, opacity)` pairs.
fn black_stops(stops: &[(f64, f64)]) -> Vec<GradientStop> {
    stops
        .iter()
        .map(|&(position, opacity)| GradientStop::new(position, "#000000", opacity))
        .collect()
}

/// Preset layers read coverage from the stop alpha.
fn preset_layer(name: &str, mask_image: MaskImage) -> MaskLayer {
    MaskLayer {
        mask_mode: MaskMode::Alpha,
        ..MaskLayer::new(name, mask_image)
    }
}

fn linear_layer(name: &str, angle: f64, stops: &[(f64, f64)]) -> MaskLayer {
    preset_layer(
        name,
        MaskImage::Linear(LinearGradient {
            angle,
            stops: black_stops(stops),
            repeating: false,
        }),
    )
}

fn radial_layer(name: &str, shape: RadialShape, size: RadialSize, stops: &[(f64, f64)]) -> MaskLayer {
    preset_layer(
        name,
        MaskImage::Radial(RadialGradient {
            shape,
            size_keyword: size,
            center_x: 50.0,
            center_y: 50.0,
            stops: black_stops(stops),
            repeating: false,
        }),
    )
}

fn masks(layer: MaskLayer) -> PresetPatch {
    PresetPatch {
        mask_layers: Some(vec![layer]),
        ..PresetPatch::default()
    }
}

/// Neutral filters with a few sliders moved.
fn tuned_filters(tune: impl FnOnce(&mut Filters)) -> Filters {
    let mut filters = Filters::default();
    tune(&mut filters);
    filters
}

fn filters(tune: impl FnOnce(&mut Filters)) -> PresetPatch {
    PresetPatch {
        filters: Some(tuned_filters(tune)),
        ..PresetPatch::default()
    }
}

fn clip(clip_path: ClipPath) -> PresetPatch {
    PresetPatch {
        clip_path: Some(clip_path),
        ..PresetPatch::default()
    }
}

/// Inset with equal top/bottom and equal left/right margins.
fn inset(vertical: f64, horizontal: f64, border_radius: f64) -> ClipPath {
    ClipPath::Inset {
        top: vertical,
        right: horizontal,
        bottom: vertical,
        left: horizontal,
        border_radius,
    }
}

fn named_polygon(name: &str) -> ClipPath {
    ClipPath::Polygon {
        points: polygon_preset(name).unwrap_or_default(),
        preset: name.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StudioStore;
    use crate::css::build_clip_path_value;
    use crate::model::FilterKind;
    use std::collections::HashSet;

    #[test]
    fn catalog_ids_are_unique() {
        let ids: HashSet<&str> = presets().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), presets().len());
        assert_eq!(presets().len(), 20);
        assert_eq!(presets_in(PresetCategory::Clip).count(), 5);
    }

    #[test]
    fn every_preset_patches_something() {
        for preset in presets() {
            let patch = preset.patch();
            assert!(
                patch.mask_layers.is_some()
                    || patch.filters.is_some()
                    || patch.blend_mode.is_some()
                    || patch.clip_path.is_some(),
                "{}",
                preset.id
            );
        }
    }

    #[test]
    fn patches_mint_fresh_ids() {
        let preset = find_preset("vignette").unwrap();
        let a = preset.patch().mask_layers.unwrap();
        let b = preset.patch().mask_layers.unwrap();
        assert_ne!(a[0].id, b[0].id);
    }

    #[test]
    fn polygon_presets_resolve() {
        let Some(ClipPath::Polygon { points, .. }) = find_preset("clip-star").unwrap().patch().clip_path
        else {
            panic!("expected polygon");
        };
        assert_eq!(points.len(), 10);
    }

    #[test]
    fn clip_presets_serialize() {
        let expected = [
            ("clip-circle", "circle(45% at 50% 50%)"),
            ("clip-rounded", "inset(2% 2% 2% 2% round 10%)"),
            ("clip-diamond", "polygon(50% 0%, 100% 50%, 50% 100%, 0% 50%)"),
            (
                "clip-star",
                "polygon(50% 0%, 61% 35%, 98% 35%, 68% 57%, 79% 91%, \
                 50% 70%, 21% 91%, 32% 57%, 2% 35%, 39% 35%)",
            ),
            (
                "clip-hexagon",
                "polygon(50% 0%, 100% 25%, 100% 75%, 50% 100%, 0% 75%, 0% 25%)",
            ),
        ];
        for (id, value) in expected {
            let clip = find_preset(id).unwrap().patch().clip_path.unwrap();
            assert_eq!(build_clip_path_value(&clip), value, "{id}");
        }
        let cinematic = find_preset("cinematic").unwrap().patch().clip_path.unwrap();
        assert_eq!(build_clip_path_value(&cinematic), "inset(10% 0% 10% 0%)");
        let polaroid = find_preset("polaroid").unwrap().patch().clip_path.unwrap();
        assert_eq!(build_clip_path_value(&polaroid), "inset(2% 2% 2% 2% round 1%)");
    }

    #[test]
    fn preset_layers_use_alpha_mode() {
        for preset in presets() {
            for layer in preset.patch().mask_layers.unwrap_or_default() {
                assert_eq!(layer.mask_mode, MaskMode::Alpha, "{}", preset.id);
            }
        }
    }

    #[test]
    fn apply_then_undo_is_one_step() {
        let mut store = StudioStore::new();
        store.set_filter(FilterKind::Blur, 3.0);
        let before = store.document().clone();

        store.apply_preset(&find_preset("cinematic").unwrap().patch());
        let doc = store.document();
        assert_eq!(doc.mask_layers.len(), 1);
        assert_eq!(doc.active_mask_layer_id.as_deref(), Some(doc.mask_layers[0].id.as_str()));
        assert_eq!(doc.filters.contrast, 120.0);
        assert_eq!(doc.filters.blur, 0.0);

        assert!(store.undo());
        assert_eq!(store.document(), &before);
    }

    #[test]
    fn patch_leaves_absent_keys_alone() {
        let mut doc = DocumentState::default();
        doc.blend_mode = BlendMode::Overlay;
        doc.filters.blur = 4.0;
        find_preset("clip-circle").unwrap().patch().apply_to(&mut doc);
        assert_eq!(doc.blend_mode, BlendMode::Overlay);
        assert_eq!(doc.filters.blur, 4.0);
        assert!(matches!(doc.clip_path, ClipPath::Circle { .. }));
    }

    #[test]
    fn empty_layer_list_clears_selection() {
        let mut doc = DocumentState::default();
        doc.active_mask_layer_id = Some("old".into());
        PresetPatch {
            mask_layers: Some(Vec::new()),
            ..PresetPatch::default()
        }
        .apply_to(&mut doc);
        assert_eq!(doc.active_mask_layer_id, None);
    }

    #[test]
    fn patch_json_omits_absent_keys() {
        let json = serde_json::to_string(&find_preset("noir").unwrap().patch()).unwrap();
        assert!(json.starts_with("{\"filters\""));
        assert!(!json.contains("clipPath"));
    }
}
