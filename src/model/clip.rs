//! CSS `clip-path` shapes.
//!
//! All lengths are percentages of the reference box, matching what the
//! editor exposes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ClipPoint {
    pub x: f64,
    pub y: f64,
}

impl ClipPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClipPath {
    #[default]
    None,
    #[serde(rename_all = "camelCase")]
    Circle {
        radius: f64,
        center_x: f64,
        center_y: f64,
    },
    #[serde(rename_all = "camelCase")]
    Ellipse {
        radius_x: f64,
        radius_y: f64,
        center_x: f64,
        center_y: f64,
    },
    #[serde(rename_all = "camelCase")]
    Inset {
        top: f64,
        right: f64,
        bottom: f64,
        left: f64,
        border_radius: f64,
    },
    Polygon {
        points: Vec<ClipPoint>,
        /// Name of the preset the points came from, or `custom` once edited.
        #[serde(default)]
        preset: String,
    },
    /// Raw CSS passed through verbatim.
    Custom { value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipPathKind {
    None,
    Circle,
    Ellipse,
    Inset,
    Polygon,
    Custom,
}

impl ClipPathKind {
    pub const ALL: [ClipPathKind; 6] = [
        Self::None,
        Self::Circle,
        Self::Ellipse,
        Self::Inset,
        Self::Polygon,
        Self::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Inset => "inset",
            Self::Polygon => "polygon",
            Self::Custom => "custom",
        }
    }
}

impl ClipPath {
    pub fn kind(&self) -> ClipPathKind {
        match self {
            Self::None => ClipPathKind::None,
            Self::Circle { .. } => ClipPathKind::Circle,
            Self::Ellipse { .. } => ClipPathKind::Ellipse,
            Self::Inset { .. } => ClipPathKind::Inset,
            Self::Polygon { .. } => ClipPathKind::Polygon,
            Self::Custom { .. } => ClipPathKind::Custom,
        }
    }

    /// The starting shape the editor offers when switching to `kind`.
    pub fn default_for(kind: ClipPathKind) -> ClipPath {
        match kind {
            ClipPathKind::None => Self::None,
            ClipPathKind::Circle => Self::Circle {
                radius: 50.0,
                center_x: 50.0,
                center_y: 50.0,
            },
            ClipPathKind::Ellipse => Self::Ellipse {
                radius_x: 50.0,
                radius_y: 40.0,
                center_x: 50.0,
                center_y: 50.0,
            },
            ClipPathKind::Inset => Self::Inset {
                top: 5.0,
                right: 5.0,
                bottom: 5.0,
                left: 5.0,
                border_radius: 0.0,
            },
            ClipPathKind::Polygon => Self::Polygon {
                points: polygon_preset("triangle").unwrap_or_default(),
                preset: "triangle".into(),
            },
            ClipPathKind::Custom => Self::Custom {
                value: String::new(),
            },
        }
    }
}

// ============================================================================
// Polygon presets
// ============================================================================

const fn p(x: f64, y: f64) -> ClipPoint {
    ClipPoint::new(x, y)
}

/// Named polygon shapes, in menu order.
pub const POLYGON_PRESETS: &[(&str, &[ClipPoint])] = &[
    ("triangle", &[p(50.0, 0.0), p(100.0, 100.0), p(0.0, 100.0)]),
    (
        "pentagon",
        &[p(50.0, 0.0), p(100.0, 38.0), p(82.0, 100.0), p(18.0, 100.0), p(0.0, 38.0)],
    ),
    (
        "hexagon",
        &[
            p(50.0, 0.0),
            p(100.0, 25.0),
            p(100.0, 75.0),
            p(50.0, 100.0),
            p(0.0, 75.0),
            p(0.0, 25.0),
        ],
    ),
    (
        "star",
        &[
            p(50.0, 0.0),
            p(61.0, 35.0),
            p(98.0, 35.0),
            p(68.0, 57.0),
            p(79.0, 91.0),
            p(50.0, 70.0),
            p(21.0, 91.0),
            p(32.0, 57.0),
            p(2.0, 35.0),
            p(39.0, 35.0),
        ],
    ),
    (
        "arrow",
        &[
            p(40.0, 0.0),
            p(60.0, 0.0),
            p(60.0, 60.0),
            p(100.0, 60.0),
            p(50.0, 100.0),
            p(0.0, 60.0),
            p(40.0, 60.0),
        ],
    ),
    (
        "cross",
        &[
            p(35.0, 0.0),
            p(65.0, 0.0),
            p(65.0, 35.0),
            p(100.0, 35.0),
            p(100.0, 65.0),
            p(65.0, 65.0),
            p(65.0, 100.0),
            p(35.0, 100.0),
            p(35.0, 65.0),
            p(0.0, 65.0),
            p(0.0, 35.0),
            p(35.0, 35.0),
        ],
    ),
];

/// Looks up a polygon preset by name.
pub fn polygon_preset(name: &str) -> Option<Vec<ClipPoint>> {
    POLYGON_PRESETS
        .iter()
        .find(|(preset, _)| *preset == name)
        .map(|(_, points)| points.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_kind() {
        for kind in ClipPathKind::ALL {
            assert_eq!(ClipPath::default_for(kind).kind(), kind);
        }
        let ClipPath::Polygon { points, preset } = ClipPath::default_for(ClipPathKind::Polygon)
        else {
            panic!("expected polygon");
        };
        assert_eq!(points.len(), 3);
        assert_eq!(preset, "triangle");
    }

    #[test]
    fn presets_are_well_formed() {
        assert_eq!(POLYGON_PRESETS.len(), 6);
        for (name, points) in POLYGON_PRESETS {
            assert!(points.len() >= 3, "{name}");
            assert!(
                points
                    .iter()
                    .all(|pt| (0.0..=100.0).contains(&pt.x) && (0.0..=100.0).contains(&pt.y))
            );
        }
        assert!(polygon_preset("octagon").is_none());
        assert_eq!(polygon_preset("cross").map(|p| p.len()), Some(12));
    }

    #[test]
    fn json_shape() {
        let clip = ClipPath::default_for(ClipPathKind::Inset);
        let json = serde_json::to_string(&clip).unwrap();
        assert_eq!(
            json,
            r#"{"type":"inset","top":5.0,"right":5.0,"bottom":5.0,"left":5.0,"borderRadius":0.0}"#
        );
        let none: ClipPath = serde_json::from_str(r#"{"type":"none"}"#).unwrap();
        assert_eq!(none, ClipPath::None);
        let circle: ClipPath =
            serde_json::from_str(r#"{"type":"circle","radius":30,"centerX":40,"centerY":60}"#)
                .unwrap();
        assert_eq!(
            circle,
            ClipPath::Circle {
                radius: 30.0,
                center_x: 40.0,
                center_y: 60.0
            }
        );
    }
}
