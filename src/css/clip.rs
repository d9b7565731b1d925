use crate::model::ClipPath;

use super::Num;

/// The `clip-path` value; empty for [`ClipPath::None`] and blank custom values.
pub fn build_clip_path_value(clip_path: &ClipPath) -> String {
    match clip_path {
        ClipPath::None => String::new(),
        ClipPath::Circle {
            radius,
            center_x,
            center_y,
        } => format!(
            "circle({}% at {}% {}%)",
            Num(*radius),
            Num(*center_x),
            Num(*center_y)
        ),
        ClipPath::Ellipse {
            radius_x,
            radius_y,
            center_x,
            center_y,
        } => format!(
            "ellipse({}% {}% at {}% {}%)",
            Num(*radius_x),
            Num(*radius_y),
            Num(*center_x),
            Num(*center_y)
        ),
        ClipPath::Inset {
            top,
            right,
            bottom,
            left,
            border_radius,
        } => {
            let round = if *border_radius > 0.0 {
                format!(" round {}%", Num(*border_radius))
            } else {
                String::new()
            };
            format!(
                "inset({}% {}% {}% {}%{round})",
                Num(*top),
                Num(*right),
                Num(*bottom),
                Num(*left)
            )
        }
        ClipPath::Polygon { points, .. } => {
            let points = points
                .iter()
                .map(|p| format!("{}% {}%", Num(p.x), Num(p.y)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("polygon({points})")
        }
        ClipPath::Custom { value } => value.clone(),
    }
}

pub fn generate_clip_path_css(clip_path: &ClipPath) -> String {
    let value = build_clip_path_value(clip_path);
    if value.is_empty() {
        return String::new();
    }
    format!("  clip-path: {value};")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClipPathKind, ClipPoint};

    #[test]
    fn circle_value() {
        let circle = ClipPath::Circle {
            radius: 50.0,
            center_x: 50.0,
            center_y: 50.0,
        };
        assert_eq!(build_clip_path_value(&circle), "circle(50% at 50% 50%)");
    }

    #[test]
    fn inset_rounding_only_when_positive() {
        let mut inset = ClipPath::default_for(ClipPathKind::Inset);
        assert_eq!(build_clip_path_value(&inset), "inset(5% 5% 5% 5%)");
        if let ClipPath::Inset { border_radius, .. } = &mut inset {
            *border_radius = 12.0;
        }
        assert_eq!(build_clip_path_value(&inset), "inset(5% 5% 5% 5% round 12%)");
    }

    #[test]
    fn ellipse_polygon_and_custom() {
        assert_eq!(
            build_clip_path_value(&ClipPath::default_for(ClipPathKind::Ellipse)),
            "ellipse(50% 40% at 50% 50%)"
        );
        let polygon = ClipPath::Polygon {
            points: vec![ClipPoint::new(0.0, 0.0), ClipPoint::new(100.0, 0.0), ClipPoint::new(50.0, 12.5)],
            preset: "custom".into(),
        };
        assert_eq!(
            build_clip_path_value(&polygon),
            "polygon(0% 0%, 100% 0%, 50% 12.5%)"
        );
        let custom = ClipPath::Custom {
            value: "path('M0 0 L10 10')".into(),
        };
        assert_eq!(
            generate_clip_path_css(&custom),
            "  clip-path: path('M0 0 L10 10');"
        );
    }

    #[test]
    fn none_and_blank_custom_emit_nothing() {
        assert_eq!(generate_clip_path_css(&ClipPath::None), "");
        assert_eq!(
            generate_clip_path_css(&ClipPath::Custom {
                value: String::new()
            }),
            ""
        );
    }
}
