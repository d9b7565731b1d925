//! Constructors for freshly created model values.

use crate::model::{GradientStop, LinearGradient, MaskImage, MaskLayer};

pub fn create_default_gradient_stop(position: f64, color: &str, opacity: f64) -> GradientStop {
    GradientStop::new(position, color, opacity)
}

/// A 180 degree fade from opaque to transparent black.
pub fn create_default_linear_gradient() -> MaskImage {
    MaskImage::Linear(LinearGradient {
        angle: 180.0,
        stops: vec![
            create_default_gradient_stop(0.0, "#000000", 1.0),
            create_default_gradient_stop(100.0, "#000000", 0.0),
        ],
        repeating: false,
    })
}

/// A visible layer with the default fade and CSS-default placement.
///
/// `name` falls back to `Mask Layer` when not given.
pub fn create_default_mask_layer(name: Option<&str>) -> MaskLayer {
    MaskLayer::new(
        name.unwrap_or("Mask Layer"),
        create_default_linear_gradient(),
    )
}

/// Builds a linear gradient from `(color, position)` pairs, all opaque.
pub fn create_linear_gradient(angle: f64, stops: &[(&str, f64)], repeating: bool) -> MaskImage {
    MaskImage::Linear(LinearGradient {
        angle,
        stops: stops
            .iter()
            .map(|&(color, position)| GradientStop::new(position, color, 1.0))
            .collect(),
        repeating,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MaskComposite, MaskMode, MaskRepeat};

    #[test]
    fn default_layer() {
        let layer = create_default_mask_layer(Some("Layer 3"));
        assert_eq!(layer.name, "Layer 3");
        assert!(layer.visible);
        assert_eq!(layer.mask_repeat, MaskRepeat::NoRepeat);
        assert_eq!(layer.mask_composite, MaskComposite::Add);
        assert_eq!(layer.mask_mode, MaskMode::MatchSource);
        let MaskImage::Linear(g) = &layer.mask_image else {
            panic!("expected linear gradient");
        };
        assert_eq!(g.angle, 180.0);
        assert_eq!(g.stops[0].opacity, 1.0);
        assert_eq!(g.stops[1].opacity, 0.0);
        assert_ne!(g.stops[0].id, g.stops[1].id);

        assert_eq!(create_default_mask_layer(None).name, "Mask Layer");
    }

    #[test]
    fn linear_from_pairs() {
        let image = create_linear_gradient(45.0, &[("#000000", 0.0), ("#ffffff", 50.0)], true);
        assert!(image.is_repeating());
        let stops = image.stops().unwrap();
        assert_eq!(stops[1].position, 50.0);
        assert!(stops.iter().all(|s| s.opacity == 1.0));
    }
}
