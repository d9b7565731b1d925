use crate::color::{parse_hex_lenient, sorted_stops};
use crate::model::{ConicGradient, GradientStop, LinearGradient, MaskImage, RadialGradient};

use super::Num;

/// Serializes a mask image to a CSS `<image>` value.
pub fn serialize_mask_image(image: &MaskImage) -> String {
    match image {
        MaskImage::Linear(g) => serialize_linear(g),
        MaskImage::Radial(g) => serialize_radial(g),
        MaskImage::Conic(g) => serialize_conic(g),
        MaskImage::Url(u) => format!("url({})", u.url),
    }
}

fn serialize_linear(g: &LinearGradient) -> String {
    format!(
        "{}({}deg, {})",
        function_name("linear-gradient", g.repeating),
        Num(g.angle),
        serialize_stops(&g.stops)
    )
}

fn serialize_radial(g: &RadialGradient) -> String {
    format!(
        "{}({} {} at {}% {}%, {})",
        function_name("radial-gradient", g.repeating),
        g.shape.as_css(),
        g.size_keyword.as_css(),
        Num(g.center_x),
        Num(g.center_y),
        serialize_stops(&g.stops)
    )
}

fn serialize_conic(g: &ConicGradient) -> String {
    format!(
        "{}(from {}deg at {}% {}%, {})",
        function_name("conic-gradient", g.repeating),
        Num(g.from_angle),
        Num(g.center_x),
        Num(g.center_y),
        serialize_stops(&g.stops)
    )
}

fn function_name(base: &str, repeating: bool) -> String {
    if repeating {
        format!("repeating-{base}")
    } else {
        base.to_string()
    }
}

fn serialize_stops(stops: &[GradientStop]) -> String {
    sorted_stops(stops)
        .into_iter()
        .map(|s| {
            format!(
                "{} {}%",
                serialize_stop_color(&s.color, s.opacity),
                Num(s.position)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Folds a stop's opacity into its color.
///
/// Opaque stops keep their color verbatim. Hex colors become `rgba()`,
/// `rgba()` gets its alpha replaced and `rgb()` gains one. Anything else
/// (named colors, `hsl()`) passes through unchanged.
pub fn serialize_stop_color(color: &str, opacity: f64) -> String {
    if opacity >= 1.0 {
        return color.to_string();
    }
    let alpha = Num(opacity);

    if color.starts_with('#') {
        return match parse_hex_lenient(color) {
            Some(rgb) => format!("rgba({}, {}, {}, {alpha})", rgb.r, rgb.g, rgb.b),
            None => color.to_string(),
        };
    }
    if color.starts_with("rgba(") {
        return replace_rgba_alpha(color, &alpha.to_string()).unwrap_or_else(|| color.to_string());
    }
    if let Some(rest) = color.strip_prefix("rgb(") {
        return match rest.find(')') {
            Some(close) => format!("rgba({}, {alpha}){}", &rest[..close], &rest[close + 1..]),
            None => color.to_string(),
        };
    }
    color.to_string()
}

/// Replaces the trailing `, <alpha>)` of an `rgba()` string.
fn replace_rgba_alpha(color: &str, alpha: &str) -> Option<String> {
    let body = color.strip_suffix(')')?;
    let comma = body.rfind(',')?;
    let old = body[comma + 1..].trim_start();
    if old.is_empty() || !old.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    Some(format!("{}, {alpha})", &body[..comma]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RadialShape, RadialSize, UrlMask};

    fn stop(position: f64, color: &str, opacity: f64) -> GradientStop {
        GradientStop {
            id: format!("{position}"),
            color: color.into(),
            position,
            opacity,
        }
    }

    #[test]
    fn linear_sorts_stops_and_applies_opacity() {
        let image = MaskImage::Linear(LinearGradient {
            angle: 180.0,
            stops: vec![stop(100.0, "#000000", 0.0), stop(0.0, "#000000", 1.0)],
            repeating: false,
        });
        assert_eq!(
            serialize_mask_image(&image),
            "linear-gradient(180deg, #000000 0%, rgba(0, 0, 0, 0) 100%)"
        );
    }

    #[test]
    fn radial_and_conic_headers() {
        let radial = MaskImage::Radial(RadialGradient {
            shape: RadialShape::Ellipse,
            size_keyword: RadialSize::ClosestSide,
            center_x: 30.0,
            center_y: 70.5,
            stops: vec![stop(0.0, "#ffffff", 1.0), stop(60.0, "#ffffff", 0.25)],
            repeating: true,
        });
        assert_eq!(
            serialize_mask_image(&radial),
            "repeating-radial-gradient(ellipse closest-side at 30% 70.5%, #ffffff 0%, rgba(255, 255, 255, 0.25) 60%)"
        );

        let conic = MaskImage::Conic(ConicGradient {
            from_angle: 45.0,
            center_x: 50.0,
            center_y: 50.0,
            stops: vec![stop(0.0, "#000000", 1.0), stop(100.0, "#ffffff", 1.0)],
            repeating: false,
        });
        assert_eq!(
            serialize_mask_image(&conic),
            "conic-gradient(from 45deg at 50% 50%, #000000 0%, #ffffff 100%)"
        );
    }

    #[test]
    fn url_and_degenerate_stops() {
        let url = MaskImage::Url(UrlMask {
            url: "mask.svg".into(),
        });
        assert_eq!(serialize_mask_image(&url), "url(mask.svg)");

        let empty = MaskImage::Linear(LinearGradient {
            angle: 90.0,
            stops: vec![],
            repeating: false,
        });
        assert_eq!(serialize_mask_image(&empty), "linear-gradient(90deg, )");
    }

    #[test]
    fn stop_color_forms() {
        assert_eq!(serialize_stop_color("#ff8000", 1.0), "#ff8000");
        assert_eq!(serialize_stop_color("#ff8000", 0.5), "rgba(255, 128, 0, 0.5)");
        assert_eq!(serialize_stop_color("#f80", 0.5), "rgba(255, 136, 0, 0.5)");
        assert_eq!(
            serialize_stop_color("rgba(1, 2, 3, 0.9)", 0.3),
            "rgba(1, 2, 3, 0.3)"
        );
        assert_eq!(serialize_stop_color("rgb(1, 2, 3)", 0.3), "rgba(1, 2, 3, 0.3)");
        assert_eq!(serialize_stop_color("red", 0.3), "red");
    }
}
