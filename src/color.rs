//! Color and gradient math shared by the editors, the CSS serializer and the
//! rasterizer.
//!
//! Colors travel through the model as `#rrggbb` strings. The helpers here
//! convert them to channel triples and HSL, interpolate along a gradient, and
//! pick a legible contrast color for UI affordances.

use palette::{Hsl, IntoColor, Srgb};

use crate::model::GradientStop;

// ============================================================================
// Rgb
// ============================================================================

/// An 8-bit sRGB channel triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// HSL triple with every component normalized to `0..=1`.
///
/// `h` is expressed in turns (`0.5` is 180 degrees).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HslTriple {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

// ============================================================================
// Hex <-> RGB
// ============================================================================

/// Returns true for strict `#RRGGBB` strings.
///
/// Three-digit shorthand and alpha hex (`#RRGGBBAA`) are rejected.
pub fn is_valid_hex(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parses a strict `#RRGGBB` string.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    if !is_valid_hex(hex) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Rgb::new(channel(1..3)?, channel(3..5)?, channel(5..7)?))
}

/// Parses `#RRGGBB` or the `#RGB` shorthand.
///
/// Only used where foreign colors must be tolerated (stop colors typed by
/// hand); the editors themselves stay on [`hex_to_rgb`].
pub(crate) fn parse_hex_lenient(hex: &str) -> Option<Rgb> {
    if let Some(rgb) = hex_to_rgb(hex) {
        return Some(rgb);
    }
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let mut expanded = String::with_capacity(7);
    expanded.push('#');
    for c in digits.chars() {
        expanded.push(c);
        expanded.push(c);
    }
    hex_to_rgb(&expanded)
}

/// Formats channel values as lowercase `#rrggbb`.
///
/// Each channel is clamped to `0..=255` and rounded independently.
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    let to_byte = |v: f64| {
        if v.is_nan() {
            0
        } else {
            v.round().clamp(0.0, 255.0) as u8
        }
    };
    format!("#{:02x}{:02x}{:02x}", to_byte(r), to_byte(g), to_byte(b))
}

// ============================================================================
// Hex <-> HSL
// ============================================================================

/// Converts a hex color to HSL. Invalid input yields black.
///
/// Achromatic colors (`max == min`) report a hue of `0`.
pub fn hex_to_hsl(hex: &str) -> HslTriple {
    let rgb = hex_to_rgb(hex).unwrap_or_default();
    let lightness = (rgb.r.max(rgb.g).max(rgb.b) as f64 + rgb.r.min(rgb.g).min(rgb.b) as f64)
        / (2.0 * 255.0);

    if rgb.r == rgb.g && rgb.g == rgb.b {
        return HslTriple {
            h: 0.0,
            s: 0.0,
            l: lightness,
        };
    }

    let srgb = Srgb::new(
        rgb.r as f32 / 255.0,
        rgb.g as f32 / 255.0,
        rgb.b as f32 / 255.0,
    );
    let hsl: Hsl = srgb.into_color();
    let h = (hsl.hue.into_positive_degrees() as f64 / 360.0).rem_euclid(1.0);

    HslTriple {
        h,
        s: hsl.saturation as f64,
        l: hsl.lightness as f64,
    }
}

/// Converts HSL (all components in `0..=1`, hue in turns) to `#rrggbb`.
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    if s == 0.0 {
        let v = l * 255.0;
        return rgb_to_hex(v, v, v);
    }
    let hsl: Hsl = Hsl::new((h * 360.0) as f32, s as f32, l as f32);
    let rgb: Srgb = hsl.into_color();
    rgb_to_hex(
        rgb.red as f64 * 255.0,
        rgb.green as f64 * 255.0,
        rgb.blue as f64 * 255.0,
    )
}

// ============================================================================
// Interpolation
// ============================================================================

/// Color and opacity sampled from a gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct StopSample {
    pub color: String,
    pub opacity: f64,
}

/// Gray sentinel returned for an empty stop list. Never emitted to CSS.
pub const EMPTY_GRADIENT_COLOR: &str = "#808080";

/// Samples the color CSS paints at `position` (0-100) along a gradient axis.
///
/// `stops` may be in any order. Positions outside the stop range clamp to
/// the nearest end stop. Non-hex stop colors interpolate as black.
pub fn interpolate_at_position(stops: &[GradientStop], position: f64) -> StopSample {
    let sorted = sorted_stops(stops);

    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return StopSample {
            color: EMPTY_GRADIENT_COLOR.to_string(),
            opacity: 1.0,
        };
    };

    if sorted.len() == 1 || position <= first.position {
        return sample_of(first);
    }
    if position >= last.position {
        return sample_of(last);
    }

    let (left, right) = sorted
        .windows(2)
        .find(|pair| position >= pair[0].position && position <= pair[1].position)
        .map(|pair| (pair[0], pair[1]))
        .unwrap_or((first, last));

    let range = right.position - left.position;
    let t = if range == 0.0 {
        0.0
    } else {
        (position - left.position) / range
    };

    if t == 0.0 {
        return sample_of(left);
    }
    if t == 1.0 {
        return sample_of(right);
    }

    let lc = hex_to_rgb(&left.color).unwrap_or_default();
    let rc = hex_to_rgb(&right.color).unwrap_or_default();
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round();
    let opacity = left.opacity + (right.opacity - left.opacity) * t;

    StopSample {
        color: rgb_to_hex(lerp(lc.r, rc.r), lerp(lc.g, rc.g), lerp(lc.b, rc.b)),
        opacity: (opacity * 100.0).round() / 100.0,
    }
}

/// Returns references to `stops` ordered by ascending position.
///
/// The sort is stable, so stops sharing a position keep their stored order.
pub fn sorted_stops(stops: &[GradientStop]) -> Vec<&GradientStop> {
    let mut sorted: Vec<&GradientStop> = stops.iter().collect();
    sorted.sort_by(|a, b| a.position.total_cmp(&b.position));
    sorted
}

fn sample_of(stop: &GradientStop) -> StopSample {
    StopSample {
        color: stop.color.clone(),
        opacity: stop.opacity,
    }
}

// ============================================================================
// Contrast
// ============================================================================

/// Picks black or white, whichever reads better on top of `hex`.
///
/// Uses the `0.299r + 0.587g + 0.114b` luma weighting. Only meant for UI
/// affordances such as stop handle borders.
pub fn contrasting_color(hex: &str) -> &'static str {
    let Some(rgb) = hex_to_rgb(hex) else {
        return "#ffffff";
    };
    let luminance = (0.299 * rgb.r as f64 + 0.587 * rgb.g as f64 + 0.114 * rgb.b as f64) / 255.0;
    if luminance > 0.5 { "#000000" } else { "#ffffff" }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(position: f64, color: &str, opacity: f64) -> GradientStop {
        GradientStop {
            id: format!("s{position}"),
            color: color.to_string(),
            position,
            opacity,
        }
    }

    #[test]
    fn hex_validation_is_strict() {
        assert!(is_valid_hex("#a1B2c3"));
        assert!(!is_valid_hex("#abc"));
        assert!(!is_valid_hex("#aabbccdd"));
        assert!(!is_valid_hex("aabbcc"));
        assert!(!is_valid_hex("#gg0000"));
    }

    #[test]
    fn rgb_hex_roundtrip_all_channels() {
        for v in 0..=255u8 {
            let hex = rgb_to_hex(v as f64, (255 - v) as f64, (v / 2) as f64);
            assert_eq!(hex_to_rgb(&hex), Some(Rgb::new(v, 255 - v, v / 2)));
        }
    }

    #[test]
    fn rgb_to_hex_clamps_and_rounds() {
        assert_eq!(rgb_to_hex(-20.0, 300.0, 127.6), "#00ff80");
    }

    #[test]
    fn lenient_parse_expands_shorthand() {
        assert_eq!(parse_hex_lenient("#f0a"), Some(Rgb::new(255, 0, 170)));
        assert_eq!(parse_hex_lenient("#ff00aa"), Some(Rgb::new(255, 0, 170)));
        assert_eq!(parse_hex_lenient("red"), None);
    }

    #[test]
    fn hsl_of_primary_and_gray() {
        let red = hex_to_hsl("#ff0000");
        assert!(red.h.abs() < 1e-6);
        assert!((red.s - 1.0).abs() < 1e-6);
        assert!((red.l - 0.5).abs() < 1e-6);

        let gray = hex_to_hsl("#808080");
        assert_eq!(gray.h, 0.0);
        assert_eq!(gray.s, 0.0);
        assert!((gray.l - 128.0 / 255.0).abs() < 1e-9);

        let blue = hex_to_hsl("#0000ff");
        assert!((blue.h - 2.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn hsl_roundtrip_within_tolerance() {
        for hi in 0..12 {
            for si in 1..=4 {
                for li in 1..=4 {
                    let (h, s, l) = (hi as f64 / 12.0, si as f64 / 4.0, li as f64 / 5.0);
                    let back = hex_to_hsl(&hsl_to_hex(h, s, l));
                    assert!((back.l - l).abs() < 0.01, "l {l} -> {}", back.l);
                    if back.s > 0.05 && l < 0.95 {
                        let dh = (back.h - h).abs();
                        assert!(dh.min(1.0 - dh) < 0.01, "h {h} -> {}", back.h);
                    }
                }
            }
        }
    }

    #[test]
    fn hsl_to_hex_achromatic() {
        assert_eq!(hsl_to_hex(0.3, 0.0, 1.0), "#ffffff");
        assert_eq!(hsl_to_hex(0.0, 0.0, 0.0), "#000000");
    }

    #[test]
    fn interpolate_degenerate_lists() {
        let empty = interpolate_at_position(&[], 40.0);
        assert_eq!(empty.color, "#808080");
        assert_eq!(empty.opacity, 1.0);

        let single = interpolate_at_position(&[stop(30.0, "#123456", 0.4)], 90.0);
        assert_eq!(single.color, "#123456");
        assert_eq!(single.opacity, 0.4);
    }

    #[test]
    fn interpolate_clamps_to_end_stops() {
        let stops = vec![stop(80.0, "#ffffff", 0.2), stop(20.0, "#000000", 1.0)];
        assert_eq!(interpolate_at_position(&stops, 0.0).color, "#000000");
        assert_eq!(interpolate_at_position(&stops, 100.0).color, "#ffffff");
        assert_eq!(interpolate_at_position(&stops, 100.0).opacity, 0.2);
    }

    #[test]
    fn interpolate_midpoint() {
        let stops = vec![stop(100.0, "#ffffff", 0.0), stop(0.0, "#000000", 1.0)];
        let mid = interpolate_at_position(&stops, 50.0);
        assert_eq!(mid.color, "#808080");
        assert_eq!(mid.opacity, 0.5);
    }

    #[test]
    fn interpolate_at_exact_stop_returns_stop() {
        let stops = vec![
            stop(0.0, "#000000", 1.0),
            stop(40.0, "#FF8800", 0.333),
            stop(100.0, "#ffffff", 0.0),
        ];
        for s in &stops {
            let sample = interpolate_at_position(&stops, s.position);
            assert_eq!(sample.color, s.color);
            assert_eq!(sample.opacity, s.opacity);
        }
    }

    #[test]
    fn contrast_picks_black_on_light() {
        assert_eq!(contrasting_color("#ffffff"), "#000000");
        assert_eq!(contrasting_color("#ffff00"), "#000000");
        assert_eq!(contrasting_color("#000080"), "#ffffff");
        assert_eq!(contrasting_color("nonsense"), "#ffffff");
    }
}
