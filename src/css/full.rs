use crate::model::{BlendMode, CssOutputTab, DocumentState};

use super::{generate_clip_path_css, generate_filter_css, generate_mask_css};

/// Selector of the generated rule block.
pub const SELECTOR: &str = ".masked-image";

/// The complete rule: mask, filter, clip-path and blend mode declarations in
/// that order, each omitted when empty.
///
/// ```
/// use maskit::{StudioState, css};
///
/// let state = StudioState::new();
/// assert_eq!(css::generate_full_css(&state.document), ".masked-image {\n}");
/// ```
pub fn generate_full_css(doc: &DocumentState) -> String {
    let mut lines = vec![format!("{SELECTOR} {{")];

    for section in [
        generate_mask_css(&doc.mask_layers),
        generate_filter_css(&doc.filters),
        generate_clip_path_css(&doc.clip_path),
    ] {
        if !section.is_empty() {
            lines.push(section);
        }
    }
    if doc.blend_mode != BlendMode::Normal {
        lines.push(format!("  mix-blend-mode: {};", doc.blend_mode.as_css()));
    }

    lines.push("}".into());
    lines.join("\n")
}

pub fn generate_mask_only_css(doc: &DocumentState) -> String {
    wrap_or(generate_mask_css(&doc.mask_layers), "/* No mask layers */")
}

pub fn generate_filter_only_css(doc: &DocumentState) -> String {
    wrap_or(generate_filter_css(&doc.filters), "/* No filters applied */")
}

pub fn generate_clip_only_css(doc: &DocumentState) -> String {
    wrap_or(
        generate_clip_path_css(&doc.clip_path),
        "/* No clip-path applied */",
    )
}

/// The stylesheet shown on a CSS output tab.
pub fn generate_css_for_tab(doc: &DocumentState, tab: CssOutputTab) -> String {
    match tab {
        CssOutputTab::Full => generate_full_css(doc),
        CssOutputTab::Mask => generate_mask_only_css(doc),
        CssOutputTab::Filter => generate_filter_only_css(doc),
        CssOutputTab::Clip => generate_clip_only_css(doc),
    }
}

fn wrap_or(body: String, placeholder: &str) -> String {
    if body.is_empty() {
        placeholder.to_string()
    } else {
        format!("{SELECTOR} {{\n{body}\n}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClipPath, GradientStop, LinearGradient, MaskImage, MaskLayer};

    #[test]
    fn default_state_is_empty_rule() {
        let doc = DocumentState::default();
        assert_eq!(generate_full_css(&doc), ".masked-image {\n}");
        assert_eq!(generate_mask_only_css(&doc), "/* No mask layers */");
        assert_eq!(generate_filter_only_css(&doc), "/* No filters applied */");
        assert_eq!(generate_clip_only_css(&doc), "/* No clip-path applied */");
    }

    #[test]
    fn blur_only() {
        let mut doc = DocumentState::default();
        doc.filters.blur = 10.0;
        assert_eq!(
            generate_full_css(&doc),
            ".masked-image {\n  filter: blur(10px);\n}"
        );
        assert_eq!(
            generate_css_for_tab(&doc, CssOutputTab::Filter),
            ".masked-image {\n  filter: blur(10px);\n}"
        );
    }

    #[test]
    fn sections_in_fixed_order_and_idempotent() {
        let mut doc = DocumentState::default();
        doc.blend_mode = BlendMode::Multiply;
        doc.clip_path = ClipPath::Circle {
            radius: 40.0,
            center_x: 50.0,
            center_y: 50.0,
        };
        doc.filters.grayscale = 100.0;
        doc.mask_layers.push(MaskLayer::new(
            "Layer 1",
            MaskImage::Linear(LinearGradient {
                angle: 90.0,
                stops: vec![
                    GradientStop::new(0.0, "#000000", 1.0),
                    GradientStop::new(100.0, "#000000", 0.0),
                ],
                repeating: false,
            }),
        ));

        let css = generate_full_css(&doc);
        let mask = css.find("  mask-image").unwrap();
        let filter = css.find("  filter:").unwrap();
        let clip = css.find("  clip-path:").unwrap();
        let blend = css.find("  mix-blend-mode: multiply;").unwrap();
        assert!(mask < filter && filter < clip && clip < blend);
        assert!(css.ends_with("\n}"));
        assert_eq!(css, generate_full_css(&doc));
    }
}
