use crate::model::{MaskClip, MaskComposite, MaskLayer, MaskMode, MaskOrigin, MaskRepeat};

use super::gradient::serialize_mask_image;

/// Per-property value lists across the visible layers.
///
/// Each entry is `(property, webkit value, standard value)`; only composite
/// differs between the two forms. Properties where every layer sits at the
/// CSS default are left out.
fn property_lists(visible: &[&MaskLayer]) -> Vec<(&'static str, String, String)> {
    let mut lists = Vec::new();

    let mut push = |name: &'static str, values: Vec<String>, default: &str| {
        if values.iter().any(|v| v != default) {
            let joined = values.join(", ");
            lists.push((name, joined.clone(), joined));
        }
    };

    push(
        "mask-position",
        visible
            .iter()
            .map(|l| format!("{} {}", l.mask_position.x, l.mask_position.y))
            .collect(),
        "center center",
    );
    push(
        "mask-size",
        visible
            .iter()
            .map(|l| format!("{} {}", l.mask_size.width, l.mask_size.height))
            .collect(),
        "100% 100%",
    );
    push(
        "mask-repeat",
        keywords(visible, |l| l.mask_repeat.as_css()),
        MaskRepeat::NoRepeat.as_css(),
    );
    push(
        "mask-origin",
        keywords(visible, |l| l.mask_origin.as_css()),
        MaskOrigin::BorderBox.as_css(),
    );
    push(
        "mask-clip",
        keywords(visible, |l| l.mask_clip.as_css()),
        MaskClip::BorderBox.as_css(),
    );

    if visible
        .iter()
        .any(|l| l.mask_composite != MaskComposite::Add)
    {
        lists.push((
            "mask-composite",
            keywords(visible, |l| l.mask_composite.as_webkit()).join(", "),
            keywords(visible, |l| l.mask_composite.as_css()).join(", "),
        ));
    }

    let modes = keywords(visible, |l| l.mask_mode.as_css());
    if visible.iter().any(|l| l.mask_mode != MaskMode::MatchSource) {
        let joined = modes.join(", ");
        lists.push(("mask-mode", joined.clone(), joined));
    }

    lists
}

fn keywords(visible: &[&MaskLayer], f: impl Fn(&MaskLayer) -> &'static str) -> Vec<String> {
    visible.iter().map(|l| f(l).to_string()).collect()
}

/// Mask declarations for the visible layers, each property emitted in its
/// `-webkit-` and standard form. Empty when no layer is visible.
pub fn generate_mask_css(layers: &[MaskLayer]) -> String {
    let visible: Vec<&MaskLayer> = layers.iter().filter(|l| l.visible).collect();
    if visible.is_empty() {
        return String::new();
    }

    let images = visible
        .iter()
        .map(|l| serialize_mask_image(&l.mask_image))
        .collect::<Vec<_>>()
        .join(",\n    ");

    let mut lines = vec![
        format!("  -webkit-mask-image: {images};"),
        format!("  mask-image: {images};"),
    ];
    for (name, webkit, standard) in property_lists(&visible) {
        lines.push(format!("  -webkit-{name}: {webkit};"));
        lines.push(format!("  {name}: {standard};"));
    }
    lines.join("\n")
}

/// Inline style properties for the live preview, keyed by `-webkit-` name.
///
/// Images are joined with a plain `", "` since the result is applied as a
/// style attribute rather than shown to the user.
pub fn build_mask_styles(layers: &[MaskLayer]) -> Vec<(String, String)> {
    let visible: Vec<&MaskLayer> = layers.iter().filter(|l| l.visible).collect();
    if visible.is_empty() {
        return Vec::new();
    }

    let images = visible
        .iter()
        .map(|l| serialize_mask_image(&l.mask_image))
        .collect::<Vec<_>>()
        .join(", ");

    let mut styles = vec![("-webkit-mask-image".to_string(), images)];
    styles.extend(
        property_lists(&visible)
            .into_iter()
            .map(|(name, webkit, _)| (format!("-webkit-{name}"), webkit)),
    );
    styles
}
