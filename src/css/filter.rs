use crate::color::hex_to_rgb;
use crate::model::Filters;

use super::Num;

/// The `filter` value: one function term per non-neutral filter, then the
/// drop shadow when enabled. Empty for neutral filters.
pub fn build_filter_value(filters: &Filters) -> String {
    let mut parts: Vec<String> = filters
        .active()
        .map(|(kind, value)| format!("{}({}{})", kind.css_name(), Num(value), kind.unit()))
        .collect();

    let shadow = &filters.drop_shadow;
    if shadow.enabled {
        let rgb = hex_to_rgb(&shadow.color).unwrap_or_default();
        parts.push(format!(
            "drop-shadow({}px {}px {}px rgba({},{},{},{}))",
            Num(shadow.x),
            Num(shadow.y),
            Num(shadow.blur),
            rgb.r,
            rgb.g,
            rgb.b,
            Num(shadow.color_opacity)
        ));
    }

    parts.join(" ")
}

/// The `filter` declaration, or an empty string for neutral filters.
pub fn generate_filter_css(filters: &Filters) -> String {
    let value = build_filter_value(filters);
    if value.is_empty() {
        return String::new();
    }
    format!("  filter: {value};")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilterKind;

    #[test]
    fn neutral_filters_are_empty() {
        assert_eq!(build_filter_value(&Filters::default()), "");
        assert_eq!(generate_filter_css(&Filters::default()), "");
    }

    #[test]
    fn each_filter_alone_is_one_term() {
        for kind in FilterKind::ALL {
            let mut filters = Filters::default();
            filters.set(kind, kind.neutral() + 7.0);
            let value = build_filter_value(&filters);
            assert_eq!(value.split(' ').count(), 1, "{value}");
            assert!(value.starts_with(kind.css_name()));
        }
    }

    #[test]
    fn terms_keep_fixed_order() {
        let mut filters = Filters::default();
        filters.sepia = 40.0;
        filters.blur = 2.5;
        filters.hue_rotate = 90.0;
        filters.opacity = 80.0;
        assert_eq!(
            build_filter_value(&filters),
            "blur(2.5px) hue-rotate(90deg) opacity(80%) sepia(40%)"
        );
    }

    #[test]
    fn drop_shadow_term() {
        let mut filters = Filters::default();
        filters.drop_shadow.enabled = true;
        filters.drop_shadow.color = "#ff0080".into();
        assert_eq!(
            generate_filter_css(&filters),
            "  filter: drop-shadow(4px 4px 8px rgba(255,0,128,0.5));"
        );
    }
}
