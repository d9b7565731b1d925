//! CSS serialization.
//!
//! Pure functions from the data model to CSS text. They are total over every
//! reachable state and allocate fresh strings on each call, so callers can
//! recompute on every render.

mod clip;
mod filter;
mod full;
mod gradient;
mod mask;

pub use clip::{build_clip_path_value, generate_clip_path_css};
pub use filter::{build_filter_value, generate_filter_css};
pub use full::{
    SELECTOR, generate_clip_only_css, generate_css_for_tab, generate_filter_only_css,
    generate_full_css, generate_mask_only_css,
};
pub use gradient::{serialize_mask_image, serialize_stop_color};
pub use mask::{build_mask_styles, generate_mask_css};

use std::fmt;

/// Formats a number the way a JavaScript template literal would for the
/// values the editor produces: integers without a fractional part, no
/// trailing zeros, and `-0` printed as `0`.
pub(crate) struct Num(pub f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
