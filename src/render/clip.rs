//! Clip-path rasterization.
//!
//! Percentages resolve against the image box exactly as `clip-path` basic
//! shapes do: horizontal lengths against the width, vertical against the
//! height, and circle radii against `sqrt((w² + h²) / 2)`.

use log::{debug, warn};
use resvg::tiny_skia::{FillRule, Mask, Path, PathBuilder, Rect, Transform};

use super::pixels::{pixmap_to_rgba_image, rgba_image_to_pixmap};
use super::{RenderContext, RenderEffect};
use crate::error::RenderError;
use crate::model::{ClipPath, ClipPoint};

// Cubic approximation of a quarter ellipse.
const KAPPA: f32 = 0.552_284_8;

impl RenderEffect for ClipPath {
    fn is_identity(&self) -> bool {
        matches!(self, ClipPath::None)
    }

    fn apply(&self, ctx: &mut RenderContext) -> Result<(), RenderError> {
        if let ClipPath::Custom { value } = self {
            if !value.trim().is_empty() {
                warn!("custom clip-path `{value}` cannot be rasterized; exporting unclipped");
            }
            return Ok(());
        }
        if matches!(self, ClipPath::Polygon { points, .. } if points.is_empty()) {
            debug!("empty polygon is not a valid clip-path; exporting unclipped");
            return Ok(());
        }

        let (width, height) = (ctx.width(), ctx.height());
        let Some(path) = clip_shape_path(self, width as f32, height as f32) else {
            // A shape without area clips everything away.
            debug!("clip-path {:?} has no area", self.kind());
            ctx.image = image::RgbaImage::new(width, height);
            return Ok(());
        };

        let mut mask = Mask::new(width, height).ok_or(RenderError::Canvas { width, height })?;
        mask.fill_path(&path, FillRule::Winding, true, Transform::identity());

        let mut pixmap = rgba_image_to_pixmap(&ctx.image)?;
        pixmap.apply_mask(&mask);
        ctx.image = pixmap_to_rgba_image(&pixmap);
        Ok(())
    }
}

/// Builds the clip outline for a `width` x `height` box.
///
/// Returns `None` for shapes that enclose no area, and for [`ClipPath::None`]
/// and [`ClipPath::Custom`] which have no geometry of their own.
pub fn clip_shape_path(clip: &ClipPath, width: f32, height: f32) -> Option<Path> {
    let pct = |v: f64, of: f32| v as f32 / 100.0 * of;
    match clip {
        ClipPath::None | ClipPath::Custom { .. } => None,
        ClipPath::Circle {
            radius,
            center_x,
            center_y,
        } => {
            let reference = ((width * width + height * height) / 2.0).sqrt();
            let r = pct(*radius, reference);
            if r <= 0.0 {
                return None;
            }
            PathBuilder::from_circle(pct(*center_x, width), pct(*center_y, height), r)
        }
        ClipPath::Ellipse {
            radius_x,
            radius_y,
            center_x,
            center_y,
        } => {
            let (rx, ry) = (pct(*radius_x, width), pct(*radius_y, height));
            let (cx, cy) = (pct(*center_x, width), pct(*center_y, height));
            let rect = Rect::from_xywh(cx - rx, cy - ry, rx * 2.0, ry * 2.0)?;
            PathBuilder::from_oval(rect)
        }
        ClipPath::Inset {
            top,
            right,
            bottom,
            left,
            border_radius,
        } => {
            let x0 = pct(*left, width);
            let y0 = pct(*top, height);
            let x1 = width - pct(*right, width);
            let y1 = height - pct(*bottom, height);
            let rect = Rect::from_ltrb(x0, y0, x1, y1)?;
            let rx = pct(*border_radius, width).min(rect.width() / 2.0);
            let ry = pct(*border_radius, height).min(rect.height() / 2.0);
            if rx <= 0.0 || ry <= 0.0 {
                return Some(PathBuilder::from_rect(rect));
            }
            rounded_rect_path(rect, rx, ry)
        }
        ClipPath::Polygon { points, .. } => polygon_path(points, width, height),
    }
}

fn polygon_path(points: &[ClipPoint], width: f32, height: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    let mut iter = points
        .iter()
        .map(|p| (p.x as f32 / 100.0 * width, p.y as f32 / 100.0 * height));
    let (x, y) = iter.next()?;
    pb.move_to(x, y);
    for (x, y) in iter {
        pb.line_to(x, y);
    }
    pb.close();
    pb.finish()
}

/// Rectangle with equal elliptical corners.
fn rounded_rect_path(rect: Rect, rx: f32, ry: f32) -> Option<Path> {
    let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let (kx, ky) = (rx * KAPPA, ry * KAPPA);

    let mut pb = PathBuilder::new();
    pb.move_to(l + rx, t);
    pb.line_to(r - rx, t);
    pb.cubic_to(r - rx + kx, t, r, t + ry - ky, r, t + ry);
    pb.line_to(r, b - ry);
    pb.cubic_to(r, b - ry + ky, r - rx + kx, b, r - rx, b);
    pb.line_to(l + rx, b);
    pb.cubic_to(l + rx - kx, b, l, b - ry + ky, l, b - ry);
    pb.line_to(l, t + ry);
    pb.cubic_to(l, t + ry - ky, l + rx - kx, t, l + rx, t);
    pb.close();
    pb.finish()
}
