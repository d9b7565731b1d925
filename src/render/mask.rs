//! Mask stack rasterization.
//!
//! Every visible layer is rendered to a full-canvas coverage pixmap: one
//! tile of its mask image is painted at the resolved `mask-size`, converted
//! to coverage according to `mask-mode`, then placed at `mask-position` and
//! tiled per `mask-repeat`. Layers combine in list order. The first one seeds
//! the accumulator and each later one is drawn over it with the Porter-Duff
//! operator of its `mask-composite`. The result keeps the image where the
//! accumulated coverage is opaque (destination-in).

use image::imageops::{self, FilterType};
use log::{debug, warn};
use resvg::tiny_skia::{
    BlendMode, Color, ColorU8, FilterQuality, GradientStop as SkStop, LinearGradient,
    Paint, Pattern, Pixmap, PixmapPaint, Point, RadialGradient, Rect, Shader, SpreadMode,
    Transform,
};

use super::pixels::{new_pixmap, pixmap_to_rgba_image, rgba_image_to_pixmap};
use super::{ImageLoader, RenderContext, RenderEffect};
use crate::color::{parse_hex_lenient, sorted_stops};
use crate::error::RenderError;
use crate::model::{
    ConicGradient, GradientStop, LinearGradient as LinearSpec, MaskComposite, MaskImage,
    MaskLayer, MaskMode, MaskPosition, MaskRepeat, MaskSize, RadialGradient as RadialSpec,
    RadialShape, RadialSize,
};

/// The visible mask layers of a document, as one pipeline stage.
pub struct MaskStack<'a> {
    layers: Vec<&'a MaskLayer>,
}

impl<'a> MaskStack<'a> {
    pub fn new(layers: &'a [MaskLayer]) -> Self {
        Self {
            layers: layers.iter().filter(|l| l.visible).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl RenderEffect for MaskStack<'_> {
    fn is_identity(&self) -> bool {
        self.layers.is_empty()
    }

    fn apply(&self, ctx: &mut RenderContext) -> Result<(), RenderError> {
        let (width, height) = (ctx.width(), ctx.height());
        let mut combined: Option<Pixmap> = None;

        for layer in &self.layers {
            let coverage = render_layer_alpha(layer, width, height, ctx.scale, ctx.loader)?;
            match combined.as_mut() {
                None => combined = Some(coverage),
                Some(acc) => {
                    let paint = PixmapPaint {
                        blend_mode: composite_blend_mode(layer.mask_composite),
                        ..PixmapPaint::default()
                    };
                    acc.draw_pixmap(0, 0, coverage.as_ref(), &paint, Transform::identity(), None);
                }
            }
        }

        let Some(mask) = combined else {
            return Ok(());
        };
        let mut pixmap = rgba_image_to_pixmap(&ctx.image)?;
        let paint = PixmapPaint {
            blend_mode: BlendMode::DestinationIn,
            ..PixmapPaint::default()
        };
        pixmap.draw_pixmap(0, 0, mask.as_ref(), &paint, Transform::identity(), None);
        ctx.image = pixmap_to_rgba_image(&pixmap);
        Ok(())
    }
}

fn composite_blend_mode(composite: MaskComposite) -> BlendMode {
    match composite {
        MaskComposite::Add => BlendMode::SourceOver,
        MaskComposite::Subtract => BlendMode::SourceOut,
        MaskComposite::Intersect => BlendMode::SourceIn,
        MaskComposite::Exclude => BlendMode::Xor,
    }
}

// ============================================================================
// Layer coverage
// ============================================================================

/// Renders one layer's coverage over a `width` x `height` canvas.
///
/// The returned pixmap is white with alpha equal to the mask coverage.
/// A `url()` mask that fails to load, and a gradient without stops, cover
/// the whole canvas so the layer has no effect.
pub fn render_layer_alpha(
    layer: &MaskLayer,
    width: u32,
    height: u32,
    scale: f32,
    loader: &dyn ImageLoader,
) -> Result<Pixmap, RenderError> {
    let mut canvas = new_pixmap(width, height)?;
    let (tile_w, tile_h) = resolve_size(&layer.mask_size, width as f32, height as f32, scale);
    if tile_w <= 0.0 || tile_h <= 0.0 {
        debug!("mask layer {} has an empty tile", layer.name);
        return Ok(canvas);
    }
    let tile_w = tile_w.round().max(1.0) as u32;
    let tile_h = tile_h.round().max(1.0) as u32;

    let Some(mut tile) = render_tile(&layer.mask_image, tile_w, tile_h, loader)? else {
        canvas.fill(Color::WHITE);
        return Ok(canvas);
    };
    to_coverage(&mut tile, layer.mask_mode);

    let (x, y) = resolve_position(
        &layer.mask_position,
        (width as f32, height as f32),
        (tile_w as f32, tile_h as f32),
        scale,
    );
    let (spread, rect) = match layer.mask_repeat {
        MaskRepeat::NoRepeat => (
            SpreadMode::Pad,
            Rect::from_xywh(x, y, tile_w as f32, tile_h as f32),
        ),
        MaskRepeat::RepeatX => (
            SpreadMode::Repeat,
            Rect::from_xywh(0.0, y, width as f32, tile_h as f32),
        ),
        MaskRepeat::RepeatY => (
            SpreadMode::Repeat,
            Rect::from_xywh(x, 0.0, tile_w as f32, height as f32),
        ),
        // space and round are approximated by plain repetition
        MaskRepeat::Repeat | MaskRepeat::Space | MaskRepeat::Round => (
            SpreadMode::Repeat,
            Rect::from_xywh(0.0, 0.0, width as f32, height as f32),
        ),
    };
    let Some(rect) = rect else {
        return Ok(canvas);
    };

    let mut paint = Paint::default();
    paint.anti_alias = false;
    paint.shader = Pattern::new(
        tile.as_ref(),
        spread,
        FilterQuality::Nearest,
        1.0,
        Transform::from_translate(x, y),
    );
    canvas.fill_rect(rect, &paint, Transform::identity(), None);
    Ok(canvas)
}

/// Replaces every pixel with white at the coverage `mode` derives from it.
fn to_coverage(tile: &mut Pixmap, mode: MaskMode) {
    for px in tile.pixels_mut() {
        let c = px.demultiply();
        let alpha = match mode {
            MaskMode::Alpha | MaskMode::MatchSource => c.alpha(),
            MaskMode::Luminance => {
                let luma = 0.2126 * c.red() as f32
                    + 0.7152 * c.green() as f32
                    + 0.0722 * c.blue() as f32;
                (luma * c.alpha() as f32 / 255.0).round() as u8
            }
        };
        *px = ColorU8::from_rgba(255, 255, 255, alpha).premultiply();
    }
}

// ============================================================================
// Size and position
// ============================================================================

/// Leading numeric value of a CSS length, ignoring the unit.
fn number_of(value: &str) -> Option<f32> {
    let value = value.trim();
    let digits = value
        .strip_suffix('%')
        .or_else(|| value.strip_suffix("px"))
        .unwrap_or(value);
    digits.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

fn resolve_size(size: &MaskSize, width: f32, height: f32, scale: f32) -> (f32, f32) {
    let axis = |value: &str, container: f32| {
        let value = value.trim();
        if value.ends_with('%') {
            return number_of(value).map_or(container, |v| v / 100.0 * container);
        }
        match value {
            "auto" | "cover" | "contain" => container,
            _ => number_of(value).map_or(container, |v| v * scale),
        }
    };
    (axis(&size.width, width), axis(&size.height, height))
}

fn resolve_position(
    position: &MaskPosition,
    (width, height): (f32, f32),
    (tile_w, tile_h): (f32, f32),
    scale: f32,
) -> (f32, f32) {
    let axis = |value: &str, container: f32, tile: f32| {
        let value = value.trim();
        match value {
            "center" => (container - tile) / 2.0,
            "left" | "top" => 0.0,
            "right" | "bottom" => container - tile,
            _ if value.ends_with('%') => {
                number_of(value).map_or(0.0, |v| v / 100.0 * (container - tile))
            }
            _ => number_of(value).map_or(0.0, |v| v * scale),
        }
    };
    (
        axis(&position.x, width, tile_w),
        axis(&position.y, height, tile_h),
    )
}

// ============================================================================
// Tiles
// ============================================================================

/// Paints one mask tile with its real colors. `None` means the layer should
/// fall back to full coverage.
fn render_tile(
    image: &MaskImage,
    width: u32,
    height: u32,
    loader: &dyn ImageLoader,
) -> Result<Option<Pixmap>, RenderError> {
    if let MaskImage::Url(url) = image {
        return match loader.load(&url.url, Some((width, height))) {
            Ok(img) => {
                let img = if img.dimensions() == (width, height) {
                    img
                } else {
                    imageops::resize(&img, width, height, FilterType::CatmullRom)
                };
                rgba_image_to_pixmap(&img).map(Some)
            }
            Err(err) => {
                warn!("mask image {} failed to load, treating as opaque: {err}", url.url);
                Ok(None)
            }
        };
    }

    let ramp = Ramp::new(image.stops().unwrap_or_default());
    if ramp.is_empty() {
        debug!("gradient without stops, treating as opaque");
        return Ok(None);
    }

    let mut tile = new_pixmap(width, height)?;
    if let Some(color) = ramp.solid() {
        tile.fill(color);
        return Ok(Some(tile));
    }

    let (w, h) = (width as f32, height as f32);
    match image {
        MaskImage::Linear(spec) => paint_linear(&mut tile, spec, &ramp),
        MaskImage::Radial(spec) => paint_radial(&mut tile, spec, &ramp),
        MaskImage::Conic(spec) => paint_conic(&mut tile, spec, &ramp, w, h),
        MaskImage::Url(_) => {}
    }
    Ok(Some(tile))
}

fn fill_shader(tile: &mut Pixmap, shader: Option<Shader>, fallback: Color) {
    let Some(shader) = shader else {
        tile.fill(fallback);
        return;
    };
    let Some(rect) = Rect::from_xywh(0.0, 0.0, tile.width() as f32, tile.height() as f32) else {
        return;
    };
    let mut paint = Paint::default();
    paint.anti_alias = false;
    paint.shader = shader;
    tile.fill_rect(rect, &paint, Transform::identity(), None);
}

/// Evaluates `sample` at every pixel center.
fn fill_per_pixel(tile: &mut Pixmap, sample: impl Fn(f32, f32) -> [f32; 4]) {
    let width = tile.width();
    for (i, px) in tile.pixels_mut().iter_mut().enumerate() {
        let x = (i as u32 % width) as f32 + 0.5;
        let y = (i as u32 / width) as f32 + 0.5;
        let [r, g, b, a] = sample(x, y);
        *px = ColorU8::from_rgba(r as u8, g as u8, b as u8, (a * 255.0).round() as u8)
            .premultiply();
    }
}

fn paint_linear(tile: &mut Pixmap, spec: &LinearSpec, ramp: &Ramp) {
    let (w, h) = (tile.width() as f32, tile.height() as f32);
    // CSS 0deg points up; the canvas reference direction points right.
    let theta = ((spec.angle as f32) - 90.0).to_radians();
    let (sin, cos) = theta.sin_cos();
    let length = cos.abs() * w + sin.abs() * h;
    let (dx, dy) = (cos * length / 2.0, sin * length / 2.0);
    let start = Point::from_xy(w / 2.0 - dx, h / 2.0 - dy);
    let end = Point::from_xy(w / 2.0 + dx, h / 2.0 + dy);

    let (start, end, stops, spread) = match ramp.period().filter(|_| spec.repeating) {
        Some((first, last)) => {
            let at = |t: f32| {
                Point::from_xy(start.x + (end.x - start.x) * t, start.y + (end.y - start.y) * t)
            };
            (
                at(first / 100.0),
                at(last / 100.0),
                ramp.sk_stops(Some((first, last))),
                SpreadMode::Repeat,
            )
        }
        None => (start, end, ramp.sk_stops(None), SpreadMode::Pad),
    };
    let shader = LinearGradient::new(start, end, stops, spread, Transform::identity());
    fill_shader(tile, shader, ramp.last_color());
}

/// Resolves the ending shape radii for a radial gradient in a `w` x `h` box.
fn radial_radii(spec: &RadialSpec, w: f32, h: f32) -> (f32, f32, f32, f32) {
    let cx = spec.center_x as f32 / 100.0 * w;
    let cy = spec.center_y as f32 / 100.0 * h;
    let (near_x, far_x) = (cx.abs().min((w - cx).abs()), cx.abs().max((w - cx).abs()));
    let (near_y, far_y) = (cy.abs().min((h - cy).abs()), cy.abs().max((h - cy).abs()));

    let (rx, ry) = match (spec.shape, spec.size_keyword) {
        (RadialShape::Circle, RadialSize::ClosestSide) => {
            let r = near_x.min(near_y);
            (r, r)
        }
        (RadialShape::Circle, RadialSize::FarthestSide) => {
            let r = far_x.max(far_y);
            (r, r)
        }
        (RadialShape::Circle, RadialSize::ClosestCorner) => {
            let r = near_x.hypot(near_y);
            (r, r)
        }
        (RadialShape::Circle, RadialSize::FarthestCorner) => {
            let r = far_x.hypot(far_y);
            (r, r)
        }
        (RadialShape::Ellipse, RadialSize::ClosestSide) => (near_x, near_y),
        (RadialShape::Ellipse, RadialSize::FarthestSide) => (far_x, far_y),
        (RadialShape::Ellipse, RadialSize::ClosestCorner) => {
            (near_x * std::f32::consts::SQRT_2, near_y * std::f32::consts::SQRT_2)
        }
        (RadialShape::Ellipse, RadialSize::FarthestCorner) => {
            (far_x * std::f32::consts::SQRT_2, far_y * std::f32::consts::SQRT_2)
        }
    };
    (cx, cy, rx, ry)
}

fn paint_radial(tile: &mut Pixmap, spec: &RadialSpec, ramp: &Ramp) {
    let (cx, cy, rx, ry) = radial_radii(spec, tile.width() as f32, tile.height() as f32);
    if rx <= f32::EPSILON || ry <= f32::EPSILON {
        tile.fill(ramp.last_color());
        return;
    }

    if spec.repeating && ramp.period().is_some() {
        fill_per_pixel(tile, |x, y| {
            let t = ((x - cx) / rx).hypot((y - cy) / ry) * 100.0;
            ramp.sample(ramp.wrap(t))
        });
        return;
    }

    let shader = RadialGradient::new(
        Point::zero(),
        Point::zero(),
        1.0,
        ramp.sk_stops(None),
        SpreadMode::Pad,
        Transform::from_translate(cx, cy).pre_scale(rx, ry),
    );
    fill_shader(tile, shader, ramp.last_color());
}

fn paint_conic(tile: &mut Pixmap, spec: &ConicGradient, ramp: &Ramp, w: f32, h: f32) {
    let cx = spec.center_x as f32 / 100.0 * w;
    let cy = spec.center_y as f32 / 100.0 * h;
    let from = spec.from_angle as f32;
    let repeating = spec.repeating;
    fill_per_pixel(tile, |x, y| {
        // Clockwise from up, like CSS.
        let angle = (x - cx).atan2(-(y - cy)).to_degrees();
        let t = (angle - from).rem_euclid(360.0) / 360.0 * 100.0;
        ramp.sample(if repeating { ramp.wrap(t) } else { t })
    });
}

// ============================================================================
// Ramp
// ============================================================================

/// Sorted stops with parsed colors. Positions stay on the 0-100 scale.
struct Ramp {
    stops: Vec<(f32, [f32; 3], f32)>,
}

impl Ramp {
    fn new(stops: &[GradientStop]) -> Self {
        let stops = sorted_stops(stops)
            .into_iter()
            .map(|s| {
                let rgb = parse_hex_lenient(&s.color).unwrap_or_default();
                (
                    s.position as f32,
                    [rgb.r as f32, rgb.g as f32, rgb.b as f32],
                    s.opacity.clamp(0.0, 1.0) as f32,
                )
            })
            .collect();
        Self { stops }
    }

    fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Single-stop gradients paint one color.
    fn solid(&self) -> Option<Color> {
        match self.stops.as_slice() {
            [only] => Some(to_color(only)),
            _ => None,
        }
    }

    fn last_color(&self) -> Color {
        self.stops.last().map_or(Color::WHITE, to_color)
    }

    /// First and last stop positions when they span a non-empty interval.
    fn period(&self) -> Option<(f32, f32)> {
        let first = self.stops.first()?.0;
        let last = self.stops.last()?.0;
        (last - first > f32::EPSILON).then_some((first, last))
    }

    /// Folds `t` into the repeating interval.
    fn wrap(&self, t: f32) -> f32 {
        match self.period() {
            Some((first, last)) => first + (t - first).rem_euclid(last - first),
            None => t,
        }
    }

    /// Straight RGBA at position `t`; alpha is 0-1.
    fn sample(&self, t: f32) -> [f32; 4] {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return [255.0, 255.0, 255.0, 1.0];
        };
        if t <= first.0 {
            return rgba(first);
        }
        if t >= last.0 {
            return rgba(last);
        }
        let Some(pair) = self.stops.windows(2).find(|p| t >= p[0].0 && t <= p[1].0) else {
            return rgba(last);
        };
        let (a, b) = (&pair[0], &pair[1]);
        let span = b.0 - a.0;
        let k = if span <= 0.0 { 1.0 } else { (t - a.0) / span };
        let lerp = |x: f32, y: f32| x + (y - x) * k;
        [
            lerp(a.1[0], b.1[0]).round(),
            lerp(a.1[1], b.1[1]).round(),
            lerp(a.1[2], b.1[2]).round(),
            lerp(a.2, b.2),
        ]
    }

    /// tiny-skia stops, optionally remapped from `[first, last]` onto `[0, 1]`.
    fn sk_stops(&self, remap: Option<(f32, f32)>) -> Vec<SkStop> {
        self.stops
            .iter()
            .map(|stop| {
                let offset = match remap {
                    Some((first, last)) => (stop.0 - first) / (last - first),
                    None => stop.0 / 100.0,
                };
                SkStop::new(offset.clamp(0.0, 1.0), to_color(stop))
            })
            .collect()
    }
}

fn rgba(stop: &(f32, [f32; 3], f32)) -> [f32; 4] {
    [stop.1[0], stop.1[1], stop.1[2], stop.2]
}

fn to_color(stop: &(f32, [f32; 3], f32)) -> Color {
    Color::from_rgba8(
        stop.1[0] as u8,
        stop.1[1] as u8,
        stop.1[2] as u8,
        (stop.2 * 255.0).round() as u8,
    )
}
