use crate::assets::font::{FontFace, TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::{Point, Rect};
use crate::foundation::error::ImprintResult;
use crate::model::placeholder::TextAlign;

/// Fraction of the text height lifted off the bottom edge of the placeholder box.
///
/// Tunable heuristic kept numerically stable for layout compatibility; it is not derived from font
/// metrics.
pub const BASELINE_ADJUST: f64 = 0.8;

/// Rendered size of a laid-out string, in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextExtent {
    /// Widest line advance.
    pub width: f64,
    /// Sum of line heights (ascent + descent + leading).
    pub height: f64,
}

/// Measure a Parley layout.
pub fn measure_layout(layout: &parley::Layout<TextBrushRgba8>) -> TextExtent {
    let mut width = 0.0f64;
    let mut height = 0.0f64;
    for line in layout.lines() {
        let m = line.metrics();
        width = width.max(f64::from(m.advance));
        height += f64::from(m.ascent + m.descent + m.leading);
    }
    TextExtent { width, height }
}

/// Lay out `text` with `face` and measure it.
pub fn measure_text(
    engine: &mut TextLayoutEngine,
    text: &str,
    face: &FontFace,
    size_px: f32,
) -> ImprintResult<TextExtent> {
    let layout = engine.layout_line(text, face, size_px, TextBrushRgba8::default())?;
    Ok(measure_layout(&layout))
}

/// Anchor for text of `extent` inside `bounds`.
///
/// `x` follows `align`; `y` sits `extent.height * baseline_adjust` above the bottom edge of the
/// box. The first baseline is drawn one line height below the anchor, see [`line_box_origin`].
pub fn resolve_text_anchor(
    bounds: Rect,
    align: TextAlign,
    extent: TextExtent,
    baseline_adjust: f64,
) -> Point {
    Point::new(
        align_x(bounds, align, extent.width),
        bounds.y0 + bounds.height() - extent.height * baseline_adjust,
    )
}

/// Top-left corner at which to draw `layout` so its first baseline sits one line height below
/// `anchor`.
///
/// A line height is ascent + descent + leading. An empty layout is drawn at `anchor`.
pub fn line_box_origin(anchor: Point, layout: &parley::Layout<TextBrushRgba8>) -> Point {
    let Some(line) = layout.lines().next() else {
        return anchor;
    };
    let m = line.metrics();
    let line_height = f64::from(m.ascent + m.descent + m.leading);
    Point::new(anchor.x, anchor.y + line_height - f64::from(m.baseline))
}

/// Anchor for a generated square image of side `side` inside `bounds`.
///
/// No text is measured: the image is aligned by its own width and placed at the box's top edge.
pub fn resolve_image_anchor(bounds: Rect, align: TextAlign, side: f64) -> Point {
    Point::new(align_x(bounds, align, side), bounds.y0)
}

fn align_x(bounds: Rect, align: TextAlign, content_w: f64) -> f64 {
    match align {
        TextAlign::Left => bounds.x0,
        TextAlign::Center => bounds.x0 + (bounds.width() - content_w) / 2.0,
        TextAlign::Right => bounds.x0 + bounds.width() - content_w,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/metrics.rs"]
mod tests;
