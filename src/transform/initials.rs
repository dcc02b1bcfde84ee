use crate::assets::font::{FontFace, TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::Point;
use crate::foundation::error::{ImprintError, ImprintResult};
use crate::foundation::math::Fnv1a64;
use crate::layout::metrics::measure_layout;
use crate::render::raster::{fill_layout, pixmap_to_rgba_image, render_pixmap, size_u16};

const PALETTE: [[u8; 3]; 8] = [
    [0x1a, 0xbc, 0x9c],
    [0x2e, 0xcc, 0x71],
    [0x34, 0x98, 0xdb],
    [0x9b, 0x59, 0xb6],
    [0x34, 0x49, 0x5e],
    [0xf3, 0x9c, 0x12],
    [0xe6, 0x7e, 0x22],
    [0xe7, 0x4c, 0x3c],
];

/// Letters shown on an initials avatar: the first letter of the first and last words, upper-cased.
pub fn initials(name: &str) -> String {
    let mut words = name.split_whitespace();
    let Some(first) = words.next() else {
        return String::new();
    };
    let mut out: String = first.chars().take(1).flat_map(char::to_uppercase).collect();
    if let Some(last) = words.last() {
        out.extend(last.chars().take(1).flat_map(char::to_uppercase));
    }
    out
}

/// Background color for `name`, stable across runs.
pub fn background_for(name: &str) -> [u8; 3] {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(name.trim().as_bytes());
    PALETTE[(h.finish() % PALETTE.len() as u64) as usize]
}

/// Draw `name`'s initials centered in white on a colored `side_px` square.
pub fn render_initial_avatar(
    engine: &mut TextLayoutEngine,
    face: &FontFace,
    name: &str,
    side_px: u32,
) -> ImprintResult<image::RgbaImage> {
    let letters = initials(name);
    if letters.is_empty() {
        return Err(ImprintError::transform("initial-avatar: content has no letters"));
    }
    let (w, h) = size_u16(side_px, side_px)
        .map_err(|e| ImprintError::transform(format!("initial-avatar: {e}")))?;

    let side = f64::from(w);
    let layout = engine.layout_line(
        &letters,
        face,
        (side * 0.5) as f32,
        TextBrushRgba8::from_rgba8([255, 255, 255, 255]),
    )?;
    let extent = measure_layout(&layout);

    let [r, g, b] = background_for(name);
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, 255));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, side, side));
    fill_layout(
        &mut ctx,
        &layout,
        face,
        Point::new((side - extent.width) / 2.0, (side - extent.height) / 2.0),
    );
    pixmap_to_rgba_image(&render_pixmap(&mut ctx, w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/transform/initials.rs"]
mod tests;
