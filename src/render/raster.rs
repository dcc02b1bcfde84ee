use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::assets::font::{FontFace, TextBrushRgba8};
use crate::foundation::core::Point;
use crate::foundation::error::{ImprintError, ImprintResult};

pub(crate) fn size_u16(width: u32, height: u32) -> ImprintResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ImprintError::validation("raster width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ImprintError::validation("raster height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(ImprintError::validation("raster must be at least 1x1"));
    }
    Ok((w, h))
}

/// Fill every glyph run of `layout` with the line box's top-left corner at `origin`.
pub(crate) fn fill_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextBrushRgba8>,
    face: &FontFace,
    origin: Point,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));

    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(face.data())
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

/// Flush `ctx` into a fresh transparent pixmap of the context's size.
pub(crate) fn render_pixmap(
    ctx: &mut vello_cpu::RenderContext,
    width: u16,
    height: u16,
) -> vello_cpu::Pixmap {
    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    pixmap
}

/// Convert a premultiplied pixmap into a straight-alpha image.
pub(crate) fn pixmap_to_rgba_image(pixmap: &vello_cpu::Pixmap) -> ImprintResult<image::RgbaImage> {
    let mut bytes = pixmap.data_as_u8_slice().to_vec();
    unpremultiply_rgba8_in_place(&mut bytes);
    image::RgbaImage::from_raw(u32::from(pixmap.width()), u32::from(pixmap.height()), bytes)
        .ok_or_else(|| ImprintError::validation("pixmap byte length mismatch"))
}
