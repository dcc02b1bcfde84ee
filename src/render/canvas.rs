use std::io::Cursor;

use crate::assets::decode::{BaseImage, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::assets::font::{FontFace, TextBrushRgba8};
use crate::foundation::core::{ArtifactIndex, Canvas, Point};
use crate::foundation::error::{ImprintError, ImprintResult};
use crate::layout::metrics::TextExtent;
use crate::render::composite::{Blit, blit_over};
use crate::render::raster::{fill_layout, render_pixmap, size_u16};

/// One finished output image: the base image with every placeholder of one row drawn onto it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedArtifact {
    /// Zero-based position among the batch's rendered rows.
    pub index: ArtifactIndex,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Straight-alpha RGBA8 pixels, row-major.
    pub rgba8: Vec<u8>,
}

impl RenderedArtifact {
    /// Encode the artifact as PNG bytes.
    pub fn encode_png(&self) -> ImprintResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.rgba8.clone())
            .ok_or_else(|| ImprintError::validation("artifact byte length mismatch"))?;
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .map_err(|e| ImprintError::sink(format!("png encode: {e}")))?;
        Ok(out)
    }

    /// Straight-alpha pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Some([
            self.rgba8[i],
            self.rgba8[i + 1],
            self.rgba8[i + 2],
            self.rgba8[i + 3],
        ])
    }
}

/// A per-row drawing surface: a private premultiplied copy of the base image.
pub struct RenderCanvas {
    canvas: Canvas,
    rgba8_premul: Vec<u8>,
}

impl RenderCanvas {
    /// Start a new surface from the base image's pixels.
    pub fn from_base(base: &BaseImage) -> Self {
        Self {
            canvas: base.canvas(),
            rgba8_premul: base.rgba8_premul().to_vec(),
        }
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Composite a straight-alpha image with its top-left corner at `at`.
    ///
    /// Coordinates are truncated to whole pixels; parts outside the canvas are clipped.
    pub fn draw_image(&mut self, img: &image::RgbaImage, at: Point) -> ImprintResult<()> {
        let mut src = img.as_raw().clone();
        premultiply_rgba8_in_place(&mut src);
        blit_over(
            &mut self.rgba8_premul,
            self.canvas.width,
            self.canvas.height,
            Blit {
                src: &src,
                src_w: img.width(),
                src_h: img.height(),
                x: at.x.trunc() as i64,
                y: at.y.trunc() as i64,
            },
        )
    }

    /// Draw a laid-out line of text with its line box's top-left corner at `origin`.
    ///
    /// Only the region covered by `extent`, padded by one line height for glyph overhang, is
    /// rasterized. Parts outside the canvas are clipped.
    pub fn draw_text(
        &mut self,
        layout: &parley::Layout<TextBrushRgba8>,
        face: &FontFace,
        origin: Point,
        extent: TextExtent,
    ) -> ImprintResult<()> {
        let pad = extent.height.max(1.0);
        let x0 = ((origin.x - pad).floor() as i64).max(0);
        let y0 = ((origin.y - pad).floor() as i64).max(0);
        let x1 = ((origin.x + extent.width + pad).ceil() as i64).min(i64::from(self.canvas.width));
        let y1 = ((origin.y + extent.height + pad).ceil() as i64).min(i64::from(self.canvas.height));
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }

        let (w, h) = size_u16((x1 - x0) as u32, (y1 - y0) as u32)?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        fill_layout(
            &mut ctx,
            layout,
            face,
            Point::new(origin.x - x0 as f64, origin.y - y0 as f64),
        );
        let overlay = render_pixmap(&mut ctx, w, h);
        blit_over(
            &mut self.rgba8_premul,
            self.canvas.width,
            self.canvas.height,
            Blit {
                src: overlay.data_as_u8_slice(),
                src_w: u32::from(w),
                src_h: u32::from(h),
                x: x0,
                y: y0,
            },
        )
    }

    /// Finish the surface as the artifact at `index`.
    pub fn into_artifact(self, index: ArtifactIndex) -> RenderedArtifact {
        let mut rgba8 = self.rgba8_premul;
        unpremultiply_rgba8_in_place(&mut rgba8);
        RenderedArtifact {
            index,
            width: self.canvas.width,
            height: self.canvas.height,
            rgba8,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
