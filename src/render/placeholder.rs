use crate::assets::color::{Rgb, parse_hex_rgb_or};
use crate::assets::font::{FontFace, TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::{ArtifactIndex, Point};
use crate::layout::metrics::{
    TextExtent, line_box_origin, measure_layout, resolve_image_anchor, resolve_text_anchor,
};
use crate::model::placeholder::Placeholder;
use crate::model::table::{ColumnIndex, DataRow};
use crate::render::batch::BatchOpts;
use crate::render::canvas::RenderCanvas;
use crate::transform::{Drawable, TransformContext, apply_transform_or_text};

/// A placeholder with its font face, fill color and size resolved once for the whole batch.
#[derive(Clone, Debug)]
pub struct PreparedPlaceholder {
    placeholder: Placeholder,
    face: Option<FontFace>,
    color: Rgb,
    size_px: f32,
    style_degraded: bool,
}

impl PreparedPlaceholder {
    /// Resolve style for `placeholder`.
    ///
    /// A font that fails to decode falls back to `default_face`; an invalid color falls back to
    /// `opts.default_color`. Both are logged once and mark the placeholder's style as degraded.
    pub fn prepare(
        placeholder: Placeholder,
        engine: &mut TextLayoutEngine,
        default_face: Option<&FontFace>,
        opts: &BatchOpts,
    ) -> Self {
        let mut style_degraded = false;

        let face = if placeholder.font_content.trim().is_empty() {
            default_face.cloned()
        } else {
            match engine.load_face_base64(&placeholder.font_content) {
                Ok(face) => Some(face),
                Err(error) => {
                    if placeholder.is_active() {
                        tracing::warn!(
                            placeholder = placeholder.id,
                            font = %placeholder.font_name,
                            %error,
                            "font unusable, using default face"
                        );
                        style_degraded = true;
                    }
                    default_face.cloned()
                }
            }
        };

        let color = if placeholder.color.trim().is_empty() {
            opts.default_color
        } else {
            let (color, error) = parse_hex_rgb_or(&placeholder.color, opts.default_color);
            if let Some(error) = error
                && placeholder.is_active()
            {
                tracing::warn!(placeholder = placeholder.id, %error, "using default color");
                style_degraded = true;
            }
            color
        };

        let size_px = if placeholder.font_size.is_finite() && placeholder.font_size > 0.0 {
            placeholder.font_size
        } else {
            opts.default_font_size_px
        };

        Self {
            placeholder,
            face,
            color,
            size_px,
            style_degraded,
        }
    }

    /// The underlying placeholder.
    pub fn placeholder(&self) -> &Placeholder {
        &self.placeholder
    }

    /// Resolved face, `None` when neither the placeholder's nor a default face is usable.
    pub fn face(&self) -> Option<&FontFace> {
        self.face.as_ref()
    }

    /// Resolved fill color.
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Resolved font size in pixels.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Whether the font or color fell back to a default.
    pub fn style_degraded(&self) -> bool {
        self.style_degraded
    }
}

/// What one placeholder did for one row.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaceholderOutcome {
    /// Empty source column; nothing was drawn.
    Inactive,
    /// The row has no value for the source column; nothing was drawn.
    MissingColumn,
    /// Text was drawn with its first baseline one line height below `anchor`.
    Text {
        /// Drawn string.
        text: String,
        /// Left edge of the text, one line height above the baseline.
        anchor: Point,
        /// Measured size.
        extent: TextExtent,
        /// Whether an image transform failed and this text replaced it.
        fallback: bool,
    },
    /// A generated image was drawn with its top-left corner at `anchor`.
    Image {
        /// Top-left of the image.
        anchor: Point,
        /// Image side in pixels.
        side: u32,
    },
    /// Text was due but no usable face exists; nothing was drawn.
    TextSkipped,
}

/// Result of rendering one placeholder for one row.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceholderReport {
    /// What happened.
    pub outcome: PlaceholderOutcome,
    /// Whether any step fell back to a default.
    pub degraded: bool,
}

/// Style for one draw call, built fresh per placeholder so nothing carries over.
#[derive(Clone, Copy)]
struct DrawStyle<'a> {
    face: Option<&'a FontFace>,
    size_px: f32,
    brush: TextBrushRgba8,
}

/// Draws placeholders onto row canvases.
pub struct PlaceholderRenderer<'a> {
    engine: &'a mut TextLayoutEngine,
    opts: &'a BatchOpts,
}

impl<'a> PlaceholderRenderer<'a> {
    /// Renderer sharing `engine` and batch options.
    pub fn new(engine: &'a mut TextLayoutEngine, opts: &'a BatchOpts) -> Self {
        Self { engine, opts }
    }

    /// Render `prepared` for `row` onto `canvas`.
    ///
    /// Never fails: every placeholder-level problem is logged and degrades to default styling,
    /// plain text, or no drawing.
    pub fn render(
        &mut self,
        canvas: &mut RenderCanvas,
        prepared: &PreparedPlaceholder,
        columns: &ColumnIndex,
        row: &DataRow,
        row_index: ArtifactIndex,
    ) -> PlaceholderReport {
        let ph = prepared.placeholder();
        if !ph.is_active() {
            return PlaceholderReport {
                outcome: PlaceholderOutcome::Inactive,
                degraded: false,
            };
        }

        let content = match columns.value(row, &ph.csv_key) {
            Ok(v) => v,
            Err(error) => {
                tracing::warn!(
                    row = row_index.0,
                    placeholder = ph.id,
                    column = %ph.csv_key,
                    %error,
                    "skipping placeholder"
                );
                return PlaceholderReport {
                    outcome: PlaceholderOutcome::MissingColumn,
                    degraded: true,
                };
            }
        };

        let style = DrawStyle {
            face: prepared.face(),
            size_px: prepared.size_px(),
            brush: TextBrushRgba8::from_rgba8(prepared.color().to_rgba8()),
        };

        let mut cx = TransformContext {
            engine: &mut *self.engine,
            face: style.face,
            avatar_gender: ph.avatar_gender.unwrap_or(self.opts.avatar.gender),
            avatar_seed: self.opts.avatar.seed_for(row_index, ph.id),
            max_side_px: canvas.canvas().longest_edge(),
        };
        let transformed = apply_transform_or_text(ph.transform, content, ph.image_side_px(), &mut cx);
        if let Some(error) = &transformed.fallback {
            tracing::warn!(
                row = row_index.0,
                placeholder = ph.id,
                transform = ph.transform.as_str(),
                %error,
                "transform failed, drawing plain text"
            );
        }
        let fallback = transformed.fallback.is_some();

        let outcome = match transformed.drawable {
            Drawable::Image(img) => {
                let anchor = resolve_image_anchor(ph.bounds(), ph.text_align, f64::from(img.width()));
                match canvas.draw_image(&img, anchor) {
                    Ok(()) => PlaceholderOutcome::Image {
                        anchor,
                        side: img.width(),
                    },
                    Err(error) => {
                        tracing::warn!(row = row_index.0, placeholder = ph.id, %error, "image draw failed");
                        return PlaceholderReport {
                            outcome: PlaceholderOutcome::TextSkipped,
                            degraded: true,
                        };
                    }
                }
            }
            Drawable::Text(text) => self.draw_text(canvas, ph, style, text, fallback, row_index),
        };

        let degraded = prepared.style_degraded()
            || fallback
            || matches!(outcome, PlaceholderOutcome::TextSkipped);
        PlaceholderReport { outcome, degraded }
    }

    fn draw_text(
        &mut self,
        canvas: &mut RenderCanvas,
        ph: &Placeholder,
        style: DrawStyle<'_>,
        text: String,
        fallback: bool,
        row_index: ArtifactIndex,
    ) -> PlaceholderOutcome {
        let Some(face) = style.face else {
            tracing::warn!(
                row = row_index.0,
                placeholder = ph.id,
                "no usable font face, text skipped"
            );
            return PlaceholderOutcome::TextSkipped;
        };

        let drawn = self
            .engine
            .layout_line(&text, face, style.size_px, style.brush)
            .and_then(|layout| {
                let extent = measure_layout(&layout);
                let anchor =
                    resolve_text_anchor(ph.bounds(), ph.text_align, extent, self.opts.baseline_adjust);
                canvas.draw_text(&layout, face, line_box_origin(anchor, &layout), extent)?;
                Ok((anchor, extent))
            });

        match drawn {
            Ok((anchor, extent)) => PlaceholderOutcome::Text {
                text,
                anchor,
                extent,
                fallback,
            },
            Err(error) => {
                tracing::warn!(row = row_index.0, placeholder = ph.id, %error, "text draw failed");
                PlaceholderOutcome::TextSkipped
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/placeholder.rs"]
mod tests;
