use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::decode_base64;
use crate::foundation::error::{ImprintError, ImprintResult};
use crate::foundation::math::Fnv1a64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl TextBrushRgba8 {
    /// Build a brush from straight-alpha RGBA8.
    pub fn from_rgba8([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// A decoded font face registered with a [`TextLayoutEngine`].
///
/// Faces are only meaningful to the engine that produced them.
#[derive(Clone)]
pub struct FontFace {
    key: u64,
    family: String,
    bytes: Arc<Vec<u8>>,
    data: vello_cpu::peniko::FontData,
}

impl FontFace {
    /// Family name detected from the font data.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Raw font file bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn data(&self) -> &vello_cpu::peniko::FontData {
        &self.data
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("font_bytes_len", &self.bytes.len())
            .finish()
    }
}

/// Stateful helper for registering font bytes and building Parley layouts.
///
/// Every face gets its own font collection, so shaping never resolves a family name to a
/// different face that happens to share it.
pub struct TextLayoutEngine {
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    faces_by_hash: HashMap<u64, (FontFace, parley::FontContext)>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            layout_ctx: parley::LayoutContext::new(),
            faces_by_hash: HashMap::new(),
        }
    }

    /// Register raw font bytes (TTF/OTF/TTC) and return the resulting face.
    ///
    /// Identical bytes are registered once.
    pub fn load_face(&mut self, font_bytes: Vec<u8>) -> ImprintResult<FontFace> {
        if font_bytes.is_empty() {
            return Err(ImprintError::font("font bytes are empty"));
        }

        let mut hasher = Fnv1a64::new_default();
        hasher.write_bytes(&font_bytes);
        let key = hasher.finish();
        if let Some((face, _)) = self.faces_by_hash.get(&key) {
            return Ok(face.clone());
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ImprintError::font("no font families registered from font bytes"))?;

        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ImprintError::font("registered font family has no name"))?
            .to_string();

        let bytes = Arc::new(font_bytes);
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
            0,
        );
        let face = FontFace {
            key,
            family,
            bytes,
            data,
        };
        self.faces_by_hash.insert(key, (face.clone(), font_ctx));
        Ok(face)
    }

    /// Decode base64 font content and register it.
    pub fn load_face_base64(&mut self, font_content: &str) -> ImprintResult<FontFace> {
        if font_content.trim().is_empty() {
            return Err(ImprintError::font("no font content supplied"));
        }
        let bytes = decode_base64(font_content)
            .map_err(|e| ImprintError::font(format!("font content: {e}")))?;
        self.load_face(bytes)
    }

    /// Shape and lay out a single unwrapped line of text.
    pub fn layout_line(
        &mut self,
        text: &str,
        face: &FontFace,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> ImprintResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ImprintError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let (_, font_ctx) = self
            .faces_by_hash
            .get_mut(&face.key)
            .ok_or_else(|| ImprintError::font("face was not loaded by this engine"))?;
        let mut builder = self.layout_ctx.ranged_builder(font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Find a system sans-serif face and return its file bytes.
///
/// Returns `None` on hosts without any installed fonts.
pub fn system_default_face_bytes() -> Option<Vec<u8>> {
    use usvg::fontdb;

    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let families = [
        fontdb::Family::SansSerif,
        fontdb::Family::Serif,
        fontdb::Family::Monospace,
    ];
    let query = fontdb::Query {
        families: &families,
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };

    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|f| f.id))?;
    db.with_face_data(id, |data, _index| data.to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
