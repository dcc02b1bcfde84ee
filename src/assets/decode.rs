use std::sync::Arc;

use base64::Engine as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ImprintError, ImprintResult};

/// Decoded, immutable base raster in premultiplied RGBA8 form.
///
/// Loaded once per batch and shared read-only by every row's canvas.
#[derive(Clone, Debug)]
pub struct BaseImage {
    canvas: Canvas,
    rgba8_premul: Arc<Vec<u8>>,
}

impl BaseImage {
    /// Wrap an already premultiplied buffer.
    pub fn from_premul_rgba8(canvas: Canvas, rgba8_premul: Vec<u8>) -> ImprintResult<Self> {
        if rgba8_premul.len() != canvas.rgba8_len() {
            return Err(ImprintError::decode(format!(
                "base image byte length {} does not match {}x{}",
                rgba8_premul.len(),
                canvas.width,
                canvas.height
            )));
        }
        Ok(Self {
            canvas,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Raster dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    /// Pixel bytes in row-major premultiplied RGBA8.
    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }
}

/// Decode encoded image bytes (any format the `image` crate recognizes).
pub fn decode_base_image(bytes: &[u8]) -> ImprintResult<BaseImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ImprintError::decode(format!("base image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let canvas = Canvas::new(width, height).map_err(|e| ImprintError::decode(e.to_string()))?;

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    BaseImage::from_premul_rgba8(canvas, rgba8_premul)
}

/// Decode a base64 (optionally `data:` URL) encoded image.
pub fn decode_base_image_base64(b64: &str) -> ImprintResult<BaseImage> {
    let bytes = decode_base64(b64)?;
    decode_base_image(&bytes)
}

/// Decode standard-alphabet base64, tolerating surrounding whitespace and a `data:...;base64,`
/// prefix.
pub fn decode_base64(s: &str) -> ImprintResult<Vec<u8>> {
    let s = s.trim();
    let payload = match s.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| ImprintError::decode("data URL has no ',' separator"))?,
        None => s,
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ImprintError::decode(format!("base64: {e}")))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
