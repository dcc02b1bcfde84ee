use qrcode::{EcLevel, QrCode};

use crate::foundation::error::{ImprintError, ImprintResult};

/// Light modules kept around the symbol on every side.
pub const QUIET_ZONE_MODULES: u32 = 4;

const DARK: image::Rgba<u8> = image::Rgba([0, 0, 0, 255]);
const LIGHT: image::Rgba<u8> = image::Rgba([255, 255, 255, 255]);

/// Encode `content` at error-correction level M as a square raster of `side_px` pixels.
///
/// Every module is the same whole number of pixels and the symbol is centered; leftover pixels
/// widen the light margin. A side too small for one pixel per module grows to
/// `modules + 2 * QUIET_ZONE_MODULES`.
pub fn render_qr(content: &str, side_px: u32) -> ImprintResult<image::RgbaImage> {
    if content.is_empty() {
        return Err(ImprintError::transform("qrcode: no data to encode"));
    }
    let code = QrCode::with_error_correction_level(content.as_bytes(), EcLevel::M)
        .map_err(|e| ImprintError::transform(format!("qrcode: {e}")))?;

    let modules = code.width() as u32;
    let colors = code.to_colors();
    let full = modules + 2 * QUIET_ZONE_MODULES;
    let side = side_px.max(full);
    let px_per_module = side / full;
    let margin = (side - full * px_per_module) / 2 + QUIET_ZONE_MODULES * px_per_module;

    let mut img = image::RgbaImage::from_pixel(side, side, LIGHT);
    for (i, color) in colors.iter().enumerate() {
        if *color != qrcode::Color::Dark {
            continue;
        }
        let mx = i as u32 % modules;
        let my = i as u32 / modules;
        let x0 = margin + mx * px_per_module;
        let y0 = margin + my * px_per_module;
        for y in y0..y0 + px_per_module {
            for x in x0..x0 + px_per_module {
                img.put_pixel(x, y, DARK);
            }
        }
    }
    Ok(img)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/qr.rs"]
mod tests;
