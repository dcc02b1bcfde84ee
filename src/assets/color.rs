use crate::foundation::error::{ImprintError, ImprintResult};

/// Normalized RGB color, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Rgb {
    /// Opaque black, the fallback fill for unparsable colors.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Build a color from normalized channels.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Build a color from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
        )
    }

    /// Opaque straight-alpha RGBA8.
    pub fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), 255]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Decode `#RRGGBB` (the `#` is optional) into normalized channels.
///
/// Anything that does not decode to exactly three bytes is an
/// [`ImprintError::InvalidColor`]; this never panics on arbitrary input.
pub fn parse_hex_rgb(s: &str) -> ImprintResult<Rgb> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

    let bytes = digits.as_bytes();
    if bytes.len() != 6 {
        return Err(ImprintError::invalid_color(format!(
            "\"{s}\" must be #RRGGBB"
        )));
    }

    let mut rgb = [0u8; 3];
    for (out, pair) in rgb.iter_mut().zip(bytes.chunks_exact(2)) {
        let hi = hex_nibble(pair[0]);
        let lo = hex_nibble(pair[1]);
        let (Some(hi), Some(lo)) = (hi, lo) else {
            return Err(ImprintError::invalid_color(format!(
                "\"{s}\" contains non-hex digits"
            )));
        };
        *out = (hi << 4) | lo;
    }

    Ok(Rgb::from_u8(rgb[0], rgb[1], rgb[2]))
}

/// Parse `s`, falling back to `fallback` on failure.
///
/// Returns the parse error alongside so callers can log it.
pub fn parse_hex_rgb_or(s: &str, fallback: Rgb) -> (Rgb, Option<ImprintError>) {
    match parse_hex_rgb(s) {
        Ok(c) => (c, None),
        Err(e) => (fallback, Some(e)),
    }
}

fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
