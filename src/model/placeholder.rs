use serde::Deserialize;

use crate::foundation::core::Rect;
use crate::foundation::error::{ImprintError, ImprintResult};

/// Horizontal alignment of text inside a placeholder box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// Anchor at the box's left edge.
    #[default]
    Left,
    /// Center inside the box.
    Center,
    /// Flush against the box's right edge.
    Right,
}

impl TextAlign {
    /// Parse the wire name. Empty selects the default (`left`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Content transform applied to a placeholder's resolved value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// Draw the value as styled text.
    #[default]
    None,
    /// Upper-case the value, then draw it as styled text.
    Uppercase,
    /// Encode the value as a QR code image.
    QrCode,
    /// Draw a synthetic avatar, ignoring the value.
    Avatar,
    /// Draw an avatar built from the value's initials.
    InitialAvatar,
}

impl TransformKind {
    /// Parse the wire name. Empty selects [`TransformKind::None`].
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Some(Self::None),
            "uppercase" => Some(Self::Uppercase),
            "qrcode" => Some(Self::QrCode),
            "avatar" => Some(Self::Avatar),
            "initial-avatar" => Some(Self::InitialAvatar),
            _ => None,
        }
    }

    /// Wire name of the transform.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Uppercase => "uppercase",
            Self::QrCode => "qrcode",
            Self::Avatar => "avatar",
            Self::InitialAvatar => "initial-avatar",
        }
    }

    /// Whether this transform replaces text drawing with an image.
    pub fn produces_image(self) -> bool {
        matches!(self, Self::QrCode | Self::Avatar | Self::InitialAvatar)
    }
}

/// Gender parameter of the synthetic avatar generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AvatarGender {
    /// Short hair, collared shirt.
    #[default]
    Male,
    /// Long hair, round neckline.
    Female,
}

impl AvatarGender {
    /// Parse the wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// A declared rectangular region plus style and transform metadata.
///
/// Placeholders are read-only configuration shared by every row of a batch.
#[derive(Clone, Debug, PartialEq)]
pub struct Placeholder {
    /// Caller-assigned identifier.
    pub id: i64,
    /// Left edge in canvas pixels.
    pub x: f64,
    /// Top edge in canvas pixels.
    pub y: f64,
    /// Box width; also the side of generated images.
    pub w: f64,
    /// Box height.
    pub h: f64,
    /// Source column. Empty marks the placeholder inactive.
    pub csv_key: String,
    /// Fill color as `#RRGGBB`.
    pub color: String,
    /// Display name of the font (informational).
    pub font_name: String,
    /// Base64 encoded font file bytes.
    pub font_content: String,
    /// Font size in pixels; non-positive selects the batch default.
    pub font_size: f32,
    /// Horizontal alignment.
    pub text_align: TextAlign,
    /// Content transform.
    pub transform: TransformKind,
    /// Per-placeholder avatar gender override.
    pub avatar_gender: Option<AvatarGender>,
}

impl Placeholder {
    /// An active, default-styled text placeholder bound to `csv_key`.
    pub fn new(id: i64, bounds: Rect, csv_key: impl Into<String>) -> Self {
        Self {
            id,
            x: bounds.x0,
            y: bounds.y0,
            w: bounds.width(),
            h: bounds.height(),
            csv_key: csv_key.into(),
            color: "#000000".to_string(),
            font_name: String::new(),
            font_content: String::new(),
            font_size: 0.0,
            text_align: TextAlign::Left,
            transform: TransformKind::None,
            avatar_gender: None,
        }
    }

    /// Return `self` with a different alignment.
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    /// Return `self` with a different transform.
    pub fn with_transform(mut self, transform: TransformKind) -> Self {
        self.transform = transform;
        self
    }

    /// Return `self` with a different fill color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Return `self` with base64 font content and size.
    pub fn with_font(mut self, font_content: impl Into<String>, font_size: f32) -> Self {
        self.font_content = font_content.into();
        self.font_size = font_size;
        self
    }

    /// Whether the placeholder takes part in rendering.
    pub fn is_active(&self) -> bool {
        !self.csv_key.is_empty()
    }

    /// Placeholder box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }

    /// Side length in whole pixels used for generated square images.
    pub fn image_side_px(&self) -> u32 {
        if self.w.is_finite() && self.w >= 1.0 {
            self.w as u32
        } else {
            0
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceholderWire {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    start_x: f64,
    #[serde(default)]
    start_y: f64,
    #[serde(default)]
    w: f64,
    #[serde(default)]
    h: f64,
    #[serde(default, rename = "csv_key")]
    csv_key: String,
    #[serde(default)]
    color: String,
    #[serde(default)]
    font: String,
    #[serde(default)]
    font_content: String,
    #[serde(default)]
    text_align: String,
    #[serde(default)]
    font_size: f32,
    #[serde(default)]
    transform: String,
    #[serde(default)]
    avatar_gender: Option<String>,
}

impl PlaceholderWire {
    fn into_placeholder(self) -> ImprintResult<Placeholder> {
        for (name, v) in [
            ("startX", self.start_x),
            ("startY", self.start_y),
            ("w", self.w),
            ("h", self.h),
        ] {
            if !v.is_finite() {
                return Err(ImprintError::validation(format!("{name} must be finite")));
            }
        }
        if self.w < 0.0 || self.h < 0.0 {
            return Err(ImprintError::validation("w and h must be >= 0"));
        }

        let text_align = TextAlign::parse(&self.text_align).unwrap_or_else(|| {
            tracing::warn!(
                placeholder = self.id,
                value = %self.text_align,
                "unknown textAlign, using left"
            );
            TextAlign::Left
        });
        let transform = TransformKind::parse(&self.transform).unwrap_or_else(|| {
            tracing::warn!(
                placeholder = self.id,
                value = %self.transform,
                "unknown transform, drawing plain text"
            );
            TransformKind::None
        });
        let avatar_gender = self.avatar_gender.as_deref().and_then(|g| {
            let parsed = AvatarGender::parse(g);
            if parsed.is_none() {
                tracing::warn!(
                    placeholder = self.id,
                    value = g,
                    "unknown avatarGender, using batch default"
                );
            }
            parsed
        });

        Ok(Placeholder {
            id: self.id,
            x: self.start_x,
            y: self.start_y,
            w: self.w,
            h: self.h,
            csv_key: self.csv_key,
            color: self.color,
            font_name: self.font,
            font_content: self.font_content,
            font_size: self.font_size,
            text_align,
            transform,
            avatar_gender,
        })
    }
}

/// Parse a JSON array of placeholder records.
///
/// A document that is not a JSON array is a [`ImprintError::Parse`]. Individual entries that fail
/// to deserialize or carry invalid geometry are logged and dropped; the rest are returned in
/// declaration order.
#[tracing::instrument(skip(json), fields(bytes = json.len()))]
pub fn parse_placeholders(json: &str) -> ImprintResult<Vec<Placeholder>> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| ImprintError::parse(format!("placeholders JSON: {e}")))?;

    let mut out = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        let parsed = PlaceholderWire::deserialize(entry)
            .map_err(|e| ImprintError::parse(e.to_string()))
            .and_then(PlaceholderWire::into_placeholder);
        match parsed {
            Ok(p) => out.push(p),
            Err(error) => {
                tracing::warn!(entry = i, %error, "dropping malformed placeholder");
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/model/placeholder.rs"]
mod tests;
