//! Content transforms: what a placeholder draws for a row's value.

pub(crate) mod avatar;
pub(crate) mod initials;
pub(crate) mod qr;

use crate::assets::font::{FontFace, TextLayoutEngine};
use crate::foundation::error::{ImprintError, ImprintResult};
use crate::model::placeholder::{AvatarGender, TransformKind};

/// What a placeholder ends up drawing for one row.
#[derive(Clone, Debug, PartialEq)]
pub enum Drawable {
    /// Styled text, measured and anchored by the text layout rules.
    Text(String),
    /// A straight-alpha square image that replaces text drawing.
    Image(image::RgbaImage),
}

impl Drawable {
    /// Whether this drawable replaces text.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }
}

/// Inputs a transform may need beyond the row value.
pub struct TransformContext<'a> {
    /// Engine used to lay out initials.
    pub engine: &'a mut TextLayoutEngine,
    /// Face used for initials; `None` when no face could be resolved.
    pub face: Option<&'a FontFace>,
    /// Gender for synthetic avatars.
    pub avatar_gender: AvatarGender,
    /// Seed for synthetic avatars; `None` uses fresh entropy.
    pub avatar_seed: Option<u64>,
    /// Largest side an image transform may generate.
    pub max_side_px: u32,
}

/// Apply `kind` to `content`. Generated images are `side_px` square.
///
/// Image transforms fail when `side_px` exceeds `cx.max_side_px`.
pub fn apply_transform(
    kind: TransformKind,
    content: &str,
    side_px: u32,
    cx: &mut TransformContext<'_>,
) -> ImprintResult<Drawable> {
    if kind.produces_image() && side_px > cx.max_side_px {
        return Err(ImprintError::transform(format!(
            "{}: side {side_px} px exceeds limit of {} px",
            kind.as_str(),
            cx.max_side_px
        )));
    }

    match kind {
        TransformKind::None => Ok(Drawable::Text(content.to_string())),
        TransformKind::Uppercase => Ok(Drawable::Text(content.to_uppercase())),
        TransformKind::QrCode => qr::render_qr(content, side_px).map(Drawable::Image),
        TransformKind::Avatar => {
            avatar::render_avatar(cx.avatar_gender, cx.avatar_seed, side_px).map(Drawable::Image)
        }
        TransformKind::InitialAvatar => {
            let face = cx
                .face
                .ok_or_else(|| ImprintError::transform("initial-avatar: no font face"))?;
            initials::render_initial_avatar(cx.engine, face, content, side_px)
                .map(Drawable::Image)
        }
    }
}

/// Result of [`apply_transform_or_text`].
#[derive(Debug)]
pub struct TransformOutcome {
    /// What to draw.
    pub drawable: Drawable,
    /// The failure that forced the plain-text fallback, if any.
    pub fallback: Option<ImprintError>,
}

/// Apply `kind`, falling back to drawing `content` as plain text when the transform fails.
pub fn apply_transform_or_text(
    kind: TransformKind,
    content: &str,
    side_px: u32,
    cx: &mut TransformContext<'_>,
) -> TransformOutcome {
    match apply_transform(kind, content, side_px, cx) {
        Ok(drawable) => TransformOutcome {
            drawable,
            fallback: None,
        },
        Err(error) => TransformOutcome {
            drawable: Drawable::Text(content.to_string()),
            fallback: Some(error),
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/mod.rs"]
mod tests;
