//! Imprint renders personalized images in bulk.
//!
//! A batch combines one base image, an ordered list of [`Placeholder`] regions and a
//! [`DataTable`]. Every data row yields one [`RenderedArtifact`]: the base image with each
//! placeholder filled from that row, either as styled text or as a generated image (QR code,
//! synthetic avatar, initials avatar).
//!
//! - Build a [`BatchRenderer`] from encoded inputs with [`BatchRenderer::from_encoded`]
//! - Stream artifacts into an [`ArtifactSink`] such as [`PngDirSink`] or [`InMemorySink`]
//!
//! Setup failures (undecodable image, unparsable placeholders, missing CSV header) are returned
//! before any row renders. Everything after that degrades per placeholder and is reported through
//! `tracing`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod encode;
mod foundation;
mod layout;
mod model;
mod render;
mod transform;

pub use crate::foundation::core::{ArtifactIndex, Canvas, Point, Rect};
pub use crate::foundation::error::{ImprintError, ImprintResult};

pub use crate::assets::color::{Rgb, parse_hex_rgb, parse_hex_rgb_or};
pub use crate::assets::decode::{
    BaseImage, decode_base_image, decode_base_image_base64, decode_base64,
};
pub use crate::assets::font::{
    FontFace, TextBrushRgba8, TextLayoutEngine, system_default_face_bytes,
};
pub use crate::encode::sink::{
    ArtifactSink, InMemorySink, PngDirSink, SinkConfig, artifact_file_name,
};
pub use crate::layout::metrics::{
    BASELINE_ADJUST, TextExtent, line_box_origin, measure_layout, measure_text,
    resolve_image_anchor, resolve_text_anchor,
};
pub use crate::model::placeholder::{
    AvatarGender, Placeholder, TextAlign, TransformKind, parse_placeholders,
};
pub use crate::model::table::{ColumnIndex, DataRow, DataTable};
pub use crate::render::batch::{
    BatchOpts, BatchRenderer, BatchReport, BatchState, DEFAULT_FONT_SIZE_PX,
};
pub use crate::render::canvas::{RenderCanvas, RenderedArtifact};
pub use crate::render::placeholder::{
    PlaceholderOutcome, PlaceholderRenderer, PlaceholderReport, PreparedPlaceholder,
};
pub use crate::transform::avatar::{AVATAR_NATIVE_PX, AvatarOpts, render_avatar};
pub use crate::transform::initials::{background_for, initials, render_initial_avatar};
pub use crate::transform::qr::{QUIET_ZONE_MODULES, render_qr};
pub use crate::transform::{
    Drawable, TransformContext, TransformOutcome, apply_transform, apply_transform_or_text,
};
