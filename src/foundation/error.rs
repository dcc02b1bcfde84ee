/// Convenience result type used across imprint.
pub type ImprintResult<T> = Result<T, ImprintError>;

/// Top-level error taxonomy used by batch, placeholder and transform APIs.
///
/// `Decode` and `Parse` are batch-fatal when raised during setup. The remaining variants are
/// raised by placeholder-level steps and are normally logged and degraded by the caller.
#[derive(thiserror::Error, Debug)]
pub enum ImprintError {
    /// Raster or base64 payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Structured input (placeholder JSON, CSV header) could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Hex color string does not decode to exactly three bytes.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A placeholder's source column is absent from the header or the row.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Font bytes could not be decoded into a usable face.
    #[error("font error: {0}")]
    Font(String),

    /// A content transform (QR, avatar, initials) failed to produce an image.
    #[error("transform error: {0}")]
    Transform(String),

    /// Invalid user-provided configuration or geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// The output sink rejected an artifact.
    #[error("sink error: {0}")]
    Sink(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImprintError {
    /// Build a [`ImprintError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ImprintError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`ImprintError::InvalidColor`] value.
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }

    /// Build a [`ImprintError::MissingColumn`] value.
    pub fn missing_column(msg: impl Into<String>) -> Self {
        Self::MissingColumn(msg.into())
    }

    /// Build a [`ImprintError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`ImprintError::Transform`] value.
    pub fn transform(msg: impl Into<String>) -> Self {
        Self::Transform(msg.into())
    }

    /// Build a [`ImprintError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ImprintError::Sink`] value.
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    /// Whether this error must abort the whole batch when raised during setup.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Parse(_) | Self::Sink(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
