use std::fmt;

use crate::foundation::error::{ImprintError, ImprintResult};

pub use kurbo::{Point, Rect};

/// Zero-based, gapless index of one rendered artifact within a batch.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct ArtifactIndex(pub u64);

impl ArtifactIndex {
    /// The index that follows `self`.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ArtifactIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raster dimensions shared by the base image, every canvas and every artifact of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Largest edge the CPU rasterizer accepts.
    pub const MAX_EDGE: u32 = u16::MAX as u32;

    /// Validate and build canvas dimensions.
    pub fn new(width: u32, height: u32) -> ImprintResult<Self> {
        if width == 0 || height == 0 {
            return Err(ImprintError::validation("canvas must be at least 1x1"));
        }
        if width > Self::MAX_EDGE || height > Self::MAX_EDGE {
            return Err(ImprintError::validation(format!(
                "canvas {width}x{height} exceeds {} px per edge",
                Self::MAX_EDGE
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }

    /// The longer of the two edges.
    pub fn longest_edge(self) -> u32 {
        self.width.max(self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
