use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{ArtifactIndex, Canvas};
use crate::foundation::error::{ImprintError, ImprintResult};
use crate::render::canvas::RenderedArtifact;

/// Configuration provided to an [`ArtifactSink`] before the first row is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Dimensions shared by every artifact of the batch.
    pub canvas: Canvas,
    /// Rows available in the tabular input (an upper bound on pushed artifacts).
    pub rows: usize,
}

/// Consumer of rendered artifacts.
///
/// Ordering contract: `push_artifact` is called with indices `0, 1, 2, ...` in order, without
/// gaps, between one `begin` and one `end`. Any error aborts the batch.
pub trait ArtifactSink {
    /// Called once before the first artifact.
    fn begin(&mut self, cfg: SinkConfig) -> ImprintResult<()>;
    /// Receive the next artifact.
    fn push_artifact(&mut self, artifact: &RenderedArtifact) -> ImprintResult<()>;
    /// Called once after the last artifact.
    fn end(&mut self) -> ImprintResult<()>;
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    /// Artifacts in index order.
    pub artifacts: Vec<RenderedArtifact>,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration received by the last `begin`.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }
}

impl ArtifactSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ImprintResult<()> {
        self.cfg = Some(cfg);
        self.artifacts.clear();
        Ok(())
    }

    fn push_artifact(&mut self, artifact: &RenderedArtifact) -> ImprintResult<()> {
        self.artifacts.push(artifact.clone());
        Ok(())
    }

    fn end(&mut self) -> ImprintResult<()> {
        Ok(())
    }
}

/// File name of the artifact at `index`.
pub fn artifact_file_name(index: ArtifactIndex) -> String {
    format!("out{index}.png")
}

/// Writes each artifact as `<dir>/out<N>.png`.
#[derive(Debug)]
pub struct PngDirSink {
    dir: PathBuf,
    next: ArtifactIndex,
    written: Vec<PathBuf>,
}

impl PngDirSink {
    /// Sink writing into `dir`; the directory is created on `begin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            next: ArtifactIndex(0),
            written: Vec::new(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in index order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ArtifactSink for PngDirSink {
    fn begin(&mut self, _cfg: SinkConfig) -> ImprintResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))
            .map_err(|e| ImprintError::sink(format!("{e:#}")))?;
        self.next = ArtifactIndex(0);
        self.written.clear();
        Ok(())
    }

    fn push_artifact(&mut self, artifact: &RenderedArtifact) -> ImprintResult<()> {
        if artifact.index != self.next {
            return Err(ImprintError::sink(format!(
                "expected artifact {} but got {}",
                self.next, artifact.index
            )));
        }
        let png = artifact.encode_png()?;
        let path = self.dir.join(artifact_file_name(artifact.index));
        std::fs::write(&path, png)
            .with_context(|| format!("write '{}'", path.display()))
            .map_err(|e| ImprintError::sink(format!("{e:#}")))?;
        self.written.push(path);
        self.next = self.next.next();
        Ok(())
    }

    fn end(&mut self) -> ImprintResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
