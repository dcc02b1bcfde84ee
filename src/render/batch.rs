use crate::assets::color::Rgb;
use crate::assets::decode::{BaseImage, decode_base_image};
use crate::assets::font::{FontFace, TextLayoutEngine, system_default_face_bytes};
use crate::encode::sink::{ArtifactSink, SinkConfig};
use crate::foundation::core::ArtifactIndex;
use crate::foundation::error::{ImprintError, ImprintResult};
use crate::layout::metrics::BASELINE_ADJUST;
use crate::model::placeholder::{AvatarGender, Placeholder, parse_placeholders};
use crate::model::table::DataTable;
use crate::render::canvas::{RenderCanvas, RenderedArtifact};
use crate::render::placeholder::{PlaceholderRenderer, PreparedPlaceholder};
use crate::transform::avatar::AvatarOpts;

/// Font size used when a placeholder does not set one.
pub const DEFAULT_FONT_SIZE_PX: f32 = 13.0;

/// Batch-wide rendering options.
#[derive(Clone, Debug)]
pub struct BatchOpts {
    /// Avatar generation settings.
    pub avatar: AvatarOpts,
    /// Fraction of the text height lifted off the placeholder's bottom edge.
    pub baseline_adjust: f64,
    /// Font size for placeholders without a positive `fontSize`.
    pub default_font_size_px: f32,
    /// Fill used when a placeholder's color does not parse.
    pub default_color: Rgb,
    /// Default face bytes. `None` looks up a system sans-serif face.
    pub default_font: Option<Vec<u8>>,
}

impl Default for BatchOpts {
    fn default() -> Self {
        Self {
            avatar: AvatarOpts::default(),
            baseline_adjust: BASELINE_ADJUST,
            default_font_size_px: DEFAULT_FONT_SIZE_PX,
            default_color: Rgb::BLACK,
            default_font: None,
        }
    }
}

impl BatchOpts {
    /// Set the batch-wide avatar gender.
    pub fn with_avatar_gender(mut self, gender: AvatarGender) -> Self {
        self.avatar.gender = gender;
        self
    }

    /// Make avatars reproducible from `seed`.
    pub fn with_avatar_seed(mut self, seed: u64) -> Self {
        self.avatar.seed = Some(seed);
        self
    }

    /// Override the baseline heuristic.
    pub fn with_baseline_adjust(mut self, baseline_adjust: f64) -> Self {
        self.baseline_adjust = baseline_adjust;
        self
    }

    /// Override the fallback font size.
    pub fn with_default_font_size_px(mut self, size_px: f32) -> Self {
        self.default_font_size_px = size_px;
        self
    }

    /// Override the fallback fill.
    pub fn with_default_color(mut self, color: Rgb) -> Self {
        self.default_color = color;
        self
    }

    /// Use `bytes` as the default face instead of a system font.
    pub fn with_default_font(mut self, bytes: Vec<u8>) -> Self {
        self.default_font = Some(bytes);
        self
    }

    fn validate(&self) -> ImprintResult<()> {
        if !self.baseline_adjust.is_finite() {
            return Err(ImprintError::validation("baseline_adjust must be finite"));
        }
        if !self.default_font_size_px.is_finite() || self.default_font_size_px <= 0.0 {
            return Err(ImprintError::validation(
                "default_font_size_px must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Lifecycle of a [`BatchRenderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchState {
    /// Ready to run.
    Idle,
    /// Rendering rows.
    Running,
}

/// Summary of one completed batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Artifacts pushed to the sink.
    pub artifacts: u64,
    /// (placeholder, row) pairs that fell back to a default or drew nothing.
    pub degraded_placeholders: u64,
    /// Malformed input rows skipped while reading the table.
    pub skipped_rows: u64,
}

/// Renders one artifact per data row.
///
/// Setup decodes and parses every input up front; any failure there is returned before a single
/// row is rendered. Rows are then rendered strictly in order, each onto its own copy of the base
/// image.
pub struct BatchRenderer {
    base: BaseImage,
    placeholders: Vec<PreparedPlaceholder>,
    table: DataTable,
    opts: BatchOpts,
    engine: TextLayoutEngine,
    state: BatchState,
}

impl BatchRenderer {
    /// Build a renderer from already decoded inputs.
    pub fn new(
        base: BaseImage,
        placeholders: Vec<Placeholder>,
        table: DataTable,
        opts: BatchOpts,
    ) -> ImprintResult<Self> {
        opts.validate()?;

        let mut engine = TextLayoutEngine::new();
        let default_face = resolve_default_face(&mut engine, &opts);
        let placeholders = placeholders
            .into_iter()
            .map(|p| PreparedPlaceholder::prepare(p, &mut engine, default_face.as_ref(), &opts))
            .collect();

        Ok(Self {
            base,
            placeholders,
            table,
            opts,
            engine,
            state: BatchState::Idle,
        })
    }

    /// Decode the base image, parse the placeholders and read the CSV, in that order.
    #[tracing::instrument(skip_all, fields(image_bytes = image.len()))]
    pub fn from_encoded(
        image: &[u8],
        placeholders_json: &str,
        csv_text: &str,
        opts: BatchOpts,
    ) -> ImprintResult<Self> {
        let base = decode_base_image(image)?;
        let placeholders = parse_placeholders(placeholders_json)?;
        let table = DataTable::from_csv_str(csv_text)?;
        Self::new(base, placeholders, table, opts)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Placeholders with their resolved style, in declaration order.
    pub fn placeholders(&self) -> &[PreparedPlaceholder] {
        &self.placeholders
    }

    /// Data rows that will be rendered.
    pub fn table(&self) -> &DataTable {
        &self.table
    }

    /// Render every row into `sink`.
    ///
    /// Artifact indices start at zero and are gapless. Only sink failures abort the run.
    pub fn run(&mut self, sink: &mut dyn ArtifactSink) -> ImprintResult<BatchReport> {
        self.state = BatchState::Running;
        let result = self.run_rows(sink);
        self.state = BatchState::Idle;
        result
    }

    fn run_rows(&mut self, sink: &mut dyn ArtifactSink) -> ImprintResult<BatchReport> {
        tracing::info!(
            width = self.base.width(),
            height = self.base.height(),
            placeholders = self.placeholders.len(),
            rows = self.table.rows().len(),
            "batch started"
        );

        sink.begin(SinkConfig {
            canvas: self.base.canvas(),
            rows: self.table.rows().len(),
        })?;

        let mut report = BatchReport {
            skipped_rows: self.table.skipped_rows(),
            ..BatchReport::default()
        };
        let mut index = ArtifactIndex(0);
        for row_pos in 0..self.table.rows().len() {
            let (artifact, degraded) = self.render_row(row_pos, index);
            sink.push_artifact(&artifact)?;
            tracing::debug!(row = index.0, degraded, "row rendered");

            report.artifacts += 1;
            report.degraded_placeholders += degraded;
            index = index.next();
        }

        sink.end()?;
        tracing::info!(
            artifacts = report.artifacts,
            degraded = report.degraded_placeholders,
            skipped_rows = report.skipped_rows,
            "batch finished"
        );
        Ok(report)
    }

    fn render_row(&mut self, row_pos: usize, index: ArtifactIndex) -> (RenderedArtifact, u64) {
        let mut canvas = RenderCanvas::from_base(&self.base);
        let mut renderer = PlaceholderRenderer::new(&mut self.engine, &self.opts);
        let columns = self.table.columns();
        let row = &self.table.rows()[row_pos];

        let mut degraded = 0u64;
        for prepared in &self.placeholders {
            let report = renderer.render(&mut canvas, prepared, columns, row, index);
            degraded += u64::from(report.degraded);
        }
        (canvas.into_artifact(index), degraded)
    }
}

fn resolve_default_face(engine: &mut TextLayoutEngine, opts: &BatchOpts) -> Option<FontFace> {
    let bytes = match &opts.default_font {
        Some(bytes) => bytes.clone(),
        None => match system_default_face_bytes() {
            Some(bytes) => bytes,
            None => {
                tracing::warn!("no system font found, text without fontContent is skipped");
                return None;
            }
        },
    };
    match engine.load_face(bytes) {
        Ok(face) => {
            tracing::debug!(family = face.family(), "default face resolved");
            Some(face)
        }
        Err(error) => {
            tracing::warn!(%error, "default face unusable");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/batch.rs"]
mod tests;
