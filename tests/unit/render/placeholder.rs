use super::*;
use crate::assets::decode::BaseImage;
use crate::assets::font::system_default_face_bytes;
use crate::foundation::core::{Canvas, Rect};
use crate::model::placeholder::{TextAlign, TransformKind};

fn white_canvas(w: u32, h: u32) -> RenderCanvas {
    let base = BaseImage::from_premul_rgba8(
        Canvas::new(w, h).unwrap(),
        [255u8, 255, 255, 255].repeat((w * h) as usize),
    )
    .unwrap();
    RenderCanvas::from_base(&base)
}

fn table() -> (ColumnIndex, DataRow) {
    (
        ColumnIndex::from_header(["name", "url"]),
        DataRow::new(["alice", "https://example.com"]),
    )
}

fn render(
    engine: &mut TextLayoutEngine,
    opts: &BatchOpts,
    canvas: &mut RenderCanvas,
    prepared: &PreparedPlaceholder,
) -> PlaceholderReport {
    let (columns, row) = table();
    PlaceholderRenderer::new(engine, opts).render(canvas, prepared, &columns, &row, ArtifactIndex(0))
}

#[test]
fn inactive_placeholder_draws_nothing() {
    let mut engine = TextLayoutEngine::new();
    let opts = BatchOpts::default();
    let p = Placeholder::new(1, Rect::new(0.0, 0.0, 10.0, 10.0), "");
    let prepared = PreparedPlaceholder::prepare(p, &mut engine, None, &opts);

    let mut canvas = white_canvas(20, 20);
    let report = render(&mut engine, &opts, &mut canvas, &prepared);
    assert_eq!(report.outcome, PlaceholderOutcome::Inactive);
    assert!(!report.degraded);
}

#[test]
fn missing_column_is_skipped_and_degraded() {
    let mut engine = TextLayoutEngine::new();
    let opts = BatchOpts::default();
    let p = Placeholder::new(1, Rect::new(0.0, 0.0, 10.0, 10.0), "email");
    let prepared = PreparedPlaceholder::prepare(p, &mut engine, None, &opts);

    let mut canvas = white_canvas(20, 20);
    let report = render(&mut engine, &opts, &mut canvas, &prepared);
    assert_eq!(report.outcome, PlaceholderOutcome::MissingColumn);
    assert!(report.degraded);
    let out = canvas.into_artifact(ArtifactIndex(0));
    assert!(out.rgba8.iter().all(|&b| b == 255));
}

#[test]
fn qrcode_draws_image_at_box_top_without_text() {
    let mut engine = TextLayoutEngine::new();
    let opts = BatchOpts::default();
    let p = Placeholder::new(2, Rect::new(10.0, 20.0, 60.0, 40.0), "url")
        .with_transform(TransformKind::QrCode);
    let prepared = PreparedPlaceholder::prepare(p, &mut engine, None, &opts);

    let mut canvas = white_canvas(100, 100);
    let report = render(&mut engine, &opts, &mut canvas, &prepared);
    assert_eq!(
        report.outcome,
        PlaceholderOutcome::Image {
            anchor: Point::new(10.0, 20.0),
            side: 50,
        }
    );
    assert!(!report.degraded);

    let out = canvas.into_artifact(ArtifactIndex(0));
    let dark: Vec<(u32, u32)> = (0..100)
        .flat_map(|y| (0..100).map(move |x| (x, y)))
        .filter(|&(x, y)| out.pixel(x, y) == Some([0, 0, 0, 255]))
        .collect();
    assert!(!dark.is_empty());
    assert!(dark.iter().all(|&(x, y)| (10..60).contains(&x) && (20..70).contains(&y)));
}

#[test]
fn right_aligned_image_wider_than_box_ends_at_right_edge() {
    let mut engine = TextLayoutEngine::new();
    let opts = BatchOpts::default();
    let side = crate::transform::qr::render_qr("https://example.com", 20)
        .unwrap()
        .width();
    assert!(side > 20);

    for (align, x) in [
        (TextAlign::Left, 40.0),
        (TextAlign::Center, 40.0 + (20.0 - f64::from(side)) / 2.0),
        (TextAlign::Right, 60.0 - f64::from(side)),
    ] {
        let p = Placeholder::new(3, Rect::new(40.0, 5.0, 60.0, 25.0), "url")
            .with_transform(TransformKind::QrCode)
            .with_align(align);
        let prepared = PreparedPlaceholder::prepare(p, &mut engine, None, &opts);

        let mut canvas = white_canvas(100, 100);
        let report = render(&mut engine, &opts, &mut canvas, &prepared);
        assert_eq!(
            report.outcome,
            PlaceholderOutcome::Image {
                anchor: Point::new(x, 5.0),
                side,
            },
            "{align:?}"
        );
    }
}

#[test]
fn image_larger_than_canvas_falls_back_to_text() {
    let mut engine = TextLayoutEngine::new();
    let opts = BatchOpts::default();
    let p = Placeholder::new(8, Rect::new(0.0, 0.0, 1.0e6, 10.0), "url")
        .with_transform(TransformKind::QrCode);
    let prepared = PreparedPlaceholder::prepare(p, &mut engine, None, &opts);

    let mut canvas = white_canvas(20, 20);
    let report = render(&mut engine, &opts, &mut canvas, &prepared);
    assert_eq!(report.outcome, PlaceholderOutcome::TextSkipped);
    assert!(report.degraded);
    let out = canvas.into_artifact(ArtifactIndex(0));
    assert!(out.rgba8.iter().all(|&b| b == 255));
}

#[test]
fn text_without_any_face_is_skipped() {
    let mut engine = TextLayoutEngine::new();
    let opts = BatchOpts::default();
    let p = Placeholder::new(4, Rect::new(0.0, 0.0, 10.0, 10.0), "name");
    let prepared = PreparedPlaceholder::prepare(p, &mut engine, None, &opts);

    let mut canvas = white_canvas(20, 20);
    let report = render(&mut engine, &opts, &mut canvas, &prepared);
    assert_eq!(report.outcome, PlaceholderOutcome::TextSkipped);
    assert!(report.degraded);
}

#[test]
fn bad_color_and_font_fall_back_to_defaults() {
    let mut engine = TextLayoutEngine::new();
    let opts = BatchOpts::default().with_default_color(Rgb::from_u8(1, 2, 3));
    let p = Placeholder::new(5, Rect::new(0.0, 0.0, 10.0, 10.0), "name")
        .with_color("#zzzzzz")
        .with_font("%%% not base64", -1.0);
    let prepared = PreparedPlaceholder::prepare(p, &mut engine, None, &opts);

    assert_eq!(prepared.color(), Rgb::from_u8(1, 2, 3));
    assert!(prepared.face().is_none());
    assert_eq!(prepared.size_px(), opts.default_font_size_px);
    assert!(prepared.style_degraded());
}

#[test]
fn uppercase_text_is_measured_and_anchored_if_face_present() {
    let Some(bytes) = system_default_face_bytes() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let opts = BatchOpts::default();
    let face = engine.load_face(bytes).unwrap();
    let p = Placeholder::new(6, Rect::new(10.0, 10.0, 110.0, 30.0), "name")
        .with_transform(TransformKind::Uppercase)
        .with_color("#ff0000")
        .with_font("", 16.0);
    let prepared = PreparedPlaceholder::prepare(p, &mut engine, Some(&face), &opts);

    let mut canvas = white_canvas(200, 100);
    let report = render(&mut engine, &opts, &mut canvas, &prepared);
    let PlaceholderOutcome::Text {
        text,
        anchor,
        extent,
        fallback,
    } = report.outcome
    else {
        panic!("expected text outcome");
    };
    assert_eq!(text, "ALICE");
    assert!(!fallback);
    assert_eq!(anchor.x, 10.0);
    assert!((anchor.y - (30.0 - extent.height * BASELINE)).abs() < 1e-9);
    assert!(!report.degraded);

    let out = canvas.into_artifact(ArtifactIndex(0));
    let reddish = out
        .rgba8
        .chunks_exact(4)
        .filter(|px| px[0] > 200 && px[1] < 100 && px[2] < 100)
        .count();
    assert!(reddish > 0);
}

const BASELINE: f64 = crate::layout::metrics::BASELINE_ADJUST;

#[test]
fn failed_initials_fall_back_to_text_if_face_present() {
    let Some(bytes) = system_default_face_bytes() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let opts = BatchOpts::default();
    let face = engine.load_face(bytes).unwrap();
    let p = Placeholder::new(7, Rect::new(0.0, 0.0, 0.5, 20.0), "name")
        .with_transform(TransformKind::InitialAvatar);
    let prepared = PreparedPlaceholder::prepare(p, &mut engine, Some(&face), &opts);

    let mut canvas = white_canvas(60, 30);
    let report = render(&mut engine, &opts, &mut canvas, &prepared);
    assert!(matches!(
        report.outcome,
        PlaceholderOutcome::Text { fallback: true, .. }
    ));
    assert!(report.degraded);
}

#[test]
fn text_baseline_sits_one_line_height_below_anchor_if_face_present() {
    let Some(bytes) = system_default_face_bytes() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let opts = BatchOpts::default();
    let face = engine.load_face(bytes).unwrap();
    let p = Placeholder::new(9, Rect::new(10.0, 20.0, 190.0, 80.0), "name")
        .with_transform(TransformKind::Uppercase)
        .with_color("#000000")
        .with_font("", 32.0);
    let prepared = PreparedPlaceholder::prepare(p, &mut engine, Some(&face), &opts);

    let mut canvas = white_canvas(200, 160);
    let report = render(&mut engine, &opts, &mut canvas, &prepared);
    let PlaceholderOutcome::Text { anchor, extent, .. } = report.outcome else {
        panic!("expected text outcome");
    };

    // "ALICE" has no descenders, so the lowest inked row is the baseline.
    let out = canvas.into_artifact(ArtifactIndex(0));
    let lowest_ink = (0..160u32)
        .rev()
        .find(|&y| (0..200u32).any(|x| out.pixel(x, y).is_some_and(|px| px[0] < 128)))
        .unwrap();
    let baseline = anchor.y + extent.height;
    assert!(
        (f64::from(lowest_ink) - baseline).abs() <= 2.0,
        "ink bottom {lowest_ink}, baseline {baseline}"
    );
}
