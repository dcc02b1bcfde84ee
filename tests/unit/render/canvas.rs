use super::*;

fn solid_base(w: u32, h: u32, rgba: [u8; 4]) -> BaseImage {
    let mut bytes = rgba.repeat((w * h) as usize);
    premultiply_rgba8_in_place(&mut bytes);
    BaseImage::from_premul_rgba8(Canvas::new(w, h).unwrap(), bytes).unwrap()
}

#[test]
fn untouched_canvas_reproduces_base_pixels() {
    let base = solid_base(3, 2, [10, 20, 30, 255]);
    let artifact = RenderCanvas::from_base(&base).into_artifact(ArtifactIndex(4));
    assert_eq!(artifact.index, ArtifactIndex(4));
    assert_eq!((artifact.width, artifact.height), (3, 2));
    assert!(artifact.rgba8.chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
}

#[test]
fn canvases_do_not_share_pixels() {
    let base = solid_base(4, 4, [255, 255, 255, 255]);
    let mut a = RenderCanvas::from_base(&base);
    let b = RenderCanvas::from_base(&base);

    let black = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 255]));
    a.draw_image(&black, Point::new(0.0, 0.0)).unwrap();

    let a = a.into_artifact(ArtifactIndex(0));
    let b = b.into_artifact(ArtifactIndex(1));
    assert_eq!(a.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(b.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(base.rgba8_premul()[..4], [255, 255, 255, 255]);
}

#[test]
fn draw_image_truncates_fractional_offsets_and_clips() {
    let base = solid_base(4, 4, [255, 255, 255, 255]);
    let mut c = RenderCanvas::from_base(&base);
    let red = image::RgbaImage::from_pixel(3, 3, image::Rgba([255, 0, 0, 255]));
    c.draw_image(&red, Point::new(2.9, 1.2)).unwrap();

    let out = c.into_artifact(ArtifactIndex(0));
    assert_eq!(out.pixel(1, 1), Some([255, 255, 255, 255]));
    assert_eq!(out.pixel(2, 1), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(3, 3), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(2, 0), Some([255, 255, 255, 255]));
}

#[test]
fn png_encoding_round_trips_dimensions() {
    let base = solid_base(5, 3, [1, 2, 3, 255]);
    let artifact = RenderCanvas::from_base(&base).into_artifact(ArtifactIndex(0));
    let png = artifact.encode_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (5, 3));
    assert_eq!(decoded.get_pixel(4, 2).0, [1, 2, 3, 255]);
}

#[test]
fn pixel_outside_is_none() {
    let base = solid_base(1, 1, [0, 0, 0, 255]);
    let artifact = RenderCanvas::from_base(&base).into_artifact(ArtifactIndex(0));
    assert_eq!(artifact.pixel(1, 0), None);
}

#[test]
fn text_is_clipped_to_canvas_and_leaves_far_pixels_alone_if_face_present() {
    use crate::assets::font::{TextLayoutEngine, system_default_face_bytes};
    use crate::layout::metrics::measure_layout;

    let Some(bytes) = system_default_face_bytes() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let face = engine.load_face(bytes).unwrap();
    let black = TextBrushRgba8::from_rgba8([0, 0, 0, 255]);
    let layout = engine.layout_line("MMMM", &face, 20.0, black).unwrap();
    let extent = measure_layout(&layout);

    let base = solid_base(120, 80, [255, 255, 255, 255]);
    let mut c = RenderCanvas::from_base(&base);
    c.draw_text(&layout, &face, Point::new(100.0, 60.0), extent)
        .unwrap();
    c.draw_text(&layout, &face, Point::new(-500.0, -500.0), extent)
        .unwrap();
    c.draw_text(&layout, &face, Point::new(5000.0, 10.0), extent)
        .unwrap();

    let out = c.into_artifact(ArtifactIndex(0));
    let inked: Vec<(u32, u32)> = (0..80)
        .flat_map(|y| (0..120).map(move |x| (x, y)))
        .filter(|&(x, y)| out.pixel(x, y).is_some_and(|px| px[0] < 200))
        .collect();
    assert!(!inked.is_empty());
    assert!(inked.iter().all(|&(x, y)| x >= 99 && y >= 59));
}
