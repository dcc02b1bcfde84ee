use super::*;
use crate::assets::font::system_default_face_bytes;

#[test]
fn initials_take_first_and_last_words() {
    assert_eq!(initials("ada lovelace"), "AL");
    assert_eq!(initials("  grace  brewster murray hopper "), "GH");
    assert_eq!(initials("plato"), "P");
    assert_eq!(initials("émile zola"), "ÉZ");
    assert_eq!(initials("   "), "");
}

#[test]
fn background_is_stable_and_from_palette() {
    let a = background_for("Ada Lovelace");
    assert_eq!(a, background_for("Ada Lovelace"));
    assert!(PALETTE.contains(&a));
}

#[test]
fn blank_content_is_a_transform_error_if_face_present() {
    let Some(bytes) = system_default_face_bytes() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let face = engine.load_face(bytes).unwrap();
    assert!(matches!(
        render_initial_avatar(&mut engine, &face, " ", 32),
        Err(ImprintError::Transform(_))
    ));
}

#[test]
fn renders_square_with_palette_corners_if_face_present() {
    let Some(bytes) = system_default_face_bytes() else {
        return;
    };
    let mut engine = TextLayoutEngine::new();
    let face = engine.load_face(bytes).unwrap();

    let img = render_initial_avatar(&mut engine, &face, "Ada Lovelace", 64).unwrap();
    assert_eq!(img.dimensions(), (64, 64));

    let [r, g, b] = background_for("Ada Lovelace");
    assert_eq!(img.get_pixel(0, 0).0, [r, g, b, 255]);
    // Some glyph coverage lands near the middle.
    let lit = img
        .pixels()
        .filter(|p| p.0[0] > 240 && p.0[1] > 240 && p.0[2] > 240)
        .count();
    assert!(lit > 0);
}
