use super::*;

#[test]
fn parses_with_and_without_hash() {
    assert_eq!(parse_hex_rgb("#ff0000").unwrap(), Rgb::new(1.0, 0.0, 0.0));
    assert_eq!(parse_hex_rgb("00FF00").unwrap(), Rgb::new(0.0, 1.0, 0.0));

    let c = parse_hex_rgb("#336699").unwrap();
    assert!((c.r - 0x33 as f64 / 255.0).abs() < 1e-12);
    assert!((c.g - 0x66 as f64 / 255.0).abs() < 1e-12);
    assert!((c.b - 0x99 as f64 / 255.0).abs() < 1e-12);
}

#[test]
fn every_channel_is_normalized() {
    for s in ["#000000", "#ffffff", "#7f7f7f", "#0a1B2c", "fedcba"] {
        let c = parse_hex_rgb(s).unwrap();
        for v in [c.r, c.g, c.b] {
            assert!((0.0..=1.0).contains(&v), "{s}: {v}");
        }
    }
}

#[test]
fn malformed_input_is_invalid_color() {
    for s in [
        "", "#", "#fff", "#ff00", "#ff00000", "#ff000000", "#gg0000", "zzzzzz", "#ÿÿÿ", "##ff0000",
    ] {
        let err = parse_hex_rgb(s).unwrap_err();
        assert!(matches!(err, ImprintError::InvalidColor(_)), "{s}: {err}");
    }
}

#[test]
fn fallback_is_explicit() {
    let (c, err) = parse_hex_rgb_or("nope", Rgb::BLACK);
    assert_eq!(c, Rgb::BLACK);
    assert!(err.is_some());

    let (c, err) = parse_hex_rgb_or("#ffffff", Rgb::BLACK);
    assert_eq!(c.to_rgba8(), [255, 255, 255, 255]);
    assert!(err.is_none());
}
