use super::*;

#[test]
fn parses_historical_field_names() {
    let json = r##"[
        {"id": 3, "startX": 10, "startY": 12.5, "w": 100, "h": 20, "csv_key": "name",
         "color": "#ff0000", "font": "Inter", "fontContent": "AAAA", "textAlign": "center",
         "fontSize": 18, "transform": "uppercase"}
    ]"##;

    let ps = parse_placeholders(json).unwrap();
    assert_eq!(ps.len(), 1);
    let p = &ps[0];
    assert_eq!(p.id, 3);
    assert_eq!((p.x, p.y, p.w, p.h), (10.0, 12.5, 100.0, 20.0));
    assert_eq!(p.csv_key, "name");
    assert_eq!(p.color, "#ff0000");
    assert_eq!(p.font_name, "Inter");
    assert_eq!(p.font_content, "AAAA");
    assert_eq!(p.font_size, 18.0);
    assert_eq!(p.text_align, TextAlign::Center);
    assert_eq!(p.transform, TransformKind::Uppercase);
    assert_eq!(p.avatar_gender, None);
    assert!(p.is_active());
    assert_eq!(p.bounds(), Rect::new(10.0, 12.5, 110.0, 32.5));
}

#[test]
fn missing_fields_default_and_empty_key_is_inactive() {
    let ps = parse_placeholders(r#"[{"id": 1, "w": 5, "h": 5}]"#).unwrap();
    assert_eq!(ps.len(), 1);
    assert!(!ps[0].is_active());
    assert_eq!(ps[0].text_align, TextAlign::Left);
    assert_eq!(ps[0].transform, TransformKind::None);
}

#[test]
fn unknown_enum_values_degrade_per_field() {
    let json = r#"[
        {"id": 1, "w": 5, "h": 5, "csv_key": "a", "textAlign": "justify", "transform": "sparkles",
         "avatarGender": "robot"},
        {"id": 2, "w": 5, "h": 5, "csv_key": "b", "transform": "initial-avatar",
         "avatarGender": "Female"}
    ]"#;
    let ps = parse_placeholders(json).unwrap();
    assert_eq!(ps.len(), 2);
    assert_eq!(ps[0].text_align, TextAlign::Left);
    assert_eq!(ps[0].transform, TransformKind::None);
    assert_eq!(ps[0].avatar_gender, None);
    assert_eq!(ps[1].transform, TransformKind::InitialAvatar);
    assert_eq!(ps[1].avatar_gender, Some(AvatarGender::Female));
}

#[test]
fn malformed_entries_are_dropped_not_fatal() {
    let json = r#"[
        {"id": 1, "w": 5, "h": 5, "csv_key": "a"},
        {"id": "not a number", "csv_key": "b"},
        {"id": 3, "w": -1, "h": 5, "csv_key": "c"},
        {"id": 4, "w": 5, "h": 5, "csv_key": "d"}
    ]"#;
    let ps = parse_placeholders(json).unwrap();
    let ids: Vec<i64> = ps.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 4]);
}

#[test]
fn non_array_document_is_a_parse_error() {
    assert!(matches!(
        parse_placeholders(r#"{"id": 1}"#),
        Err(ImprintError::Parse(_))
    ));
    assert!(matches!(
        parse_placeholders("not json"),
        Err(ImprintError::Parse(_))
    ));
}

#[test]
fn transform_names_round_trip_and_classify() {
    for kind in [
        TransformKind::None,
        TransformKind::Uppercase,
        TransformKind::QrCode,
        TransformKind::Avatar,
        TransformKind::InitialAvatar,
    ] {
        assert_eq!(TransformKind::parse(kind.as_str()), Some(kind));
    }
    assert!(!TransformKind::None.produces_image());
    assert!(!TransformKind::Uppercase.produces_image());
    assert!(TransformKind::QrCode.produces_image());
    assert!(TransformKind::Avatar.produces_image());
    assert!(TransformKind::InitialAvatar.produces_image());
}

#[test]
fn image_side_truncates_width() {
    let p = Placeholder::new(1, Rect::new(0.0, 0.0, 50.7, 10.0), "k");
    assert_eq!(p.image_side_px(), 50);
    let p = Placeholder::new(1, Rect::new(0.0, 0.0, 0.5, 10.0), "k");
    assert_eq!(p.image_side_px(), 0);
}
