use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ImprintError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(ImprintError::parse("x").to_string().contains("parse error:"));
    assert!(
        ImprintError::invalid_color("x")
            .to_string()
            .contains("invalid color:")
    );
    assert!(
        ImprintError::missing_column("x")
            .to_string()
            .contains("missing column:")
    );
    assert!(ImprintError::font("x").to_string().contains("font error:"));
    assert!(
        ImprintError::transform("x")
            .to_string()
            .contains("transform error:")
    );
    assert!(
        ImprintError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ImprintError::sink("x").to_string().contains("sink error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ImprintError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_setup_errors_are_batch_fatal() {
    assert!(ImprintError::decode("x").is_batch_fatal());
    assert!(ImprintError::parse("x").is_batch_fatal());
    assert!(ImprintError::sink("x").is_batch_fatal());
    assert!(!ImprintError::missing_column("x").is_batch_fatal());
    assert!(!ImprintError::invalid_color("x").is_batch_fatal());
    assert!(!ImprintError::font("x").is_batch_fatal());
    assert!(!ImprintError::transform("x").is_batch_fatal());
}
