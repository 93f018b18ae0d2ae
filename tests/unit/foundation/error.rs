use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WarpmaskError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        WarpmaskError::unsupported_image("x")
            .to_string()
            .contains("unsupported image:")
    );
    assert!(
        WarpmaskError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        WarpmaskError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WarpmaskError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn user_message_mentions_rejection_reason() {
    let err = WarpmaskError::unsupported_image("file exceeds 5 MiB");
    assert!(err.user_message().contains("5 MiB"));
    let err = WarpmaskError::render("surface too large");
    assert!(!err.user_message().contains("surface"));
}
