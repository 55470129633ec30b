use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PicshadeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PicshadeError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        PicshadeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        PicshadeError::render("x")
            .to_string()
            .contains("render error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PicshadeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
