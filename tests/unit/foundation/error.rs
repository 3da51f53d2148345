use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FcpxError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FcpxError::unsupported_media(".xyz")
            .to_string()
            .contains("unsupported media:")
    );
    assert!(
        FcpxError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("disk full");
    let err = FcpxError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("disk full"));
}
