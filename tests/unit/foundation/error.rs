use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FramesmithError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FramesmithError::resource_load("x")
            .to_string()
            .contains("resource load error:")
    );
    assert!(
        FramesmithError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        FramesmithError::export("x")
            .to_string()
            .contains("export error:")
    );
    assert!(
        FramesmithError::export_disabled("x")
            .to_string()
            .contains("export disabled:")
    );
    assert!(
        FramesmithError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FramesmithError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
