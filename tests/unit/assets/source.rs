use super::*;

#[test]
fn locator_normalization() {
    assert_eq!(normalize_locator("/frame-1.png").unwrap(), "frame-1.png");
    assert_eq!(normalize_locator("frames/./a.png").unwrap(), "frames/a.png");
    assert_eq!(normalize_locator("frames\\b.png").unwrap(), "frames/b.png");
    assert!(normalize_locator("").is_err());
    assert!(normalize_locator("/").is_err());
    assert!(normalize_locator("/../etc/passwd").is_err());
}

#[test]
fn dir_source_reads_relative_to_root() {
    let root = std::env::temp_dir().join(format!("framesmith_dir_source_{}", std::process::id()));
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("frame-1.png"), b"bytes").unwrap();

    let src = DirSource::new(&root);
    assert_eq!(src.resolve("/frame-1.png").unwrap(), root.join("frame-1.png"));
    assert_eq!(src.fetch("/frame-1.png").unwrap(), b"bytes");

    let err = src.fetch("/missing.png").unwrap_err();
    assert!(matches!(err, FramesmithError::ResourceLoad(_)));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn memory_source_matches_normalized_locators() {
    let src = MemorySource::new().with("/a.png", vec![1, 2, 3]).unwrap();
    assert_eq!(src.fetch("a.png").unwrap(), vec![1, 2, 3]);
    assert_eq!(src.fetch("/a.png").unwrap(), vec![1, 2, 3]);
    assert!(matches!(
        src.fetch("/b.png").unwrap_err(),
        FramesmithError::ResourceLoad(_)
    ));
}
