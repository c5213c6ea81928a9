use super::*;
use crate::encode::download::{DirectoryDownloads, DownloadSink, InMemoryDownloads};
use crate::foundation::core::Dimensions;

fn checker_surface(w: u32, h: u32) -> Surface {
    let mut s = Surface::new(Dimensions::new(w, h).unwrap());
    for (i, px) in s
        .pixmap_mut()
        .data_as_u8_slice_mut()
        .chunks_exact_mut(4)
        .enumerate()
    {
        let c = if i % 2 == 0 { [255, 255, 255, 255] } else { [0, 0, 128, 128] };
        px.copy_from_slice(&c);
    }
    s
}

#[test]
fn file_names_follow_format() {
    assert_eq!(export_file_name(OutputFormat::Png), "exported-image.png");
    assert_eq!(export_file_name(OutputFormat::Jpeg), "exported-image.jpeg");
}

#[test]
fn png_export_preserves_straight_pixels() {
    let s = checker_surface(4, 2);
    let out = encode_surface(&s, OutputFormat::Png, DEFAULT_JPEG_QUALITY).unwrap();
    assert_eq!(out.file_name, "exported-image.png");
    assert_eq!(out.mime(), "image/png");

    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (4, 2));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 255, 128]);
}

#[test]
fn jpeg_export_is_opaque_with_surface_dimensions() {
    let s = checker_surface(16, 8);
    let out = encode_surface(&s, OutputFormat::Jpeg, 90).unwrap();
    assert_eq!(out.file_name, "exported-image.jpeg");
    assert_eq!(out.mime(), "image/jpeg");
    assert_eq!(&out.bytes[..2], &[0xFF, 0xD8]);

    let decoded = image::load_from_memory(&out.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (16, 8));
    assert!(!decoded.color().has_alpha());
}

#[test]
fn exports_are_deterministic() {
    let s = checker_surface(8, 8);
    for format in [OutputFormat::Png, OutputFormat::Jpeg] {
        let a = encode_surface(&s, format, DEFAULT_JPEG_QUALITY).unwrap();
        let b = encode_surface(&s, format, DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn jpeg_quality_bounds() {
    let s = checker_surface(2, 2);
    assert!(encode_surface(&s, OutputFormat::Jpeg, 0).is_err());
    assert!(encode_surface(&s, OutputFormat::Jpeg, 101).is_err());
    assert!(validate_jpeg_quality(1).is_ok());
    assert!(validate_jpeg_quality(100).is_ok());
    // Quality is irrelevant for PNG.
    assert!(encode_surface(&s, OutputFormat::Png, 0).is_ok());
}

#[test]
fn download_sinks_receive_exports() {
    let s = checker_surface(2, 2);
    let file = encode_surface(&s, OutputFormat::Png, DEFAULT_JPEG_QUALITY).unwrap();

    let mut mem = InMemoryDownloads::new();
    mem.save(&file).unwrap();
    assert_eq!(mem.files(), std::slice::from_ref(&file));

    let dir = std::env::temp_dir().join(format!("framesmith_downloads_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let mut disk = DirectoryDownloads::new(&dir);
    disk.save(&file).unwrap();
    let path = disk.last_saved().unwrap().to_path_buf();
    assert_eq!(path, dir.join("exported-image.png"));
    assert_eq!(std::fs::read(&path).unwrap(), file.bytes);
    let _ = std::fs::remove_dir_all(&dir);
}
