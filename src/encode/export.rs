use std::io::Cursor;

use image::ImageEncoder;

use crate::foundation::error::{FramesmithError, FramesmithResult};
use crate::render::surface::Surface;
use crate::session::state::OutputFormat;

/// Base name of every exported file.
pub const EXPORT_BASENAME: &str = "exported-image";

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// An encoded image ready to be handed to a [`crate::encode::download::DownloadSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedFile {
    /// File name, `exported-image.<ext>`.
    pub file_name: String,
    /// Format the bytes are encoded in.
    pub format: OutputFormat,
    /// Encoded bytes.
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// MIME type of [`ExportedFile::bytes`].
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }
}

/// File name used for a given format.
pub fn export_file_name(format: OutputFormat) -> String {
    format!("{EXPORT_BASENAME}.{}", format.extension())
}

/// Snapshot `surface` into an encoded raster.
///
/// PNG keeps the alpha channel. JPEG has none, so pixels are flattened over opaque black the
/// way a browser canvas does. Output is deterministic for identical surfaces.
pub fn encode_surface(
    surface: &Surface,
    format: OutputFormat,
    jpeg_quality: u8,
) -> FramesmithResult<ExportedFile> {
    let (w, h) = (surface.width(), surface.height());
    let mut out = Cursor::new(Vec::new());

    match format {
        OutputFormat::Png => {
            let rgba = surface.to_rgba8_straight();
            image::codecs::png::PngEncoder::new(&mut out)
                .write_image(&rgba, w, h, image::ExtendedColorType::Rgba8)
                .map_err(|e| FramesmithError::export(format!("encode png: {e}")))?;
        }
        OutputFormat::Jpeg => {
            let quality = validate_jpeg_quality(jpeg_quality)?;
            let rgb = flatten_premul_over_black(surface.data_premul());
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality)
                .write_image(&rgb, w, h, image::ExtendedColorType::Rgb8)
                .map_err(|e| FramesmithError::export(format!("encode jpeg: {e}")))?;
        }
    }

    Ok(ExportedFile {
        file_name: export_file_name(format),
        format,
        bytes: out.into_inner(),
    })
}

/// Reject JPEG qualities outside `1..=100`.
pub fn validate_jpeg_quality(q: u8) -> FramesmithResult<u8> {
    if !(1..=100).contains(&q) {
        return Err(FramesmithError::validation(format!(
            "jpeg quality must be in 1..=100, got {q}"
        )));
    }
    Ok(q)
}

// Premultiplied color over black is the premultiplied color itself.
fn flatten_premul_over_black(premul: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(premul.len() / 4 * 3);
    for px in premul.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }
    rgb
}

#[cfg(test)]
#[path = "../../tests/unit/encode/export.rs"]
mod tests;
