use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::{Dimensions, premultiply_rgba8_in_place};
use crate::foundation::error::{FramesmithError, FramesmithResult};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Natural pixel dimensions.
    pub dims: Dimensions,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes (PNG, JPEG, ...) and convert to premultiplied RGBA8.
///
/// Images with a zero edge or edges beyond the raster limit are rejected as load failures.
pub fn decode_image(bytes: &[u8]) -> FramesmithResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let dims = Dimensions::new(width, height)
        .map_err(|e| FramesmithError::resource_load(format!("unusable image size: {e}")))?;

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        dims,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
