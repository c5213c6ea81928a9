use crate::foundation::core::{Dimensions, Rgba8Premul, unpremultiply_rgba8};

/// The owned raster the compositor draws into and the exporter reads from.
///
/// Pixels are premultiplied RGBA8, row-major, tightly packed.
pub struct Surface {
    dims: Dimensions,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface").field("dims", &self.dims).finish()
    }
}

impl Surface {
    /// Allocate a fully transparent surface.
    pub(crate) fn new(dims: Dimensions) -> Self {
        let (w, h) = dims.as_u16();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        clear_pixmap_to_transparent(&mut pixmap);
        Self { dims, pixmap }
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }

    /// Pixel dimensions.
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.dims.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.dims.height
    }

    /// Raw premultiplied RGBA8 bytes.
    pub fn data_premul(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel_premul(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        let i = ((y as usize) * (self.dims.width as usize) + (x as usize)) * 4;
        let px = self.data_premul().get(i..i + 4)?;
        Some(Rgba8Premul {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
    }

    /// Straight-alpha pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixel_premul(x, y).map(Rgba8Premul::to_straight_rgba)
    }

    /// Copy of the whole surface as straight-alpha RGBA8.
    pub fn to_rgba8_straight(&self) -> Vec<u8> {
        unpremultiply_rgba8(self.data_premul())
    }
}

pub(crate) fn clear_pixmap_to_transparent(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}
