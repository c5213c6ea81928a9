/// Layered redraw of the canvas surface.
pub mod compositor;
/// The owned raster surface.
pub mod surface;
