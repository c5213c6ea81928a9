//! Export of the canvas surface.
//!
//! [`export::encode_surface`] snapshots the surface into PNG or JPEG bytes; a
//! [`download::DownloadSink`] hands the result to the host.

/// Save targets for exported files.
pub mod download;
/// Surface → encoded raster.
pub mod export;
