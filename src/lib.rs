//! Framesmith composes a text caption over a decorative frame image and exports the result.
//!
//! The public API is controller-oriented:
//!
//! - Pick a [`Frame`] from a [`FrameCatalog`]
//! - Drive a [`Studio`] with parameter edits; it loads frame images off-thread and redraws the
//!   [`Surface`] whenever an image is applied or a visual parameter changes
//! - Export the surface as `exported-image.png` / `exported-image.jpeg` into a [`DownloadSink`]
//!
//! The [`autocomplete`] module carries the address-suggestion collaborator that lives next to the
//! editor in the same product.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Frame image fetching, decoding and text shaping.
pub mod assets;
pub mod autocomplete;
/// Frame catalog.
pub mod catalog;
/// JSON configuration.
pub mod config;
pub mod encode;
/// Shared value types and errors.
pub mod foundation;
/// Canvas surface and layered compositor.
pub mod render;
/// Composition parameters and the interaction controller.
pub mod session;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{Affine, Dimensions, Point, Rect, Rgba8Premul};
pub use crate::foundation::error::{FramesmithError, FramesmithResult};

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::loader::{
    ImageLoader, LoadEvent, LoadTicket, LoadedImage, LoaderOpts, LoaderStats,
};
pub use crate::assets::source::{DirSource, ImageSource, MemorySource};
pub use crate::assets::text::FontFace;
pub use crate::catalog::{Frame, FrameCatalog};
pub use crate::config::{InitialState, StudioConfig};
pub use crate::encode::download::{DirectoryDownloads, DownloadSink, InMemoryDownloads};
pub use crate::encode::export::{
    DEFAULT_JPEG_QUALITY, EXPORT_BASENAME, ExportedFile, encode_surface, export_file_name,
};
pub use crate::render::compositor::{Compositor, Redraw};
pub use crate::render::surface::Surface;
pub use crate::session::state::{CompositionState, OutputFormat, TextLayoutMode, parse_font_size};
pub use crate::session::studio::{Notice, NoticeKind, Studio, StudioOpts};
