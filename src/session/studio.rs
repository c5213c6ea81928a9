use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::assets::loader::{ImageLoader, LoadEvent, LoaderOpts, LoaderStats};
use crate::assets::source::{DirSource, ImageSource};
use crate::assets::text::FontFace;
use crate::catalog::{Frame, FrameCatalog};
use crate::config::StudioConfig;
use crate::encode::download::DownloadSink;
use crate::encode::export::{DEFAULT_JPEG_QUALITY, ExportedFile, encode_surface, validate_jpeg_quality};
use crate::foundation::color::Color;
use crate::foundation::core::Point;
use crate::foundation::error::{FramesmithError, FramesmithResult};
use crate::render::compositor::{Compositor, Redraw};
use crate::render::surface::Surface;
use crate::session::state::{
    CompositionState, OutputFormat, TextLayoutMode, parse_font_size, validate_font_size,
};

/// Category of a user-facing notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    /// A frame image could not be loaded; the previous canvas is kept.
    ResourceLoadFailed,
    /// A control value was rejected and the last good value kept.
    InvalidInput,
    /// Text could not be drawn (no font available).
    TextUnavailable,
    /// A redraw failed; the previous canvas is kept.
    RenderFailed,
}

/// Non-blocking message for the user surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Category.
    pub kind: NoticeKind,
    /// Human-readable message.
    pub message: String,
}

/// Studio tuning knobs.
#[derive(Clone, Copy, Debug)]
pub struct StudioOpts {
    /// Image loader settings.
    pub loader: LoaderOpts,
    /// Quality for JPEG exports, `1..=100`.
    pub jpeg_quality: u8,
}

impl Default for StudioOpts {
    fn default() -> Self {
        Self {
            loader: LoaderOpts::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Interaction controller: owns the composition state, the frame selection, the loader, and
/// the compositor, and keeps the canvas in sync with every change.
///
/// All mutation goes through `&mut self`; only image decoding runs elsewhere.
pub struct Studio {
    catalog: FrameCatalog,
    loader: ImageLoader,
    compositor: Compositor,
    state: CompositionState,
    selected: Option<String>,
    jpeg_quality: u8,
    notices: Vec<Notice>,
}

impl Studio {
    /// Assemble a studio from its parts. No frame is selected yet.
    pub fn new(
        catalog: FrameCatalog,
        source: Arc<dyn ImageSource>,
        font: Option<FontFace>,
        opts: StudioOpts,
    ) -> FramesmithResult<Self> {
        let jpeg_quality = validate_jpeg_quality(opts.jpeg_quality)?;
        let loader = ImageLoader::new(source, opts.loader)?;
        let compositor = Compositor::new(font.as_ref())?;
        if !compositor.has_font() {
            tracing::warn!("no font available; text will not be rendered");
        }
        Ok(Self {
            catalog,
            loader,
            compositor,
            state: CompositionState::default(),
            selected: None,
            jpeg_quality,
            notices: Vec::new(),
        })
    }

    /// Build a studio from configuration, apply its initial state, and select its initial
    /// frame (or the catalog's first).
    ///
    /// Relative paths in the config resolve against `base_dir`.
    pub fn from_config(config: &StudioConfig, base_dir: impl AsRef<Path>) -> FramesmithResult<Self> {
        let base_dir = base_dir.as_ref();
        let catalog = config.catalog()?;
        let source = Arc::new(DirSource::new(base_dir.join(&config.assets_root)));
        let font = match &config.font_path {
            Some(p) => Some(FontFace::from_path(base_dir.join(p))?),
            None => FontFace::system_default(),
        };
        let opts = StudioOpts {
            loader: LoaderOpts {
                threads: config.loader_threads,
            },
            jpeg_quality: config.jpeg_quality,
        };

        let mut studio = Self::new(catalog, source, font, opts)?;
        studio.state = config.initial.apply_to(CompositionState::default())?;
        let frame_id = match &config.initial.frame {
            Some(id) => id.clone(),
            None => studio.catalog.first().id.clone(),
        };
        studio.select_frame(&frame_id)?;
        Ok(studio)
    }

    /// Current composition state.
    pub fn state(&self) -> &CompositionState {
        &self.state
    }

    /// Frame catalog.
    pub fn catalog(&self) -> &FrameCatalog {
        &self.catalog
    }

    /// Most recently selected frame (its image may still be loading).
    pub fn selected_frame(&self) -> Option<&Frame> {
        self.selected.as_deref().and_then(|id| self.catalog.get(id))
    }

    /// Id of the frame whose image is on the canvas.
    pub fn applied_frame_id(&self) -> Option<&str> {
        self.compositor.frame_id()
    }

    /// The canvas surface, once a frame image has been applied.
    pub fn surface(&self) -> Option<&Surface> {
        self.compositor.surface()
    }

    /// Whether a frame image load is in flight.
    pub fn is_loading(&self) -> bool {
        self.loader.is_pending()
    }

    /// Loader counters.
    pub fn loader_stats(&self) -> LoaderStats {
        self.loader.stats()
    }

    /// Drain pending user notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.state.text == text {
            return;
        }
        self.state.text = text;
        self.refresh();
    }

    /// Set the font size from raw control input; invalid input keeps the current size.
    pub fn set_font_size(&mut self, input: &str) {
        match parse_font_size(input) {
            Ok(v) => self.apply_font_size(v),
            Err(e) => self.reject_input(e),
        }
    }

    /// Set the font size in pixels; non-finite or non-positive values keep the current size.
    pub fn set_font_size_px(&mut self, px: f32) {
        match validate_font_size(px) {
            Ok(v) => self.apply_font_size(v),
            Err(e) => self.reject_input(e),
        }
    }

    /// Set the text color from a hex string; invalid input keeps the current color.
    pub fn set_font_color(&mut self, input: &str) {
        match Color::parse_hex(input) {
            Ok(c) => self.set_font_color_value(c),
            Err(e) => self.reject_input(e),
        }
    }

    /// Set the text color.
    pub fn set_font_color_value(&mut self, color: Color) {
        if self.state.font_color == color {
            return;
        }
        self.state.font_color = color;
        self.refresh();
    }

    /// Set the background color from a hex string; invalid input keeps the current color.
    pub fn set_background_color(&mut self, input: &str) {
        match Color::parse_hex(input) {
            Ok(c) => self.set_background_color_value(c),
            Err(e) => self.reject_input(e),
        }
    }

    /// Set the background color.
    pub fn set_background_color_value(&mut self, color: Color) {
        if self.state.background_color == color {
            return;
        }
        self.state.background_color = color;
        self.refresh();
    }

    /// Move the text block's top-left corner.
    pub fn set_text_position(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            self.reject_input(FramesmithError::validation(format!(
                "text position must be finite, got ({x}, {y})"
            )));
            return;
        }
        let p = Point::new(x, y);
        if self.state.text_position == p {
            return;
        }
        self.state.text_position = p;
        self.refresh();
    }

    /// Switch text placement mode.
    pub fn set_text_layout(&mut self, mode: TextLayoutMode) {
        if self.state.text_layout == mode {
            return;
        }
        self.state.text_layout = mode;
        self.refresh();
    }

    /// Choose the export format. Does not redraw.
    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.state.output_format = format;
    }

    /// Select a frame by id and start loading its image.
    ///
    /// Unknown ids are rejected and leave the selection untouched.
    #[tracing::instrument(skip(self))]
    pub fn select_frame(&mut self, id: &str) -> FramesmithResult<()> {
        let frame = self
            .catalog
            .get(id)
            .ok_or_else(|| FramesmithError::validation(format!("unknown frame id '{id}'")))?;
        let ticket = self.loader.request(&frame.id, &frame.image_ref);
        tracing::info!(frame = %frame.id, image_ref = %frame.image_ref, ?ticket, "frame selected");
        self.selected = Some(frame.id.clone());
        Ok(())
    }

    /// Apply a finished frame load, if any, without blocking.
    ///
    /// Returns `true` when a new frame image was put on the canvas.
    pub fn pump(&mut self) -> bool {
        match self.loader.poll() {
            Some(ev) => self.on_load_event(ev),
            None => false,
        }
    }

    /// Block until the selected frame's load resolves (or `timeout` elapses) and apply it.
    ///
    /// Returns `true` when a new frame image was put on the canvas.
    pub fn wait_for_frame(&mut self, timeout: Duration) -> bool {
        match self.loader.wait(timeout) {
            Some(ev) => self.on_load_event(ev),
            None => false,
        }
    }

    /// Whether the export control is enabled: text is non-empty and the canvas exists.
    pub fn can_export(&self) -> bool {
        !self.state.text.is_empty() && self.compositor.surface().is_some()
    }

    /// Encode the canvas in the selected format and hand it to `sink`.
    #[tracing::instrument(skip_all, fields(format = %self.state.output_format))]
    pub fn export(&mut self, sink: &mut dyn DownloadSink) -> FramesmithResult<ExportedFile> {
        if self.state.text.is_empty() {
            return Err(FramesmithError::export_disabled("text is empty"));
        }
        let surface = self
            .compositor
            .surface()
            .ok_or_else(|| FramesmithError::export_disabled("no frame image loaded yet"))?;
        let file = encode_surface(surface, self.state.output_format, self.jpeg_quality)?;
        sink.save(&file)?;
        Ok(file)
    }

    fn apply_font_size(&mut self, v: f32) {
        if self.state.font_size_px == v {
            return;
        }
        self.state.font_size_px = v;
        self.refresh();
    }

    fn reject_input(&mut self, err: FramesmithError) {
        tracing::warn!(error = %err, "ignoring invalid input");
        self.notices.push(Notice {
            kind: NoticeKind::InvalidInput,
            message: err.to_string(),
        });
    }

    fn refresh(&mut self) {
        let result = self.compositor.redraw(&self.state);
        self.note_redraw(result);
    }

    fn on_load_event(&mut self, ev: LoadEvent) -> bool {
        match ev {
            LoadEvent::Ready(loaded) => {
                let result = self.compositor.apply_image(&loaded, &self.state);
                let applied = result.is_ok();
                self.note_redraw(result);
                if applied {
                    tracing::info!(frame = %loaded.frame_id, "frame image applied");
                }
                applied
            }
            LoadEvent::Failed {
                frame_id, error, ..
            } => {
                tracing::warn!(frame = %frame_id, error = %error, "frame image failed to load");
                self.notices.push(Notice {
                    kind: NoticeKind::ResourceLoadFailed,
                    message: format!("could not load frame '{frame_id}': {error}"),
                });
                false
            }
        }
    }

    fn note_redraw(&mut self, result: FramesmithResult<Redraw>) {
        match result {
            Ok(Redraw::DrawnWithoutText) => {
                let already = self
                    .notices
                    .iter()
                    .any(|n| n.kind == NoticeKind::TextUnavailable);
                if !already {
                    self.notices.push(Notice {
                        kind: NoticeKind::TextUnavailable,
                        message: "no font available; text is not drawn".to_owned(),
                    });
                }
            }
            Ok(Redraw::Drawn | Redraw::NoImage) => {}
            Err(e) => {
                tracing::warn!(error = %e, "redraw failed; keeping previous canvas");
                self.notices.push(Notice {
                    kind: NoticeKind::RenderFailed,
                    message: e.to_string(),
                });
            }
        }
    }
}
