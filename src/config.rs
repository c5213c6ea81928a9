//! JSON configuration for a [`crate::Studio`].
//!
//! ```json
//! {
//!   "assets_root": "public",
//!   "font_path": "fonts/Inter-Regular.ttf",
//!   "loader_threads": 2,
//!   "jpeg_quality": 92,
//!   "frames": [{ "id": "simple", "image_ref": "/frame-1.png", "display_name": "Simple" }],
//!   "initial": { "text": "Hello", "font_size_px": 24, "frame": "simple" }
//! }
//! ```
//!
//! Every field is optional.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{Frame, FrameCatalog};
use crate::encode::export::{DEFAULT_JPEG_QUALITY, validate_jpeg_quality};
use crate::foundation::color::Color;
use crate::foundation::core::Point;
use crate::foundation::error::{FramesmithError, FramesmithResult};
use crate::session::state::{CompositionState, OutputFormat, TextLayoutMode, validate_font_size};

/// Top-level studio configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Directory frame locators resolve against.
    pub assets_root: PathBuf,
    /// Font file for the text layer. `None` picks a system font.
    pub font_path: Option<PathBuf>,
    /// Frame catalog override. `None` uses the built-in catalog.
    pub frames: Option<Vec<Frame>>,
    /// Image loader worker threads.
    pub loader_threads: usize,
    /// JPEG export quality, `1..=100`.
    pub jpeg_quality: u8,
    /// Initial control values.
    pub initial: InitialState,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("."),
            font_path: None,
            frames: None,
            loader_threads: 2,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            initial: InitialState::default(),
        }
    }
}

impl StudioConfig {
    /// Parse configuration JSON from a reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> FramesmithResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| FramesmithError::serde(format!("parse studio config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse configuration JSON from a file on disk and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> FramesmithResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FramesmithError::validation(format!("open studio config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> FramesmithResult<()> {
        if self.loader_threads == 0 {
            return Err(FramesmithError::validation(
                "config 'loader_threads' must be >= 1",
            ));
        }
        validate_jpeg_quality(self.jpeg_quality).map_err(|e| {
            FramesmithError::validation(format!("config 'jpeg_quality': {e}"))
        })?;
        let catalog = self.catalog()?;
        if let Some(id) = &self.initial.frame
            && catalog.get(id).is_none()
        {
            return Err(FramesmithError::validation(format!(
                "config 'initial.frame' names unknown frame '{id}'"
            )));
        }
        self.initial.apply_to(CompositionState::default())?;
        Ok(())
    }

    /// The configured catalog, or the built-in one.
    pub fn catalog(&self) -> FramesmithResult<FrameCatalog> {
        match &self.frames {
            Some(frames) => FrameCatalog::new(frames.clone())
                .map_err(|e| FramesmithError::validation(format!("config 'frames': {e}"))),
            None => Ok(FrameCatalog::builtin()),
        }
    }
}

/// Optional overrides for the initial [`CompositionState`] and frame selection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InitialState {
    /// Initial text.
    pub text: Option<String>,
    /// Initial font size in pixels.
    pub font_size_px: Option<f32>,
    /// Initial text color.
    pub font_color: Option<Color>,
    /// Initial background color.
    pub background_color: Option<Color>,
    /// Initial text position as `[x, y]`.
    pub text_position: Option<[f64; 2]>,
    /// Initial export format.
    pub output_format: Option<OutputFormat>,
    /// Initial text placement.
    pub text_layout: Option<TextLayoutMode>,
    /// Frame selected at startup. `None` selects the catalog's first frame.
    pub frame: Option<String>,
}

impl InitialState {
    /// Overlay the configured values onto `state`.
    pub fn apply_to(&self, mut state: CompositionState) -> FramesmithResult<CompositionState> {
        if let Some(text) = &self.text {
            state.text = text.clone();
        }
        if let Some(px) = self.font_size_px {
            state.font_size_px = validate_font_size(px)
                .map_err(|e| FramesmithError::validation(format!("config 'initial.font_size_px': {e}")))?;
        }
        if let Some(c) = self.font_color {
            state.font_color = c;
        }
        if let Some(c) = self.background_color {
            state.background_color = c;
        }
        if let Some([x, y]) = self.text_position {
            if !x.is_finite() || !y.is_finite() {
                return Err(FramesmithError::validation(
                    "config 'initial.text_position' must be finite",
                ));
            }
            state.text_position = Point::new(x, y);
        }
        if let Some(f) = self.output_format {
            state.output_format = f;
        }
        if let Some(m) = self.text_layout {
            state.text_layout = m;
        }
        Ok(state)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
