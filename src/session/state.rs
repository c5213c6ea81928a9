use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::color::Color;
use crate::foundation::core::Point;
use crate::foundation::error::{FramesmithError, FramesmithResult};

/// Raster format of an exported image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless PNG with alpha.
    #[default]
    Png,
    /// Lossy JPEG, flattened over black.
    Jpeg,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FramesmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(FramesmithError::validation(format!(
                "unsupported output format '{other}' (expected png or jpeg)"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// How the text block is placed on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextLayoutMode {
    /// Single unwrapped block whose top-left corner sits at `text_position`.
    #[default]
    Anchored,
    /// Lines wrapped at 90% of the surface width, centered both ways. `text_position` is ignored.
    CenteredWrap,
}

impl FromStr for TextLayoutMode {
    type Err = FramesmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "anchored" => Ok(Self::Anchored),
            "centered_wrap" | "centered" => Ok(Self::CenteredWrap),
            other => Err(FramesmithError::validation(format!(
                "unsupported text layout '{other}' (expected anchored or centered-wrap)"
            ))),
        }
    }
}

/// User-controlled rendering parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositionState {
    /// Text drawn over the background.
    pub text: String,
    /// Font size in pixels, always finite and > 0.
    pub font_size_px: f32,
    /// Text color.
    pub font_color: Color,
    /// Color filling the surface beneath text and frame.
    pub background_color: Color,
    /// Top-left corner of the text block.
    pub text_position: Point,
    /// Format used by the next export.
    pub output_format: OutputFormat,
    /// Text placement mode.
    pub text_layout: TextLayoutMode,
}

impl Default for CompositionState {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size_px: 24.0,
            font_color: Color::BLACK,
            background_color: Color::WHITE,
            text_position: Point::new(10.0, 10.0),
            output_format: OutputFormat::Png,
            text_layout: TextLayoutMode::Anchored,
        }
    }
}

/// Coerce free-form font-size input into a usable pixel size.
///
/// Accepts anything that parses as a finite number > 0 (surrounding whitespace and a trailing
/// `px` are tolerated).
pub fn parse_font_size(input: &str) -> FramesmithResult<f32> {
    let s = input.trim();
    let s = s.strip_suffix("px").unwrap_or(s).trim_end();
    let v: f32 = s
        .parse()
        .map_err(|_| FramesmithError::validation(format!("font size '{input}' is not a number")))?;
    validate_font_size(v)
}

pub(crate) fn validate_font_size(v: f32) -> FramesmithResult<f32> {
    if !v.is_finite() || v <= 0.0 {
        return Err(FramesmithError::validation(format!(
            "font size must be finite and > 0, got {v}"
        )));
    }
    Ok(v)
}

#[cfg(test)]
#[path = "../../tests/unit/session/state.rs"]
mod tests;
