//! Selectable background frames.
//!
//! A [`FrameCatalog`] is fixed at startup and never mutated afterwards. Selection always goes
//! through [`FrameCatalog::get`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{FramesmithError, FramesmithResult};

/// A background frame asset with identity and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Unique id used for selection.
    pub id: String,
    /// Opaque locator handed to the image source, e.g. `/frame-1.png`.
    pub image_ref: String,
    /// Human-readable name shown in the frame selector.
    pub display_name: String,
}

impl Frame {
    /// Convenience constructor.
    pub fn new(
        id: impl Into<String>,
        image_ref: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            image_ref: image_ref.into(),
            display_name: display_name.into(),
        }
    }
}

/// Ordered, immutable sequence of [`Frame`] records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCatalog {
    frames: Vec<Frame>,
}

impl FrameCatalog {
    /// Build a catalog, rejecting empty catalogs, blank fields, and duplicate ids.
    pub fn new(frames: Vec<Frame>) -> FramesmithResult<Self> {
        if frames.is_empty() {
            return Err(FramesmithError::validation(
                "frame catalog must contain at least one frame",
            ));
        }

        let mut seen = HashSet::with_capacity(frames.len());
        for f in &frames {
            if f.id.trim().is_empty() {
                return Err(FramesmithError::validation("frame id must be non-empty"));
            }
            if f.image_ref.trim().is_empty() {
                return Err(FramesmithError::validation(format!(
                    "frame '{}' has an empty image_ref",
                    f.id
                )));
            }
            if !seen.insert(f.id.as_str()) {
                return Err(FramesmithError::validation(format!(
                    "duplicate frame id '{}'",
                    f.id
                )));
            }
        }

        Ok(Self { frames })
    }

    /// The stock frames shipped with the generator.
    pub fn builtin() -> Self {
        Self {
            frames: vec![
                Frame::new("simple", "/frame-1.png", "Simple Frame"),
                Frame::new("vintage", "/frame-2.png", "Vintage Frame"),
                Frame::new("modern", "/frame-3.png", "Modern Frame"),
                Frame::new("colorful", "/frame-1.png", "Colorful Frame"),
            ],
        }
    }

    /// Look up a frame by id.
    pub fn get(&self, id: &str) -> Option<&Frame> {
        self.frames.iter().find(|f| f.id == id)
    }

    /// The default selection (first entry).
    pub fn first(&self) -> &Frame {
        // Non-empty by construction.
        &self.frames[0]
    }

    /// Iterate frames in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Default for FrameCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a FrameCatalog {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[path = "../tests/unit/catalog.rs"]
mod tests;
