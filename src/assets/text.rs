use std::path::Path;
use std::sync::Arc;

use crate::foundation::color::Color;
use crate::foundation::error::{FramesmithError, FramesmithResult};

/// Sans-serif families tried, in order, by [`FontFace::system_default`].
const SANS_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];

/// Raw font file bytes plus the face index inside the file.
#[derive(Clone)]
pub struct FontFace {
    bytes: Arc<Vec<u8>>,
    index: u32,
    label: String,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("label", &self.label)
            .field("index", &self.index)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl FontFace {
    /// Wrap font bytes (TTF/OTF/TTC).
    pub fn from_bytes(
        bytes: Vec<u8>,
        index: u32,
        label: impl Into<String>,
    ) -> FramesmithResult<Self> {
        if bytes.is_empty() {
            return Err(FramesmithError::validation("font bytes must be non-empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
            index,
            label: label.into(),
        })
    }

    /// Read a font file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> FramesmithResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            FramesmithError::validation(format!("read font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(bytes, 0, path.display().to_string())
    }

    /// Regular face of the first installed family from a short list of common sans-serif
    /// fonts, then whatever fontdb resolves for the generic sans-serif family, then any
    /// installed face.
    ///
    /// Returns `None` on hosts without fonts.
    pub fn system_default() -> Option<Self> {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();

        let query = |family: usvg::fontdb::Family<'_>| {
            db.query(&usvg::fontdb::Query {
                families: &[family],
                ..Default::default()
            })
        };
        let id = SANS_FAMILIES
            .iter()
            .find_map(|name| query(usvg::fontdb::Family::Name(*name)))
            .or_else(|| query(usvg::fontdb::Family::SansSerif))
            .or_else(|| db.faces().next().map(|face| face.id))?;
        let label = db
            .face(id)
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| "system font".to_owned());
        let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;

        tracing::debug!(font = %label, "resolved system font");
        Self::from_bytes(bytes, index, label).ok()
    }

    /// Human-readable origin of this face (path or family name).
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn index(&self) -> u32 {
        self.index
    }
}

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Color> for TextBrushRgba8 {
    fn from(c: Color) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Horizontal placement of wrapped lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LineAlign {
    Start,
    Center,
}

/// Parley shaping state bound to a single font face.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextLayoutEngine {
    /// Register `face` with a fresh font collection.
    pub(crate) fn new(face: &FontFace) -> FramesmithResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.bytes().to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            FramesmithError::validation(format!(
                "no font families registered from '{}'",
                face.label()
            ))
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| FramesmithError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.bytes().to_vec()),
            face.index(),
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    pub(crate) fn family_name(&self) -> &str {
        &self.family_name
    }

    pub(crate) fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Shape `text`. With `wrap_width` set, lines break at that width and are aligned inside it;
    /// otherwise the text stays on its natural lines.
    pub(crate) fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
        wrap_width: Option<f32>,
        align: LineAlign,
    ) -> FramesmithResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(FramesmithError::render(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(wrap_width);
        let alignment = match align {
            LineAlign::Start => parley::Alignment::Start,
            LineAlign::Center => parley::Alignment::Center,
        };
        layout.align(wrap_width, alignment, parley::AlignmentOptions::default());

        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
