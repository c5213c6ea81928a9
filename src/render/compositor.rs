//! Deterministic redraw of the canvas surface.
//!
//! Layer order is fixed: clear, background fill, text, frame image. The frame goes on top of the
//! text so that transparent cut-outs in the artwork reveal the text underneath while opaque
//! regions hide it.

use std::sync::Arc;

use crate::assets::loader::LoadedImage;
use crate::assets::text::{FontFace, LineAlign, TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::Dimensions;
use crate::foundation::error::{FramesmithError, FramesmithResult};
use crate::render::surface::Surface;
use crate::session::state::{CompositionState, TextLayoutMode};

/// Fraction of the surface width available to wrapped lines in [`TextLayoutMode::CenteredWrap`].
const WRAP_WIDTH_RATIO: f32 = 0.9;

/// What a redraw did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redraw {
    /// No frame image has been applied yet; nothing was drawn.
    NoImage,
    /// All layers were drawn.
    Drawn,
    /// Background and frame were drawn but the text layer was skipped for lack of a font.
    DrawnWithoutText,
}

#[derive(Clone)]
struct FrameImage {
    frame_id: String,
    dims: Dimensions,
    paint: vello_cpu::Image,
}

/// Owns the canvas surface and the currently applied frame image.
pub struct Compositor {
    surface: Option<Surface>,
    frame: Option<FrameImage>,
    text: Option<TextLayoutEngine>,
    ctx: Option<vello_cpu::RenderContext>,
}

impl Compositor {
    /// Create a compositor. Without a font face the text layer is skipped.
    pub fn new(font: Option<&FontFace>) -> FramesmithResult<Self> {
        let text = font.map(TextLayoutEngine::new).transpose()?;
        if let Some(engine) = &text {
            tracing::debug!(family = engine.family_name(), "text layer ready");
        }
        Ok(Self {
            surface: None,
            frame: None,
            text,
            ctx: None,
        })
    }

    /// Whether text can be rendered.
    pub fn has_font(&self) -> bool {
        self.text.is_some()
    }

    /// The current surface, once an image has been applied.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Id of the frame whose image is currently applied.
    pub fn frame_id(&self) -> Option<&str> {
        self.frame.as_ref().map(|f| f.frame_id.as_str())
    }

    /// Replace the frame image, resize the surface to its natural size, and redraw.
    ///
    /// On error the previous image and surface are kept untouched.
    #[tracing::instrument(skip_all, fields(frame = %loaded.frame_id))]
    pub fn apply_image(
        &mut self,
        loaded: &LoadedImage,
        state: &CompositionState,
    ) -> FramesmithResult<Redraw> {
        let dims = loaded.image.dims;
        let paint = image_paint_from_premul(&loaded.image.rgba8_premul, dims)?;
        let frame = FrameImage {
            frame_id: loaded.frame_id.clone(),
            dims,
            paint,
        };

        let (surface, outcome) = draw(&mut self.ctx, self.text.as_mut(), &frame, state)?;
        tracing::debug!(
            width = dims.width,
            height = dims.height,
            "surface resized to frame image"
        );
        self.frame = Some(frame);
        self.surface = Some(surface);
        Ok(outcome)
    }

    /// Redraw from `state` and the applied frame image.
    ///
    /// A no-op returning [`Redraw::NoImage`] until an image has been applied.
    pub fn redraw(&mut self, state: &CompositionState) -> FramesmithResult<Redraw> {
        let Some(frame) = self.frame.as_ref() else {
            return Ok(Redraw::NoImage);
        };
        let (surface, outcome) = draw(&mut self.ctx, self.text.as_mut(), frame, state)?;
        self.surface = Some(surface);
        Ok(outcome)
    }
}

/// Render every layer into a fresh surface sized to the frame image.
fn draw(
    ctx_slot: &mut Option<vello_cpu::RenderContext>,
    text: Option<&mut TextLayoutEngine>,
    frame: &FrameImage,
    state: &CompositionState,
) -> FramesmithResult<(Surface, Redraw)> {
    let dims = frame.dims;
    let (w16, h16) = dims.as_u16();
    let mut ctx = match ctx_slot.take() {
        Some(ctx) if ctx.width() == w16 && ctx.height() == h16 => ctx,
        _ => vello_cpu::RenderContext::new(w16, h16),
    };
    ctx.reset();

    let w = f64::from(dims.width);
    let h = f64::from(dims.height);
    ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    // Background.
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(state.background_color.to_peniko());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));

    // Text.
    let outcome = if state.text.is_empty() {
        Redraw::Drawn
    } else if let Some(engine) = text {
        draw_text(&mut ctx, engine, state, dims)?;
        Redraw::Drawn
    } else {
        Redraw::DrawnWithoutText
    };

    // Frame, stretched over the whole surface.
    let iw = f64::from(frame.dims.width);
    let ih = f64::from(frame.dims.height);
    ctx.set_transform(vello_cpu::kurbo::Affine::scale_non_uniform(w / iw, h / ih));
    ctx.set_paint(frame.paint.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));

    let mut surface = Surface::new(dims);
    ctx.flush();
    ctx.render_to_pixmap(surface.pixmap_mut());
    *ctx_slot = Some(ctx);

    Ok((surface, outcome))
}

fn draw_text(
    ctx: &mut vello_cpu::RenderContext,
    engine: &mut TextLayoutEngine,
    state: &CompositionState,
    dims: Dimensions,
) -> FramesmithResult<()> {
    let brush = TextBrushRgba8::from(state.font_color);
    let (layout, origin) = match state.text_layout {
        TextLayoutMode::Anchored => {
            let layout = engine.layout(&state.text, state.font_size_px, brush, None, LineAlign::Start)?;
            (layout, (state.text_position.x, state.text_position.y))
        }
        TextLayoutMode::CenteredWrap => {
            let surface_w = dims.width as f32;
            let wrap = surface_w * WRAP_WIDTH_RATIO;
            let layout = engine.layout(
                &state.text,
                state.font_size_px,
                brush,
                Some(wrap),
                LineAlign::Center,
            )?;
            let x = (surface_w - wrap) / 2.0;
            let y = (dims.height as f32 - layout.height()) / 2.0;
            (layout, (f64::from(x), f64::from(y)))
        }
    };

    ctx.set_transform(vello_cpu::kurbo::Affine::translate(origin));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            // Layout-space positions: x includes the run offset, y is the line baseline.
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(engine.font())
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    Ok(())
}

fn image_paint_from_premul(bytes: &[u8], dims: Dimensions) -> FramesmithResult<vello_cpu::Image> {
    if bytes.len() != dims.rgba8_len() {
        return Err(FramesmithError::render("frame image byte length mismatch"));
    }
    let (w, h) = dims.as_u16();
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(dims.pixel_count());
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
