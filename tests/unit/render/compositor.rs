use super::*;
use crate::assets::decode::PreparedImage;
use crate::assets::loader::LoadTicket;
use crate::foundation::color::Color;
use crate::foundation::core::{Point, Rgba8Premul};

fn loaded(frame_id: &str, w: u32, h: u32, px: impl Fn(u32, u32) -> [u8; 4]) -> LoadedImage {
    let mut bytes = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let [r, g, b, a] = px(x, y);
            let p = Rgba8Premul::from_straight_rgba(r, g, b, a);
            bytes.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
    }
    LoadedImage {
        ticket: LoadTicket(1),
        frame_id: frame_id.to_owned(),
        image: PreparedImage {
            dims: Dimensions::new(w, h).unwrap(),
            rgba8_premul: Arc::new(bytes),
        },
    }
}

/// Opaque red everywhere except a transparent window at `x < hole_w, y < hole_h`.
fn windowed(frame_id: &str, w: u32, h: u32, hole_w: u32, hole_h: u32) -> LoadedImage {
    loaded(frame_id, w, h, |x, y| {
        if x < hole_w && y < hole_h {
            [0, 0, 0, 0]
        } else {
            [255, 0, 0, 255]
        }
    })
}

fn dark_pixels_in(surface: &Surface, x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
    let mut n = 0;
    for y in y0..y1 {
        for x in x0..x1 {
            let [r, g, b, _] = surface.pixel(x, y).unwrap();
            if r < 128 && g < 128 && b < 128 {
                n += 1;
            }
        }
    }
    n
}

fn test_font() -> FontFace {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    if let Some(p) = std::env::var_os("FRAMESMITH_TEST_FONT") {
        return FontFace::from_path(p).unwrap();
    }
    CANDIDATES
        .iter()
        .map(std::path::Path::new)
        .find(|p| p.exists())
        .map(|p| FontFace::from_path(p).unwrap())
        .or_else(FontFace::system_default)
        .expect("text tests need a font: install DejaVu Sans or set FRAMESMITH_TEST_FONT")
}

/// Bounding box `(x0, y0, x1, y1)` (inclusive) of dark pixels, if any.
fn ink_box(surface: &Surface) -> Option<(u32, u32, u32, u32)> {
    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            let [r, g, b, _] = surface.pixel(x, y).unwrap();
            if r < 128 && g < 128 && b < 128 {
                bbox = Some(match bbox {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
    }
    bbox
}

fn state_with_text(text: &str) -> CompositionState {
    CompositionState {
        text: text.to_owned(),
        ..CompositionState::default()
    }
}

#[test]
fn redraw_without_image_is_noop() {
    let mut comp = Compositor::new(None).unwrap();
    assert_eq!(
        comp.redraw(&CompositionState::default()).unwrap(),
        Redraw::NoImage
    );
    assert!(comp.surface().is_none());
    assert!(comp.frame_id().is_none());
}

#[test]
fn surface_takes_image_dimensions_and_layers_background_under_frame() {
    let mut comp = Compositor::new(None).unwrap();
    let state = CompositionState {
        background_color: Color::rgb(0, 0, 255),
        ..CompositionState::default()
    };
    let out = comp.apply_image(&windowed("w", 40, 30, 20, 10), &state).unwrap();
    assert_eq!(out, Redraw::Drawn);

    let s = comp.surface().unwrap();
    assert_eq!((s.width(), s.height()), (40, 30));
    assert_eq!(comp.frame_id(), Some("w"));
    // Window shows the background fill; elsewhere the opaque frame wins.
    assert_eq!(s.pixel(5, 5).unwrap(), [0, 0, 255, 255]);
    assert_eq!(s.pixel(30, 20).unwrap(), [255, 0, 0, 255]);
    assert!(s.pixel(40, 0).is_none());
}

#[test]
fn redraw_is_idempotent() {
    let mut comp = Compositor::new(None).unwrap();
    let state = CompositionState::default();
    comp.apply_image(&windowed("w", 16, 16, 8, 8), &state).unwrap();
    let first = comp.surface().unwrap().data_premul().to_vec();
    comp.redraw(&state).unwrap();
    comp.redraw(&state).unwrap();
    assert_eq!(comp.surface().unwrap().data_premul(), first.as_slice());
}

#[test]
fn background_change_shows_through_transparent_window_only() {
    let mut comp = Compositor::new(None).unwrap();
    let mut state = CompositionState::default();
    comp.apply_image(&windowed("w", 16, 16, 8, 8), &state).unwrap();
    assert_eq!(comp.surface().unwrap().pixel(2, 2).unwrap(), [255, 255, 255, 255]);

    state.background_color = Color::rgb(0, 255, 0);
    comp.redraw(&state).unwrap();
    let s = comp.surface().unwrap();
    assert_eq!(s.pixel(2, 2).unwrap(), [0, 255, 0, 255]);
    assert_eq!(s.pixel(12, 12).unwrap(), [255, 0, 0, 255]);
}

#[test]
fn second_image_resizes_without_stale_content() {
    let mut comp = Compositor::new(None).unwrap();
    let state = CompositionState::default();
    comp.apply_image(&windowed("a", 40, 30, 0, 0), &state).unwrap();
    assert_eq!(comp.surface().unwrap().dims(), Dimensions::new(40, 30).unwrap());

    let fully_clear = loaded("b", 20, 50, |_, _| [0, 0, 0, 0]);
    comp.apply_image(&fully_clear, &state).unwrap();
    let s = comp.surface().unwrap();
    assert_eq!(s.dims(), Dimensions::new(20, 50).unwrap());
    assert_eq!(s.data_premul().len(), 20 * 50 * 4);
    // Nothing of the red first frame survives.
    for px in s.data_premul().chunks_exact(4) {
        assert_eq!(px, [255, 255, 255, 255]);
    }
    assert_eq!(comp.frame_id(), Some("b"));
}

#[test]
fn failed_apply_keeps_previous_image() {
    let mut comp = Compositor::new(None).unwrap();
    let state = CompositionState::default();
    comp.apply_image(&windowed("a", 8, 8, 0, 0), &state).unwrap();

    let mut broken = windowed("b", 8, 8, 0, 0);
    broken.image.rgba8_premul = Arc::new(vec![0; 3]);
    assert!(comp.apply_image(&broken, &state).is_err());
    assert_eq!(comp.frame_id(), Some("a"));
    assert_eq!(comp.surface().unwrap().dims(), Dimensions::new(8, 8).unwrap());
}

#[test]
fn text_without_font_is_skipped() {
    let mut comp = Compositor::new(None).unwrap();
    assert!(!comp.has_font());
    let out = comp
        .apply_image(&windowed("w", 16, 16, 16, 16), &state_with_text("Hello"))
        .unwrap();
    assert_eq!(out, Redraw::DrawnWithoutText);
    assert_eq!(comp.surface().unwrap().pixel(8, 8).unwrap(), [255, 255, 255, 255]);
}

#[test]
fn text_is_revealed_by_window_and_hidden_by_opaque_frame() {
    let font = test_font();
    let mut comp = Compositor::new(Some(&font)).unwrap();
    let state = CompositionState {
        text: "Hello".to_owned(),
        text_position: Point::new(10.0, 10.0),
        ..CompositionState::default()
    };

    comp.apply_image(&windowed("w", 200, 100, 200, 100), &state).unwrap();
    let visible = dark_pixels_in(comp.surface().unwrap(), 0, 0, 200, 100);
    assert!(visible > 0, "black text should show through the window");
    // Left/top anchoring: nothing drawn above or left of the origin.
    assert_eq!(dark_pixels_in(comp.surface().unwrap(), 0, 0, 200, 8), 0);
    assert_eq!(dark_pixels_in(comp.surface().unwrap(), 0, 0, 8, 100), 0);

    comp.apply_image(&windowed("o", 200, 100, 0, 0), &state).unwrap();
    assert_eq!(dark_pixels_in(comp.surface().unwrap(), 0, 0, 200, 100), 0);
}

#[test]
fn text_moves_with_position() {
    let font = test_font();
    let mut comp = Compositor::new(Some(&font)).unwrap();
    let mut state = state_with_text("Hi");
    let frame = windowed("w", 200, 200, 200, 200);

    state.text_position = Point::new(10.0, 10.0);
    comp.apply_image(&frame, &state).unwrap();
    assert!(dark_pixels_in(comp.surface().unwrap(), 0, 0, 100, 100) > 0);
    assert_eq!(dark_pixels_in(comp.surface().unwrap(), 100, 100, 200, 200), 0);

    state.text_position = Point::new(120.0, 120.0);
    comp.redraw(&state).unwrap();
    assert_eq!(dark_pixels_in(comp.surface().unwrap(), 0, 0, 100, 100), 0);
    assert!(dark_pixels_in(comp.surface().unwrap(), 100, 100, 200, 200) > 0);
}

#[test]
fn centered_wrap_places_text_around_the_middle() {
    let font = test_font();
    let mut comp = Compositor::new(Some(&font)).unwrap();
    let state = CompositionState {
        text: "one two three four".to_owned(),
        font_size_px: 16.0,
        text_layout: TextLayoutMode::CenteredWrap,
        text_position: Point::new(0.0, 0.0),
        ..CompositionState::default()
    };
    comp.apply_image(&windowed("w", 120, 200, 120, 200), &state).unwrap();
    let s = comp.surface().unwrap();
    assert!(dark_pixels_in(s, 0, 60, 120, 140) > 0);
    assert_eq!(dark_pixels_in(s, 0, 0, 120, 20), 0);
    assert_eq!(dark_pixels_in(s, 0, 180, 120, 200), 0);
    // Wrapping keeps glyphs inside the 90% column.
    assert_eq!(dark_pixels_in(s, 0, 0, 5, 200), 0);
    assert_eq!(dark_pixels_in(s, 115, 0, 120, 200), 0);
}

#[test]
fn anchored_text_starts_at_position_and_grows_rightwards() {
    let font = test_font();
    let mut comp = Compositor::new(Some(&font)).unwrap();
    let frame = windowed("w", 300, 100, 300, 100);

    let mut state = state_with_text("Hi");
    state.text_position = Point::new(10.0, 10.0);
    comp.apply_image(&frame, &state).unwrap();
    let (x0, y0, x1, y1) = ink_box(comp.surface().unwrap()).unwrap();
    assert!((10..=16).contains(&x0), "left edge {x0}");
    assert!((10..=20).contains(&y0), "top edge {y0}");
    assert!(y1 > y0 + 10, "glyphs should have height, got {y0}..={y1}");
    let short_width = x1 - x0;

    state.text = "Hello, framesmith".to_owned();
    comp.redraw(&state).unwrap();
    let (lx0, ly0, lx1, _) = ink_box(comp.surface().unwrap()).unwrap();
    assert_eq!(lx0, x0);
    assert!((10..=20).contains(&ly0), "top edge {ly0}");
    assert!(lx1 - lx0 > short_width * 3, "{short_width} vs {}", lx1 - lx0);
}
