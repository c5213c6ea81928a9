use super::*;

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
        .map(Path::new)
        .find(|p| p.exists())
        .map(|p| FontFace::from_path(p).unwrap())
        .or_else(FontFace::system_default)
        .expect("text tests need a font: install DejaVu Sans or set FRAMESMITH_TEST_FONT")
}

fn glyph_positions(layout: &parley::Layout<TextBrushRgba8>) -> Vec<(f32, f32)> {
    let mut out = Vec::new();
    for line in layout.lines() {
        for item in line.items() {
            if let parley::layout::PositionedLayoutItem::GlyphRun(run) = item {
                out.extend(run.positioned_glyphs().map(|g| (g.x, g.y)));
            }
        }
    }
    out
}

#[test]
fn empty_font_bytes_are_rejected() {
    assert!(FontFace::from_bytes(Vec::new(), 0, "empty").is_err());
    assert!(FontFace::from_path("/definitely/not/a/font.ttf").is_err());
}

#[test]
fn system_default_prefers_listed_sans_family() {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    let installed = |name: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    };
    let Some(expected) = SANS_FAMILIES.iter().copied().find(|&name| installed(name)) else {
        return;
    };

    let face = FontFace::system_default().unwrap();
    assert_eq!(face.label(), expected);
}

#[test]
fn glyphs_advance_along_the_baseline() {
    let font = test_font();
    let mut engine = TextLayoutEngine::new(&font).unwrap();
    let brush = TextBrushRgba8::from(Color::BLACK);
    let layout = engine
        .layout("Hello", 24.0, brush, None, LineAlign::Start)
        .unwrap();

    let glyphs = glyph_positions(&layout);
    assert_eq!(glyphs.len(), 5);
    assert!(glyphs.windows(2).all(|w| w[1].0 > w[0].0), "{glyphs:?}");
    // Baseline sits below the top of the layout box.
    assert!(glyphs.iter().all(|&(_, y)| y > 10.0 && y < 36.0), "{glyphs:?}");
}

#[test]
fn wrapped_lines_stack_downwards() {
    let font = test_font();
    let mut engine = TextLayoutEngine::new(&font).unwrap();
    let brush = TextBrushRgba8::from(Color::BLACK);
    let layout = engine
        .layout("one two three four", 16.0, brush, Some(60.0), LineAlign::Center)
        .unwrap();

    assert!(layout.lines().count() >= 2);
    let glyphs = glyph_positions(&layout);
    let first_y = glyphs.first().unwrap().1;
    let last_y = glyphs.last().unwrap().1;
    assert!(last_y > first_y, "{glyphs:?}");
}
