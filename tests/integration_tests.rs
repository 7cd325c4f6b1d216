//! Integration tests for rendering signatures end to end

use pretty_assertions::assert_eq;

use signature_to_image::raster::MAX_WORKING_PIXELS;
use signature_to_image::{
    render, render_with_options, LineSegment, RenderOptions, RenderOverrides, Rgb,
    SignatureError, SignatureRasterizer, SignatureTrace,
};

const FIXTURE: &str = include_str!("fixtures/signature.json");

#[test]
fn test_horizontal_stroke_scenario() {
    let canvas = render(r#"[{"lx":0,"ly":0,"mx":50,"my":0}]"#).expect("Should render");
    assert_eq!(canvas.dimensions(), (198, 55));

    let pen = RenderOptions::default().pen_colour;
    let bg = RenderOptions::default().bg_colour;
    let stroke = canvas.pixel(25, 0).unwrap();
    assert!(
        stroke.distance_sq(pen) < stroke.distance_sq(bg),
        "pixel (25, 0) should be closer to pen than background, got {}",
        stroke
    );
    assert_eq!(canvas.pixel(25, 54), Some(bg));
    // Past the end of the segment is untouched
    assert_eq!(canvas.pixel(120, 0), Some(bg));
}

#[test]
fn test_empty_trace_is_background_only() {
    let options = RenderOptions::new().with_bg_colour(Rgb::new(240, 240, 200));
    let canvas = render_with_options("[]", &options).expect("Should render");
    assert_eq!(canvas.dimensions(), (198, 55));
    assert!(canvas.pixels().all(|p| p == Rgb::new(240, 240, 200)));
}

#[test]
fn test_auto_size_scenario() {
    let trace: SignatureTrace = vec![LineSegment::new(10.0, 5.0, 20.0, 8.0)].into();
    let rasterizer = SignatureRasterizer::new(RenderOptions::new().with_auto_size(true));
    let resolved = rasterizer.resolve_options(&trace, &RenderOverrides::default());
    assert_eq!((resolved.image_width, resolved.image_height), (20, 8));
}

#[test]
fn test_auto_size_fixture() {
    let mut rasterizer = SignatureRasterizer::new(RenderOptions::new().with_auto_size(true));
    let canvas = rasterizer
        .render(FIXTURE, &RenderOverrides::default())
        .expect("Should render");
    assert_eq!(canvas.dimensions(), (157, 36));
}

#[test]
fn test_explicit_size_overrides_auto_size() {
    let mut rasterizer = SignatureRasterizer::new(RenderOptions::new().with_auto_size(true));
    let canvas = rasterizer
        .render(FIXTURE, &RenderOverrides::new().with_image_size(300, 80))
        .expect("Should render");
    assert_eq!(canvas.dimensions(), (300, 80));
}

#[test]
fn test_fixture_draws_ink() {
    let canvas = render(FIXTURE).expect("Should render");
    let bg = RenderOptions::default().bg_colour;
    let inked = canvas.pixels().filter(|&p| p != bg).count();
    assert!(inked > 100, "expected a visible signature, got {} pixels", inked);
    // Nothing lands below the lowest point of the signature
    assert!((40..55).all(|y| (0..198).all(|x| canvas.pixel(x, y) == Some(bg))));
}

#[test]
fn test_dimensions_follow_resolved_size_for_any_multiplier() {
    for multiplier in [1, 2, 5, 12, 16] {
        let options = RenderOptions::new()
            .with_image_size(120, 40)
            .with_draw_multiplier(multiplier);
        let canvas = render_with_options(FIXTURE, &options).expect("Should render");
        assert_eq!(canvas.dimensions(), (120, 40), "multiplier {}", multiplier);
    }
}

#[test]
fn test_escaped_fixture_matches_plain() {
    let escaped = FIXTURE.replace('"', "\\\"");
    assert_eq!(
        render(&escaped).expect("Should render"),
        render(FIXTURE).expect("Should render")
    );
}

#[test]
fn test_structured_and_json_input_agree() {
    let trace: SignatureTrace = FIXTURE.parse().expect("Should decode");
    let mut rasterizer = SignatureRasterizer::default();
    let from_trace = rasterizer
        .render(&trace, &RenderOverrides::default())
        .expect("Should render");
    let from_json = rasterizer
        .render(FIXTURE, &RenderOverrides::default())
        .expect("Should render");
    assert_eq!(from_trace, from_json);
}

#[test]
fn test_malformed_input_is_invalid_input() {
    for input in [
        "{not valid json",
        r#"{"lx":1,"ly":1,"mx":2,"my":2}"#,
        r#"[{"lx":1,"ly":1}]"#,
        r#"[1, 2, 3]"#,
    ] {
        let err = render(input).unwrap_err();
        assert!(
            matches!(err, SignatureError::InvalidInput { .. }),
            "{:?} gave {:?}",
            input,
            err
        );
    }
}

#[test]
fn test_pen_colour_override_applies_per_call() {
    let mut rasterizer = SignatureRasterizer::default();
    let red = Rgb::new(200, 0, 0);
    let canvas = rasterizer
        .render(
            r#"[{"lx":0,"ly":0,"mx":50,"my":0}]"#,
            &RenderOverrides::new().with_pen_colour(red),
        )
        .expect("Should render");
    assert_eq!(canvas.pixel(25, 0), Some(red));
    // Defaults are untouched by overrides
    assert_eq!(rasterizer.defaults().pen_colour, Rgb::INK_BLUE);
}

#[test]
fn test_options_file_feeds_rasterizer() {
    let options = RenderOptions::from_str(
        r##"
penColour = "#000"
imageWidth = 60
imageHeight = 20
"##,
    )
    .expect("Should parse");
    let mut rasterizer = SignatureRasterizer::new(options);
    let canvas = rasterizer
        .render(r#"[{"lx":0,"ly":0,"mx":50,"my":0}]"#, &RenderOverrides::default())
        .expect("Should render");
    assert_eq!(canvas.dimensions(), (60, 20));
    assert_eq!(canvas.pixel(25, 0), Some(Rgb::new(0, 0, 0)));
}

#[test]
fn test_tap_segment_inks_output() {
    let canvas = render(r#"[{"lx":10,"ly":10,"mx":10,"my":10}]"#).expect("Should render");
    let bg = RenderOptions::default().bg_colour;
    let inked = canvas.pixels().filter(|&p| p != bg).count();
    assert!(inked > 0, "a tap should leave a mark");
    assert_ne!(canvas.pixel(10, 10), Some(bg));
}

#[test]
fn test_zero_pen_width_still_inks() {
    let options = RenderOptions::new().with_pen_width(0);
    let canvas = render_with_options(r#"[{"lx":0,"ly":5,"mx":100,"my":5}]"#, &options)
        .expect("Should render");
    let bg = options.bg_colour;
    let inked = canvas.pixels().filter(|&p| p != bg).count();
    assert!(inked >= 100, "expected a hairline, got {} pixels", inked);
}

#[test]
fn test_huge_auto_size_is_render_error() {
    let mut rasterizer = SignatureRasterizer::new(RenderOptions::new().with_auto_size(true));
    let err = rasterizer
        .render(
            r#"[{"lx":0,"ly":0,"mx":30000,"my":30000}]"#,
            &RenderOverrides::default(),
        )
        .unwrap_err();
    assert!(matches!(err, SignatureError::Render { .. }), "{:?}", err);
    assert!(30_000u64 * 12 * 30_000 * 12 > MAX_WORKING_PIXELS);
    assert!(rasterizer.image().is_none());
}
