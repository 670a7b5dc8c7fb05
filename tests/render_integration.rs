//! Integration tests for SVG rendering and export of whole cards.

use fancard::export::{ExportOptions, ImageFormat};
use fancard::{export_card, render, render_card, Exporter, Session, SvgConfig, SvgPassthrough};

fn session_with(urls: &[&str]) -> Session {
    let mut session = Session::new();
    let urls = urls.iter().map(|u| u.to_string()).collect();
    *session.slots_mut() = fancard::ImageSlots::from_urls(urls);
    session
}

fn compact() -> SvgConfig {
    SvgConfig::new().with_pretty_print(false).with_standalone(false)
}

#[test]
fn test_compact_single_frame_snapshot() {
    let mut session = session_with(&["a.png"]);
    session.set_background_width(200);
    session.set_image_width(100.0);
    session.set_image_height(100.0);
    session.set_border_radius(8.0);
    session.set_shadow(0.0);

    let svg = render_card(&session, &compact());
    insta::assert_snapshot!(svg, @r###"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="200" viewBox="0 0 200 200"><defs><clipPath id="fc-frame-clip"><rect x="-50" y="-50" width="100" height="100" rx="8"/></clipPath></defs><rect class="fc-background" x="0" y="0" width="200" height="200" fill="#f0f4f8"/><g class="fc-frame" data-index="0" transform="translate(100 100) rotate(0) translate(0 0)"><g clip-path="url(#fc-frame-clip)"><image class="fc-image" href="a.png" x="-50" y="-50" width="100" height="100" preserveAspectRatio="xMidYMin slice"/></g></g></svg>"###);
}

#[test]
fn test_pretty_output_is_indented() {
    let svg = render(&session_with(&["a.png", "b.png"]));
    let lines: Vec<&str> = svg.lines().collect();
    assert_eq!(lines[0], r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    assert!(lines.contains(&"  <defs>"));
    assert!(lines.iter().any(|l| l.starts_with("      <feDropShadow")));
    assert!(lines.iter().any(|l| l.starts_with("      <image")));
    assert_eq!(*lines.last().unwrap(), "</svg>");
}

#[test]
fn test_every_slot_gets_a_frame_in_stacking_order() {
    let svg = render(&session_with(&["a.png", "", "c.png", "d.png"]));
    assert_eq!(svg.matches(r#"class="fc-frame""#).count(), 4);
    assert_eq!(svg.matches("<image").count(), 3);
    assert_eq!(svg.matches(">No image<").count(), 1);

    let order: Vec<usize> = (0..4)
        .map(|i| svg.find(&format!(r#"data-index="{i}""#)).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_background_color_is_used() {
    let mut session = session_with(&["a.png"]);
    session.set_background_color("#112233").unwrap();
    let svg = render(&session);
    let background =
        r##"class="fc-background" x="0" y="0" width="800" height="800" fill="#112233""##;
    assert!(svg.contains(background));
}

#[test]
fn test_translation_and_rotation_reach_the_transform() {
    let mut session = session_with(&["a.png"]);
    session.set_translate_x(-50.0);
    session.set_translate_y(20.0);
    session.set_image_rotate(15.0);
    let svg = render(&session);
    assert!(svg.contains(r#"transform="translate(350 420) rotate(15) translate(0 0)""#));
}

#[test]
fn test_class_prefix_can_be_changed() {
    let svg = render_card(&Session::new(), &compact().with_class_prefix("card-"));
    assert!(svg.contains(r#"class="card-frame""#));
    assert!(svg.contains(r#"clip-path="url(#card-frame-clip)""#));
    assert!(!svg.contains("fc-"));
}

#[test]
fn test_export_uses_configured_options() {
    let options = ExportOptions::new().with_pixel_ratio(1.5).with_file_stem("fan");
    let mut exporter = Exporter::with_options(SvgPassthrough, options);
    let session = session_with(&["a.png", "b.png"]);

    let output = export_card(&session, &mut exporter, None).unwrap();
    assert_eq!(output.format, ImageFormat::Svg);
    assert_eq!(output.file_name, "fan.svg");
    assert_eq!((output.width, output.height), (1200, 1200));
    assert_eq!(output.bytes, render(&session).into_bytes());
    assert!(output.to_data_url().starts_with("data:image/svg+xml;base64,"));
}

#[test]
fn test_export_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut exporter = Exporter::new(SvgPassthrough);
    let output = export_card(&session_with(&["a.png"]), &mut exporter, Some("My card")).unwrap();
    let path = output.write_to(dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "My card.svg");
    assert!(std::fs::read_to_string(path).unwrap().starts_with("<?xml"));
}
