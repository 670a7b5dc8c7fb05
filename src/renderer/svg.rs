//! SVG generation for a card composition

use crate::layout::transform::fmt_num;
use crate::layout::{place_all, LayoutParameters, Placement};
use crate::session::Session;

use super::SvgConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    /// Lines inside `<defs>`, with their nesting depth
    defs: Vec<(usize, String)>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            defs: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        self.indent_at(self.indent)
    }

    fn indent_at(&self, depth: usize) -> String {
        if self.config.pretty_print {
            "  ".repeat(depth)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Add the two-layer drop shadow used by every frame.
    ///
    /// Offsets are `4s` and `2s`, blur radii `6s` and `4s`, at 30% and 20%
    /// black; an SVG blur's standard deviation is half the CSS blur radius.
    pub fn add_shadow_filter(&mut self, shadow: f64) {
        let prefix = self.prefix();
        self.defs.push((
            0,
            format!(r#"<filter id="{prefix}shadow" x="-50%" y="-50%" width="200%" height="200%">"#),
        ));
        for (dy, blur, opacity) in [(4.0, 6.0, "0.3"), (2.0, 4.0, "0.2")] {
            self.defs.push((
                1,
                format!(
                    r##"<feDropShadow dx="0" dy="{}" stdDeviation="{}" flood-color="#000000" flood-opacity="{}"/>"##,
                    fmt_num(shadow * dy),
                    fmt_num(shadow * blur / 2.0),
                    opacity
                ),
            ));
        }
        self.defs.push((0, "</filter>".to_string()));
    }

    /// Add the rounded clip shared by all frames, in frame-local coordinates
    pub fn add_frame_clip(&mut self, width: f64, height: f64, radius: f64) {
        let prefix = self.prefix();
        self.defs
            .push((0, format!(r#"<clipPath id="{prefix}frame-clip">"#)));
        self.defs.push((
            1,
            format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}"/>"#,
                fmt_num(-width / 2.0),
                fmt_num(-height / 2.0),
                fmt_num(width),
                fmt_num(height),
                fmt_num(radius)
            ),
        ));
        self.defs.push((0, "</clipPath>".to_string()));
    }

    /// Fill the whole canvas
    pub fn add_background(&mut self, size: f64, color: &str) {
        let prefix = self.prefix();
        self.elements.push(format!(
            r#"{}<rect class="{}background" x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            self.indent_str(),
            prefix,
            fmt_num(size),
            fmt_num(size),
            escape_xml(color)
        ));
    }

    /// Open a group for one frame
    pub fn start_frame(&mut self, index: usize, placement: &Placement, shadow: bool) {
        let prefix = self.prefix();
        let filter = if shadow {
            format!(r#" filter="url(#{prefix}shadow)""#)
        } else {
            String::new()
        };
        self.elements.push(format!(
            r#"{}<g class="{}frame" data-index="{}" transform="{}"{}>"#,
            self.indent_str(),
            prefix,
            index,
            placement.transform().to_svg(),
            filter
        ));
        self.indent += 1;
        self.elements.push(format!(
            r#"{}<g clip-path="url(#{}frame-clip)">"#,
            self.indent_str(),
            prefix
        ));
        self.indent += 1;
    }

    /// Close the group opened by `start_frame`
    pub fn end_frame(&mut self) {
        for _ in 0..2 {
            self.indent = self.indent.saturating_sub(1);
            self.elements.push(format!("{}</g>", self.indent_str()));
        }
    }

    /// An image covering the frame, anchored to its top edge
    pub fn add_image(&mut self, href: &str, width: f64, height: f64) {
        let prefix = self.prefix();
        self.elements.push(format!(
            r#"{}<image class="{}image" href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMin slice"/>"#,
            self.indent_str(),
            prefix,
            escape_xml(href),
            fmt_num(-width / 2.0),
            fmt_num(-height / 2.0),
            fmt_num(width),
            fmt_num(height)
        ));
    }

    /// Gray panel with a caption for frames without a URL
    pub fn add_placeholder(&mut self, width: f64, height: f64) {
        let prefix = self.prefix();
        self.elements.push(format!(
            r##"{}<rect class="{}placeholder" x="{}" y="{}" width="{}" height="{}" fill="#e5e7eb"/>"##,
            self.indent_str(),
            prefix,
            fmt_num(-width / 2.0),
            fmt_num(-height / 2.0),
            fmt_num(width),
            fmt_num(height)
        ));
        self.elements.push(format!(
            r##"{}<text class="{}placeholder-text" x="0" y="0" text-anchor="middle" dominant-baseline="middle" font-size="12" fill="#9ca3af">{}</text>"##,
            self.indent_str(),
            prefix,
            escape_xml(&self.config.placeholder_text)
        ));
    }

    /// Build the final SVG string for a square canvas
    pub fn build(self, size: f64) -> String {
        let nl = self.newline();
        let size = fmt_num(size);

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{0}" viewBox="0 0 {0} {0}">"#,
            size
        ));
        svg.push_str(nl);

        if !self.defs.is_empty() {
            svg.push_str(&self.indent_at(1));
            svg.push_str("<defs>");
            svg.push_str(nl);
            for (depth, def) in &self.defs {
                svg.push_str(&self.indent_at(2 + depth));
                svg.push_str(def);
                svg.push_str(nl);
            }
            svg.push_str(&self.indent_at(1));
            svg.push_str("</defs>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Render the current state of an edit session
pub fn render_card(session: &Session, config: &SvgConfig) -> String {
    render_frames(
        session.params(),
        session.slots().as_slice(),
        session.background_color(),
        config,
    )
}

/// Render one frame per URL over a filled square canvas.
///
/// Frames are emitted in ascending stacking order so the frontmost frame
/// paints last. Blank URLs become placeholders.
pub fn render_frames(
    params: &LayoutParameters,
    urls: &[String],
    background_color: &str,
    config: &SvgConfig,
) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    let (w, h) = (f64::from(params.image_width), f64::from(params.image_height));

    let shadow = params.shadow > 0.0;
    if shadow {
        builder.add_shadow_filter(params.shadow);
    }
    builder.add_frame_clip(w, h, params.border_radius);

    let size = f64::from(params.background_width);
    builder.add_background(size, background_color);

    let mut frames: Vec<(usize, Placement)> =
        place_all(params, urls.len()).into_iter().enumerate().collect();
    frames.sort_by_key(|(_, p)| p.z_index);

    for (index, placement) in &frames {
        builder.start_frame(*index, placement, shadow);
        let url = urls[*index].trim();
        if url.is_empty() {
            builder.add_placeholder(w, h);
        } else {
            builder.add_image(url, w, h);
        }
        builder.end_frame();
    }

    builder.build(size)
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
