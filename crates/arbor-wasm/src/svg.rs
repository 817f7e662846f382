//! SVG export of the current draw list.

use crate::render2d::CanvasTheme;
use arbor_core::{DrawCommand, DrawList};
use std::fmt::Write;

const PAD: f64 = 16.0;

/// Render `list` as a standalone SVG document.
///
/// Error frames export the message as a single text element.
pub fn render_svg(list: &DrawList, theme: &CanvasTheme) -> String {
    let mut svg = String::new();

    if let Some(message) = &list.error {
        let width = (message.chars().count() as f64).mul_add(8.0, 2.0 * PAD);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="48" viewBox="0 0 {width} 48">"#
        );
        let _ = writeln!(
            svg,
            r#"<text x="{PAD}" y="30" font-family="ui-monospace, monospace" font-size="14" fill="{}">{}</text>"#,
            theme.error_text,
            escape(message)
        );
        svg.push_str("</svg>");
        return svg;
    }

    let b = list.bounds;
    let width = b.width() + 2.0 * PAD;
    let height = b.height() + 2.0 * PAD;
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    svg.push_str("<style>\n");
    svg.push_str("  text { font-family: Inter, system-ui, sans-serif; font-size: 13px; }\n");
    svg.push_str("</style>\n");
    let _ = writeln!(
        svg,
        r#"<rect width="100%" height="100%" fill="{}" />"#,
        theme.bg
    );
    let _ = writeln!(
        svg,
        r#"<g transform="translate({}, {})">"#,
        PAD - b.x0,
        PAD - b.y0
    );

    for command in &list.commands {
        match command {
            DrawCommand::Connector { start, end, .. } => {
                let _ = writeln!(
                    svg,
                    r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1.5" />"#,
                    start.x, start.y, end.x, end.y, theme.connector
                );
            }
            DrawCommand::NodeBox {
                id,
                title,
                rect,
                collapsed,
                has_children,
            } => {
                let fill = if *collapsed {
                    theme.box_fill_collapsed
                } else {
                    theme.box_fill
                };
                let _ = writeln!(
                    svg,
                    r#"  <rect data-id="{}" x="{}" y="{}" width="{}" height="{}" rx="8" ry="8" fill="{}" stroke="{}" stroke-width="1.5" />"#,
                    escape(id.as_str()),
                    rect.x0,
                    rect.y0,
                    rect.width(),
                    rect.height(),
                    fill,
                    theme.box_stroke
                );
                let center = rect.center();
                let _ = writeln!(
                    svg,
                    r#"  <text x="{}" y="{}" text-anchor="middle" dominant-baseline="central" fill="{}">{}</text>"#,
                    center.x,
                    center.y,
                    theme.title,
                    escape(title)
                );
                if *has_children {
                    let marker = if *collapsed { "+" } else { "−" };
                    let _ = writeln!(
                        svg,
                        r#"  <text x="{}" y="{}" text-anchor="middle" dominant-baseline="central" fill="{}">{marker}</text>"#,
                        center.x,
                        rect.y1,
                        theme.marker
                    );
                }
            }
        }
    }

    svg.push_str("</g>\n</svg>");
    svg
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
