//! Canvas2D renderer.
//!
//! Replays a `DrawList` onto an HTML `<canvas>` via
//! `CanvasRenderingContext2d`. The diagram is drawn at a fixed margin from
//! the top-left corner; `ArborCanvas::toggle_at` undoes that offset.

use arbor_core::{DrawCommand, DrawList, Point, Rect};
use std::f64::consts::TAU;
use web_sys::CanvasRenderingContext2d;

/// Offset of the diagram origin from the canvas corner, in CSS pixels.
pub const MARGIN: f64 = 24.0;

const CORNER_RADIUS: f64 = 8.0;
const MARKER_RADIUS: f64 = 7.0;
const TITLE_FONT: &str = "500 13px Inter, system-ui, sans-serif";
const TITLE_PADDING: f64 = 10.0;

/// Theme-dependent colors for the canvas and SVG renderers.
pub struct CanvasTheme {
    pub bg: &'static str,
    pub connector: &'static str,
    pub box_fill: &'static str,
    pub box_fill_collapsed: &'static str,
    pub box_stroke: &'static str,
    pub title: &'static str,
    pub marker: &'static str,
    pub error_text: &'static str,
}

impl CanvasTheme {
    /// Light theme on a warm white canvas.
    pub fn light() -> Self {
        Self {
            bg: "#F5F5F7",
            connector: "#A1A1A6",
            box_fill: "#FFFFFF",
            box_fill_collapsed: "#E8F0FE",
            box_stroke: "#3C4043",
            title: "#1D1D1F",
            marker: "#1A73E8",
            error_text: "#D93025",
        }
    }

    /// Dark theme.
    pub fn dark() -> Self {
        Self {
            bg: "#1C1C1E",
            connector: "#636366",
            box_fill: "#2C2C2E",
            box_fill_collapsed: "#1C3A66",
            box_stroke: "#C7C7CC",
            title: "#F2F2F7",
            marker: "#8AB4F8",
            error_text: "#F28B82",
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark { Self::dark() } else { Self::light() }
    }
}

/// Clear the canvas and draw one frame.
pub fn render_draw_list(
    ctx: &CanvasRenderingContext2d,
    list: &DrawList,
    canvas_width: f64,
    canvas_height: f64,
    theme: &CanvasTheme,
) {
    ctx.set_fill_style_str(theme.bg);
    ctx.fill_rect(0.0, 0.0, canvas_width, canvas_height);

    if let Some(message) = &list.error {
        draw_error(ctx, message, theme);
        return;
    }

    ctx.save();
    let _ = ctx.translate(MARGIN, MARGIN);
    for command in &list.commands {
        match command {
            DrawCommand::Connector { start, end, .. } => draw_connector(ctx, *start, *end, theme),
            DrawCommand::NodeBox {
                title,
                rect,
                collapsed,
                has_children,
                ..
            } => {
                draw_box(ctx, *rect, *collapsed, theme);
                draw_title(ctx, *rect, title, theme);
                if *has_children {
                    draw_marker(ctx, *rect, *collapsed, theme);
                }
            }
        }
    }
    ctx.restore();
}

fn draw_connector(ctx: &CanvasRenderingContext2d, start: Point, end: Point, theme: &CanvasTheme) {
    ctx.set_stroke_style_str(theme.connector);
    ctx.set_line_width(1.5);
    ctx.begin_path();
    ctx.move_to(start.x, start.y);
    ctx.line_to(end.x, end.y);
    ctx.stroke();
}

fn draw_box(ctx: &CanvasRenderingContext2d, rect: Rect, collapsed: bool, theme: &CanvasTheme) {
    rounded_rect_path(ctx, rect, CORNER_RADIUS);
    ctx.set_fill_style_str(if collapsed {
        theme.box_fill_collapsed
    } else {
        theme.box_fill
    });
    ctx.fill();
    ctx.set_stroke_style_str(theme.box_stroke);
    ctx.set_line_width(1.5);
    ctx.stroke();
}

fn draw_title(ctx: &CanvasRenderingContext2d, rect: Rect, title: &str, theme: &CanvasTheme) {
    ctx.set_font(TITLE_FONT);
    ctx.set_fill_style_str(theme.title);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");

    let max_width = rect.width() - 2.0 * TITLE_PADDING;
    let fitted = fit_title(title, max_width, |s| {
        ctx.measure_text(s).map_or(0.0, |m| m.width())
    });
    let center = rect.center();
    let _ = ctx.fill_text(&fitted, center.x, center.y);
}

/// `+` when collapsed, `−` when expanded, on the bottom edge of the box.
fn draw_marker(ctx: &CanvasRenderingContext2d, rect: Rect, collapsed: bool, theme: &CanvasTheme) {
    let (cx, cy) = (rect.center().x, rect.y1);
    ctx.begin_path();
    let _ = ctx.arc(cx, cy, MARKER_RADIUS, 0.0, TAU);
    ctx.set_fill_style_str(theme.box_fill);
    ctx.fill();
    ctx.set_stroke_style_str(theme.marker);
    ctx.set_line_width(1.5);
    ctx.stroke();

    let arm = MARKER_RADIUS * 0.5;
    ctx.begin_path();
    ctx.move_to(cx - arm, cy);
    ctx.line_to(cx + arm, cy);
    if collapsed {
        ctx.move_to(cx, cy - arm);
        ctx.line_to(cx, cy + arm);
    }
    ctx.stroke();
}

fn draw_error(ctx: &CanvasRenderingContext2d, message: &str, theme: &CanvasTheme) {
    ctx.set_font("14px ui-monospace, Menlo, monospace");
    ctx.set_fill_style_str(theme.error_text);
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");
    let _ = ctx.fill_text(message, MARGIN, MARGIN);
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, rect: Rect, r: f64) {
    let (x, y, w, h) = (rect.x0, rect.y0, rect.width(), rect.height());
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc_to(x + w, y, x + w, y + r, r).unwrap_or(());
    ctx.line_to(x + w, y + h - r);
    ctx.arc_to(x + w, y + h, x + w - r, y + h, r).unwrap_or(());
    ctx.line_to(x + r, y + h);
    ctx.arc_to(x, y + h, x, y + h - r, r).unwrap_or(());
    ctx.line_to(x, y + r);
    ctx.arc_to(x, y, x + r, y, r).unwrap_or(());
    ctx.close_path();
}

/// Shorten `title` with a trailing ellipsis until `measure` says it fits.
pub(crate) fn fit_title(title: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> String {
    if measure(title) <= max_width {
        return title.to_string();
    }
    let chars: Vec<char> = title.chars().collect();
    for keep in (0..chars.len()).rev() {
        let candidate: String = chars[..keep].iter().chain(std::iter::once(&'…')).collect();
        if measure(&candidate) <= max_width {
            return candidate;
        }
    }
    "…".to_string()
}
