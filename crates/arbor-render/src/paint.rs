//! Draw list → Vello drawing commands.
//!
//! Replays a `DrawList` into a `vello::Scene`: connectors first, then node
//! boxes with their expand/collapse marker. Error frames paint only the
//! background and an error banner.

use arbor_core::{DrawCommand, DrawList, NodeId};
use kurbo::{Affine, Circle, Line, Point, Rect, RoundedRect, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Colours and strokes for the Vello painter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintTheme {
    pub background: Color,
    pub connector: Color,
    pub box_fill: Color,
    pub box_fill_collapsed: Color,
    pub box_stroke: Color,
    pub marker: Color,
    pub error_fill: Color,
    pub corner_radius: f64,
    pub stroke_width: f64,
}

impl Default for PaintTheme {
    fn default() -> Self {
        Self::light()
    }
}

impl PaintTheme {
    pub fn light() -> Self {
        Self {
            background: Color::from_rgb8(0xFA, 0xFA, 0xF7),
            connector: Color::from_rgb8(0x9A, 0xA0, 0xA6),
            box_fill: Color::from_rgb8(0xFF, 0xFF, 0xFF),
            box_fill_collapsed: Color::from_rgb8(0xE8, 0xF0, 0xFE),
            box_stroke: Color::from_rgb8(0x3C, 0x40, 0x43),
            marker: Color::from_rgb8(0x1A, 0x73, 0xE8),
            error_fill: Color::from_rgba8(0xD9, 0x30, 0x25, 0x33),
            corner_radius: 8.0,
            stroke_width: 1.5,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::from_rgb8(0x1E, 0x1E, 0x1E),
            connector: Color::from_rgb8(0x5F, 0x63, 0x68),
            box_fill: Color::from_rgb8(0x2D, 0x2D, 0x30),
            box_fill_collapsed: Color::from_rgb8(0x17, 0x4E, 0xA6),
            box_stroke: Color::from_rgb8(0xBD, 0xC1, 0xC6),
            marker: Color::from_rgb8(0x8A, 0xB4, 0xF8),
            error_fill: Color::from_rgba8(0xF2, 0x8B, 0x82, 0x44),
            corner_radius: 8.0,
            stroke_width: 1.5,
        }
    }
}

/// Radius of the expand/collapse marker under a box with children.
const MARKER_RADIUS: f64 = 7.0;

/// Paint a whole frame.
///
/// Call once per frame with a freshly-cleared `Scene` sized to `viewport`.
/// The caller presents the scene.
pub fn paint_draw_list(scene: &mut Scene, list: &DrawList, viewport: Rect, theme: &PaintTheme) {
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        theme.background,
        None,
        &viewport,
    );

    if let Some(message) = &list.error {
        paint_error(scene, message, viewport, theme);
        return;
    }

    for command in &list.commands {
        match command {
            DrawCommand::Connector { start, end, .. } => {
                paint_connector(scene, *start, *end, theme);
            }
            DrawCommand::NodeBox {
                id,
                title,
                rect,
                collapsed,
                has_children,
            } => {
                paint_box(scene, *id, title, *rect, *collapsed, theme);
                if *has_children {
                    paint_marker(scene, *rect, *collapsed, theme);
                }
            }
        }
    }
}

// ─── Painters ────────────────────────────────────────────────────────────────

fn paint_connector(scene: &mut Scene, start: Point, end: Point, theme: &PaintTheme) {
    let stroke = Stroke::new(theme.stroke_width);
    scene.stroke(
        &stroke,
        Affine::IDENTITY,
        theme.connector,
        None,
        &Line::new(start, end),
    );
}

fn paint_box(
    scene: &mut Scene,
    id: NodeId,
    title: &str,
    rect: Rect,
    collapsed: bool,
    theme: &PaintTheme,
) {
    let shape: RoundedRect = rect.to_rounded_rect(theme.corner_radius);
    let fill = if collapsed {
        theme.box_fill_collapsed
    } else {
        theme.box_fill
    };
    scene.fill(Fill::NonZero, Affine::IDENTITY, fill, None, &shape);
    scene.stroke(
        &Stroke::new(theme.stroke_width),
        Affine::IDENTITY,
        theme.box_stroke,
        None,
        &shape,
    );

    log::trace!(
        "TEXT #{} {:?} centred at ({}, {})",
        id.as_str(),
        title,
        rect.center().x,
        rect.center().y
    );
    // Glyph layout needs a font context; the Canvas2D and SVG painters draw titles.
}

/// A circle on the bottom edge: `+` when collapsed, `−` when expanded.
fn paint_marker(scene: &mut Scene, rect: Rect, collapsed: bool, theme: &PaintTheme) {
    let center = Point::new(rect.center().x, rect.y1);
    let circle = Circle::new(center, MARKER_RADIUS);
    scene.fill(Fill::NonZero, Affine::IDENTITY, theme.box_fill, None, &circle);

    let stroke = Stroke::new(theme.stroke_width);
    scene.stroke(&stroke, Affine::IDENTITY, theme.marker, None, &circle);

    let arm = MARKER_RADIUS * 0.5;
    let horizontal = Line::new((center.x - arm, center.y), (center.x + arm, center.y));
    scene.stroke(&stroke, Affine::IDENTITY, theme.marker, None, &horizontal);
    if collapsed {
        let vertical = Line::new((center.x, center.y - arm), (center.x, center.y + arm));
        scene.stroke(&stroke, Affine::IDENTITY, theme.marker, None, &vertical);
    }
}

fn paint_error(scene: &mut Scene, message: &str, viewport: Rect, theme: &PaintTheme) {
    let banner = Rect::new(
        viewport.x0 + 16.0,
        viewport.y0 + 16.0,
        viewport.x1 - 16.0,
        viewport.y0 + 56.0,
    );
    if banner.width() > 0.0 {
        scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            theme.error_fill,
            None,
            &banner.to_rounded_rect(theme.corner_radius),
        );
    }
    log::trace!("ERROR banner {message:?}");
}
