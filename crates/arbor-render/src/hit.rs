//! Hit testing: point → node lookup.
//!
//! Walks the draw list in reverse paint order so the topmost box wins.

use arbor_core::{DrawCommand, DrawList, NodeId};
use kurbo::{Point, Rect};

/// Find the topmost node box at position (px, py).
/// Returns `None` for the background and for error frames.
pub fn hit_test(list: &DrawList, px: f64, py: f64) -> Option<NodeId> {
    let point = Point::new(px, py);
    list.commands.iter().rev().find_map(|command| match command {
        DrawCommand::NodeBox { id, rect, .. } if contains_inclusive(*rect, point) => Some(*id),
        _ => None,
    })
}

/// Find all node boxes that intersect the given rectangle, in paint order.
pub fn hit_test_rect(list: &DrawList, area: Rect) -> Vec<NodeId> {
    list.node_boxes()
        .filter_map(|command| match command {
            DrawCommand::NodeBox { id, rect, .. } if rect.overlaps(area) => Some(*id),
            _ => None,
        })
        .collect()
}

/// `Rect::contains` excludes the right and bottom edges; clicks on a box
/// border should still count.
fn contains_inclusive(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}
