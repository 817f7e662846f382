//! Model + layout → backend-neutral draw commands.
//!
//! `render` is a pure function: it owns no surface and schedules nothing.
//! Painters (Vello, Canvas2D, SVG) clear their surface and then replay a
//! `DrawList`: connectors first, boxes on top, or only the error message
//! when the source failed to parse.

use crate::collapse::CollapseSet;
use crate::error::ParseError;
use crate::id::NodeId;
use crate::layout::{LayoutConfig, TreeLayout, layout_tree};
use crate::model::TreeModel;
use kurbo::{Point, Rect};
use serde::Serialize;

/// One primitive for a painter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Line from the parent's bottom centre to the child's top centre.
    Connector {
        from: NodeId,
        to: NodeId,
        start: Point,
        end: Point,
    },
    /// A labelled node box.
    NodeBox {
        id: NodeId,
        title: String,
        rect: Rect,
        /// The node is in the collapse set and has children to hide. An id
        /// kept in the set after its children were deleted draws expanded.
        collapsed: bool,
        /// The node has children in the model, visible or not. Painters use
        /// this with `collapsed` to pick the expand/collapse marker.
        has_children: bool,
    },
}

/// Everything a painter needs for one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
    /// When set, the painter shows only this message.
    pub error: Option<String>,
    /// Union of all boxes; `Rect::ZERO` for an error list.
    pub bounds: Rect,
}

impl DrawList {
    /// A frame that replaces the diagram with the parse error.
    pub fn from_error(err: &ParseError) -> Self {
        Self {
            commands: Vec::new(),
            error: Some(err.to_string()),
            bounds: Rect::ZERO,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Node boxes in paint order.
    pub fn node_boxes(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::NodeBox { .. }))
    }

    /// Connectors in paint order.
    pub fn connectors(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Connector { .. }))
    }
}

/// Lay out `model` and turn the result into draw commands.
pub fn render(model: &TreeModel, collapsed: &CollapseSet, config: &LayoutConfig) -> DrawList {
    let layout = layout_tree(model, collapsed, config);
    render_tree(model, &layout, collapsed, config)
}

/// Turn an existing layout into draw commands.
pub fn render_tree(
    model: &TreeModel,
    layout: &TreeLayout,
    collapsed: &CollapseSet,
    config: &LayoutConfig,
) -> DrawList {
    let mut commands = Vec::with_capacity(layout.len() * 2);

    for (parent, child) in layout.connections() {
        let (Some(p), Some(c)) = (layout.position(parent), layout.position(child)) else {
            continue;
        };
        commands.push(DrawCommand::Connector {
            from: parent,
            to: child,
            start: Point::new(
                f64::from(p.0 + config.node_width / 2.0),
                f64::from(p.1 + config.node_height),
            ),
            end: Point::new(f64::from(c.0 + config.node_width / 2.0), f64::from(c.1)),
        });
    }

    let mut bounds: Option<Rect> = None;
    for placement in layout.placements() {
        let Some(node) = model.get_by_id(placement.id) else {
            continue;
        };
        let rect = Rect::new(
            f64::from(placement.x),
            f64::from(placement.y),
            f64::from(placement.x + config.node_width),
            f64::from(placement.y + config.node_height),
        );
        bounds = Some(bounds.map_or(rect, |b| b.union(rect)));
        let has_children = model.has_children(node.id);
        commands.push(DrawCommand::NodeBox {
            id: node.id,
            title: node.title.clone(),
            rect,
            collapsed: has_children && collapsed.contains(node.id),
            has_children,
        });
    }

    DrawList {
        commands,
        error: None,
        bounds: bounds.unwrap_or(Rect::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;
    use pretty_assertions::assert_eq;

    #[test]
    fn boxes_carry_title_and_markers() {
        let model = parse_document("node r \"Root\"\nnode a\nnode b\nedge r -> a\nedge a -> b").unwrap();
        let collapsed: CollapseSet = [NodeId::intern("a")].into_iter().collect();
        let list = render(&model, &collapsed, &LayoutConfig::default());

        let boxes: Vec<(&str, &str, bool, bool)> = list
            .node_boxes()
            .filter_map(|c| match c {
                DrawCommand::NodeBox {
                    id,
                    title,
                    collapsed,
                    has_children,
                    ..
                } => Some((id.as_str(), title.as_str(), *collapsed, *has_children)),
                DrawCommand::Connector { .. } => None,
            })
            .collect();
        assert_eq!(boxes, vec![("r", "Root", false, true), ("a", "a", true, true)]);
        assert_eq!(list.connectors().count(), 1);
    }

    #[test]
    fn connectors_join_bottom_centre_to_top_centre() {
        let model = parse_document("node r\nnode a\nedge r -> a").unwrap();
        let list = render(&model, &CollapseSet::new(), &LayoutConfig::default());
        let first = list.commands.first().unwrap();
        assert_eq!(
            *first,
            DrawCommand::Connector {
                from: NodeId::intern("r"),
                to: NodeId::intern("a"),
                start: Point::new(65.0, 46.0),
                end: Point::new(65.0, 126.0),
            }
        );
    }

    #[test]
    fn bounds_cover_all_boxes() {
        let model = parse_document("node r\nnode a\nnode b\nedge r -> a\nedge r -> b").unwrap();
        let list = render(&model, &CollapseSet::new(), &LayoutConfig::default());
        assert_eq!(list.bounds, Rect::new(0.0, 0.0, 296.0, 172.0));
    }

    #[test]
    fn childless_member_of_the_set_draws_expanded() {
        let model = parse_document("node r\nnode a\nedge r -> a").unwrap();
        let collapsed: CollapseSet = [NodeId::intern("a")].into_iter().collect();
        let list = render(&model, &collapsed, &LayoutConfig::default());
        let leaf = list
            .node_boxes()
            .find_map(|c| match c {
                DrawCommand::NodeBox {
                    id,
                    collapsed,
                    has_children,
                    ..
                } if id.as_str() == "a" => Some((*collapsed, *has_children)),
                _ => None,
            })
            .unwrap();
        assert_eq!(leaf, (false, false));
    }

    #[test]
    fn error_list_has_only_the_message() {
        let err = parse_document("bogus").unwrap_err();
        let list = DrawList::from_error(&err);
        assert!(list.is_error());
        assert!(list.commands.is_empty());
        assert_eq!(list.error.as_deref(), Some("line 1: unknown directive `bogus`"));
    }
}
