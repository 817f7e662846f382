//! Tidy tree layout.
//!
//! Places every visible node on an integer grid of *slots* (columns) and
//! *depths* (rows), then scales the grid by the box size and gaps in
//! `LayoutConfig`:
//!
//! - leaves take consecutive slots in traversal order;
//! - a parent sits halfway between its outermost visible children;
//! - depth is the distance from the root.
//!
//! The traversal runs on an explicit stack over arena indices, so deep
//! trees do not grow the call stack and graphs that are not strict trees
//! (shared children, cycles) still terminate. A node reachable along
//! several paths is placed under the parent that reaches it first.

use crate::collapse::CollapseSet;
use crate::id::NodeId;
use crate::model::TreeModel;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Box size and spacing used to turn slots and depths into coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    /// Horizontal gap between neighbouring boxes.
    pub x_gap: f32,
    /// Vertical gap between rows.
    pub y_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 130.0,
            node_height: 46.0,
            x_gap: 36.0,
            y_gap: 80.0,
        }
    }
}

impl LayoutConfig {
    /// Distance between the left edges of two neighbouring slots.
    pub fn column_pitch(&self) -> f32 {
        self.node_width + self.x_gap
    }

    /// Distance between the top edges of two neighbouring rows.
    pub fn row_pitch(&self) -> f32 {
        self.node_height + self.y_gap
    }
}

/// Where a single visible node ended up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub id: NodeId,
    /// The node this one hangs from in the drawn tree; `None` for the root.
    pub parent: Option<NodeId>,
    /// Horizontal grid position. Parents may land on half slots.
    pub slot: f32,
    pub depth: usize,
    /// Left edge of the box.
    pub x: f32,
    /// Top edge of the box.
    pub y: f32,
}

/// The output of one layout pass. Built fresh every time, never patched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeLayout {
    /// Visible nodes in pre-order (parents before children, siblings in
    /// declaration order).
    placements: Vec<Placement>,
    index: HashMap<NodeId, usize>,
}

impl TreeLayout {
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement(&self, id: NodeId) -> Option<&Placement> {
        self.index.get(&id).map(|&i| &self.placements[i])
    }

    /// Top-left corner of the node's box.
    pub fn position(&self, id: NodeId) -> Option<(f32, f32)> {
        self.placement(id).map(|p| (p.x, p.y))
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// The visible set: exactly the ids that received coordinates.
    pub fn visible(&self) -> HashSet<NodeId> {
        self.index.keys().copied().collect()
    }

    /// Id → top-left corner for every visible node.
    pub fn coordinates(&self) -> HashMap<NodeId, (f32, f32)> {
        self.placements
            .iter()
            .map(|p| (p.id, (p.x, p.y)))
            .collect()
    }

    /// Visible parent → child pairs, in pre-order of the child.
    pub fn connections(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.placements
            .iter()
            .filter_map(|p| p.parent.map(|parent| (parent, p.id)))
    }

    /// Width and height of the area covered by all boxes.
    pub fn extent(&self, config: &LayoutConfig) -> (f32, f32) {
        self.placements
            .iter()
            .fold((0.0f32, 0.0f32), |(w, h), p| {
                (
                    w.max(p.x + config.node_width),
                    h.max(p.y + config.node_height),
                )
            })
    }
}

/// One entry of the pre-order walk.
struct Visit {
    idx: NodeIndex,
    parent: Option<usize>,
    depth: usize,
    /// Positions (in the walk) of the children placed under this node.
    children: SmallVec<[usize; 4]>,
}

/// Lay out the part of `model` that is visible under `collapsed`.
///
/// Pure: the same model, collapse set and config always give the same
/// layout.
pub fn layout_tree(model: &TreeModel, collapsed: &CollapseSet, config: &LayoutConfig) -> TreeLayout {
    let walk = visible_walk(model, collapsed);
    let slots = assign_slots(&walk);

    let placements: Vec<Placement> = walk
        .iter()
        .zip(&slots)
        .map(|(visit, &slot)| Placement {
            id: model.node(visit.idx).id,
            parent: visit.parent.map(|p| model.node(walk[p].idx).id),
            slot,
            depth: visit.depth,
            x: slot * config.column_pitch(),
            y: visit.depth as f32 * config.row_pitch(),
        })
        .collect();

    let index = placements
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id, i))
        .collect();

    log::debug!(
        "laid out {} of {} nodes ({} collapsed)",
        placements.len(),
        model.node_count(),
        collapsed.len()
    );

    TreeLayout { placements, index }
}

/// Depth-first pre-order walk from the root, skipping the children of
/// collapsed nodes and anything already visited.
fn visible_walk(model: &TreeModel, collapsed: &CollapseSet) -> Vec<Visit> {
    let mut visited = vec![false; model.node_count()];
    let mut walk: Vec<Visit> = Vec::new();
    let mut stack: Vec<(NodeIndex, Option<usize>, usize)> = vec![(model.root(), None, 0)];

    while let Some((idx, parent, depth)) = stack.pop() {
        if visited[idx.index()] {
            continue;
        }
        visited[idx.index()] = true;

        let pos = walk.len();
        walk.push(Visit {
            idx,
            parent,
            depth,
            children: SmallVec::new(),
        });
        if let Some(p) = parent {
            walk[p].children.push(pos);
        }

        if collapsed.contains(model.node(idx).id) {
            continue;
        }
        // Reversed so the first child is popped (and walked) first.
        for child in model.children(idx).into_iter().rev() {
            if !visited[child.index()] {
                stack.push((child, Some(pos), depth + 1));
            }
        }
    }

    walk
}

/// Leaves get consecutive slots in walk order; parents are centred over the
/// lowest and highest slot among their immediate children.
fn assign_slots(walk: &[Visit]) -> Vec<f32> {
    let mut slots = vec![0.0f32; walk.len()];

    let mut next = 0u32;
    for (pos, visit) in walk.iter().enumerate() {
        if visit.children.is_empty() {
            slots[pos] = next as f32;
            next += 1;
        }
    }

    // Children always come after their parent in the walk, so a reverse
    // sweep sees every child before its parent.
    for pos in (0..walk.len()).rev() {
        let children = &walk[pos].children;
        if children.is_empty() {
            continue;
        }
        let (min, max) = children.iter().fold((f32::MAX, f32::MIN), |(lo, hi), &c| {
            (lo.min(slots[c]), hi.max(slots[c]))
        });
        slots[pos] = (min + max) / 2.0;
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    fn slot_of(layout: &TreeLayout, id: &str) -> f32 {
        layout.placement(NodeId::intern(id)).expect("not placed").slot
    }

    fn depth_of(layout: &TreeLayout, id: &str) -> usize {
        layout.placement(NodeId::intern(id)).expect("not placed").depth
    }

    fn lay(input: &str, collapsed: &[&str]) -> TreeLayout {
        let model = parse_document(input).unwrap();
        let set: CollapseSet = collapsed.iter().map(|s| NodeId::intern(s)).collect();
        layout_tree(&model, &set, &LayoutConfig::default())
    }

    #[test]
    fn single_node_sits_at_origin() {
        let layout = lay("node only \"Only\"", &[]);
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.position(NodeId::intern("only")), Some((0.0, 0.0)));
    }

    #[test]
    fn chain_stays_in_slot_zero() {
        let layout = lay("node a\nnode b\nnode c\nedge a -> b\nedge b -> c", &[]);
        for (id, depth) in [("a", 0), ("b", 1), ("c", 2)] {
            assert_eq!(slot_of(&layout, id), 0.0);
            assert_eq!(depth_of(&layout, id), depth);
        }
        assert_eq!(layout.position(NodeId::intern("c")), Some((0.0, 252.0)));
    }

    #[test]
    fn parent_is_centred_on_outer_children() {
        let input = "node p\nnode x\nnode y\nnode z\nnode y1\nnode y2\nnode y3\n\
                     edge p -> x\nedge p -> y\nedge p -> z\n\
                     edge y -> y1\nedge y -> y2\nedge y -> y3";
        let layout = lay(input, &[]);
        assert_eq!(slot_of(&layout, "x"), 0.0);
        assert_eq!(slot_of(&layout, "y"), 2.0);
        assert_eq!(slot_of(&layout, "z"), 4.0);
        assert_eq!(slot_of(&layout, "p"), 2.0);
    }

    #[test]
    fn centring_ignores_middle_children() {
        // y sits at 1.5, which has no say in where p goes.
        let input = "node p\nnode x\nnode y\nnode z\nnode y1\nnode y2\n\
                     edge p -> x\nedge p -> y\nedge p -> z\n\
                     edge y -> y1\nedge y -> y2";
        let layout = lay(input, &[]);
        assert_eq!(slot_of(&layout, "y"), 1.5);
        assert_eq!(slot_of(&layout, "z"), 3.0);
        assert_eq!(slot_of(&layout, "p"), 1.5);
    }

    #[test]
    fn coordinates_scale_by_config() {
        let model = parse_document("node r\nnode a\nnode b\nedge r -> a\nedge r -> b").unwrap();
        let config = LayoutConfig {
            node_width: 100.0,
            node_height: 20.0,
            x_gap: 10.0,
            y_gap: 30.0,
        };
        let layout = layout_tree(&model, &CollapseSet::new(), &config);
        assert_eq!(layout.position(NodeId::intern("a")), Some((0.0, 50.0)));
        assert_eq!(layout.position(NodeId::intern("b")), Some((110.0, 50.0)));
        assert_eq!(layout.position(NodeId::intern("r")), Some((55.0, 0.0)));
        assert_eq!(layout.extent(&config), (210.0, 70.0));
    }

    #[test]
    fn collapse_hides_descendants_but_not_the_node() {
        let input = "node r\nnode a\nnode b\nnode a1\nnode a2\nnode deep\n\
                     edge r -> a\nedge r -> b\nedge a -> a1\nedge a -> a2\nedge a1 -> deep";
        let layout = lay(input, &["a"]);
        assert!(layout.is_visible(NodeId::intern("a")));
        for hidden in ["a1", "a2", "deep"] {
            assert!(!layout.is_visible(NodeId::intern(hidden)), "{hidden} visible");
            assert!(!layout.coordinates().contains_key(&NodeId::intern(hidden)));
        }
        // a is a leaf now.
        assert_eq!(slot_of(&layout, "a"), 0.0);
        assert_eq!(slot_of(&layout, "b"), 1.0);
        assert_eq!(slot_of(&layout, "r"), 0.5);
    }

    #[test]
    fn collapse_below_a_collapsed_ancestor_changes_nothing() {
        let input = "node r\nnode a\nnode a1\nnode a2\nedge r -> a\nedge a -> a1\nedge a1 -> a2";
        assert_eq!(lay(input, &["a"]), lay(input, &["a", "a1"]));
    }

    #[test]
    fn collapsed_root_shows_only_root() {
        let layout = lay("node r\nnode a\nedge r -> a", &["r"]);
        assert_eq!(layout.len(), 1);
        assert!(layout.is_visible(NodeId::intern("r")));
    }

    #[test]
    fn visible_set_matches_coordinates() {
        let layout = lay("node r\nnode a\nnode b\nnode c\nedge r -> a\nedge a -> b\nedge r -> c", &["a"]);
        let coords: HashSet<NodeId> = layout.coordinates().keys().copied().collect();
        assert_eq!(layout.visible(), coords);
    }

    #[test]
    fn unreachable_nodes_are_not_placed() {
        let layout = lay("node r\nnode a\nnode island\nedge r -> a", &[]);
        assert!(!layout.is_visible(NodeId::intern("island")));
        assert_eq!(layout.len(), 2);
    }

    #[test]
    fn shared_child_hangs_from_first_parent() {
        let input = "node r\nnode a\nnode b\nnode s\n\
                     edge r -> a\nedge r -> b\nedge a -> s\nedge b -> s";
        let layout = lay(input, &[]);
        let s = layout.placement(NodeId::intern("s")).unwrap();
        assert_eq!(s.parent, Some(NodeId::intern("a")));
        assert_eq!(s.depth, 2);
        // b has no children of its own in the drawn tree.
        assert_eq!(slot_of(&layout, "s"), 0.0);
        assert_eq!(slot_of(&layout, "b"), 1.0);
        assert_eq!(layout.connections().count(), 3);
    }

    #[test]
    fn cycles_terminate() {
        let layout = lay("node a\nnode b\nedge a -> b\nedge b -> a", &[]);
        assert_eq!(layout.len(), 2);
        assert_eq!(depth_of(&layout, "b"), 1);
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let mut doc = String::new();
        for i in 0..20_000 {
            doc.push_str(&format!("node n{i}\n"));
        }
        for i in 1..20_000 {
            doc.push_str(&format!("edge n{} -> n{i}\n", i - 1));
        }
        let layout = lay(&doc, &[]);
        assert_eq!(layout.len(), 20_000);
        assert_eq!(depth_of(&layout, "n19999"), 19_999);
    }

    #[test]
    fn layout_is_deterministic() {
        let input = "node r\nnode a\nnode b\nnode c\nedge r -> a\nedge r -> b\nedge b -> c";
        let first = lay(input, &["b"]);
        let second = lay(input, &["b"]);
        assert_eq!(first.coordinates(), second.coordinates());
        assert_eq!(first, second);
    }

    #[test]
    fn placements_are_pre_order() {
        let layout = lay("node r\nnode a\nnode b\nnode a1\nedge r -> a\nedge r -> b\nedge a -> a1", &[]);
        let order: Vec<&str> = layout.placements().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["r", "a", "a1", "b"]);
    }
}
