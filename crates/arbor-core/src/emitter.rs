//! Emitter: TreeModel → Arbor text format.
//!
//! Produces canonical output that re-parses to an equivalent model: node
//! directives first, then edge directives, each in declaration order.

use crate::model::{Edge, TreeModel, TreeNode};
use std::fmt::Write;

/// Options for `emit_with`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    /// Write `node a` instead of `node a "a"` when the title is the id.
    pub omit_default_titles: bool,
    /// Put a blank line between the node block and the edge block.
    pub blank_line_before_edges: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            omit_default_titles: true,
            blank_line_before_edges: true,
        }
    }
}

/// Emit a `TreeModel` as an Arbor text document with default options.
#[must_use]
pub fn emit_document(model: &TreeModel) -> String {
    emit_with(model, model.nodes(), &EmitOptions::default())
}

/// Emit the given nodes (in the given order) followed by all of the
/// model's edges.
pub fn emit_with<'a>(
    model: &TreeModel,
    nodes: impl IntoIterator<Item = &'a TreeNode>,
    options: &EmitOptions,
) -> String {
    let mut out = String::with_capacity(model.node_count() * 24 + model.edges().len() * 16);

    for node in nodes {
        emit_node(&mut out, node, options);
    }

    if options.blank_line_before_edges && !model.edges().is_empty() {
        out.push('\n');
    }
    for edge in model.edges() {
        emit_edge(&mut out, edge);
    }

    out
}

fn emit_node(out: &mut String, node: &TreeNode, options: &EmitOptions) {
    if options.omit_default_titles && node.has_default_title() {
        let _ = writeln!(out, "node {}", node.id);
    } else {
        let _ = writeln!(out, "node {} \"{}\"", node.id, node.title);
    }
}

fn emit_edge(out: &mut String, edge: &Edge) {
    let _ = writeln!(out, "edge {} -> {}", edge.from, edge.to);
}
