//! Document formatting pipeline: parse → reorder → emit.
//!
//! Consumed by the LSP `--format` mode. The output is idempotent and parses
//! to a model with the same nodes, titles, edges, child order and root.

use crate::collapse::CollapseSet;
use crate::emitter::{EmitOptions, emit_with};
use crate::error::ParseError;
use crate::layout::{LayoutConfig, layout_tree};
use crate::model::TreeNode;
use crate::parser::parse_document;
use std::collections::HashSet;

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for `format_document`.
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Write `node a` instead of `node a "a"`. Default: **true**.
    pub omit_default_titles: bool,

    /// Separate node and edge blocks with a blank line. Default: **true**.
    pub blank_line_before_edges: bool,

    /// Reorder node declarations to follow the tree (root first, then
    /// depth-first in child order); unreachable nodes keep their relative
    /// order at the end. Reordering never changes the chosen root, but it
    /// does rewrite the file, so it defaults to **false**.
    pub tree_order: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            omit_default_titles: true,
            blank_line_before_edges: true,
            tree_order: false,
        }
    }
}

// ─── Pipeline ─────────────────────────────────────────────────────────────

/// Parse an Arbor document and re-emit canonical text.
///
/// # Errors
/// Returns the parse error if the input is not a valid document.
pub fn format_document(text: &str, config: &FormatConfig) -> Result<String, ParseError> {
    let model = parse_document(text)?;
    let options = EmitOptions {
        omit_default_titles: config.omit_default_titles,
        blank_line_before_edges: config.blank_line_before_edges,
    };

    if !config.tree_order {
        return Ok(emit_with(&model, model.nodes(), &options));
    }

    let layout = layout_tree(&model, &CollapseSet::new(), &LayoutConfig::default());
    let mut seen = HashSet::new();
    let mut ordered: Vec<&TreeNode> = Vec::with_capacity(model.node_count());
    for placement in layout.placements() {
        if let Some(node) = model.get_by_id(placement.id) {
            seen.insert(node.id);
            ordered.push(node);
        }
    }
    ordered.extend(model.nodes().filter(|n| !seen.contains(&n.id)));

    Ok(emit_with(&model, ordered, &options))
}

// ─── Tests ────────────────────────────────────────────────────────────────
