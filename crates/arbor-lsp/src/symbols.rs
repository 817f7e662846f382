//! Document symbols: outline of the tree as drawn.
//!
//! Reachable nodes nest under the parent the layout draws them under;
//! nodes the root cannot reach follow as top-level symbols.

use crate::text::{line_range, token_range};
use arbor_core::{CollapseSet, LayoutConfig, NodeId, TreeModel, TreeNode, layout_tree};
use std::collections::{HashMap, HashSet};
use tower_lsp::lsp_types::*;

/// Compute the nested symbol outline for a parsed document.
pub fn compute_symbols(text: &str, model: &TreeModel) -> Vec<DocumentSymbol> {
    let layout = layout_tree(model, &CollapseSet::new(), &LayoutConfig::default());

    // Pre-order reversed: every child is finished before its parent.
    let mut pending: HashMap<NodeId, Vec<DocumentSymbol>> = HashMap::new();
    let mut roots: Vec<DocumentSymbol> = Vec::new();
    for placement in layout.placements().iter().rev() {
        let Some(node) = model.get_by_id(placement.id) else {
            continue;
        };
        let mut children = pending.remove(&node.id).unwrap_or_default();
        children.reverse();
        let symbol = node_symbol(text, node, children);
        match placement.parent {
            Some(parent) => pending.entry(parent).or_default().push(symbol),
            None => roots.push(symbol),
        }
    }

    let drawn: HashSet<NodeId> = layout.visible();
    roots.extend(
        model
            .nodes()
            .filter(|n| !drawn.contains(&n.id))
            .map(|n| node_symbol(text, n, Vec::new())),
    );
    roots
}

#[allow(deprecated)] // DocumentSymbol::deprecated is deprecated but required
fn node_symbol(text: &str, node: &TreeNode, children: Vec<DocumentSymbol>) -> DocumentSymbol {
    DocumentSymbol {
        name: node.id.as_str().to_string(),
        detail: (!node.has_default_title()).then(|| node.title.clone()),
        kind: if children.is_empty() {
            SymbolKind::OBJECT
        } else {
            SymbolKind::NAMESPACE
        },
        tags: None,
        deprecated: None,
        range: line_range(text, node.line),
        selection_range: token_range(text, node.line, node.id.as_str()),
        children: (!children.is_empty()).then_some(children),
    }
}
