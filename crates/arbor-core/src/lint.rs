//! Lint diagnostics for Arbor documents.
//!
//! The parser accepts any graph whose edges point at declared nodes. These
//! rules flag the shapes that are legal but do not draw as a clean tree.
//! Results feed into `textDocument/publishDiagnostics` in the LSP server.

use crate::collapse::CollapseSet;
use crate::id::NodeId;
use crate::layout::{LayoutConfig, layout_tree};
use crate::model::TreeModel;
use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::visit::Dfs;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// The drawing will not show every edge.
    Warning,
    /// Informational.
    Info,
}

/// A single lint diagnostic.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// The node this diagnostic refers to.
    pub node_id: NodeId,
    /// 1-based line the finding points at.
    pub line: usize,
    /// Human-readable message.
    pub message: String,
    /// Severity level.
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "multiple-parents", "cycle").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the model and return diagnostics, ordered by
/// line.
#[must_use]
pub fn lint_document(model: &TreeModel) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_multiple_parents(model, &mut diags);
    lint_cycles(model, &mut diags);
    lint_unreachable(model, &mut diags);
    lint_duplicate_edges(model, &mut diags);
    diags.sort_by_key(|d| d.line);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Warn when a node is the target of edges from more than one parent.
/// Layout keeps only the parent the traversal reaches first.
fn lint_multiple_parents(model: &TreeModel, diags: &mut Vec<LintDiagnostic>) {
    let layout = layout_tree(model, &CollapseSet::new(), &LayoutConfig::default());

    for idx in model.graph().node_indices() {
        let mut seen = HashSet::new();
        let parents: Vec<NodeIndex> = model
            .parents(idx)
            .into_iter()
            .filter(|p| seen.insert(*p))
            .collect();
        if parents.len() < 2 {
            continue;
        }

        let node = model.node(idx);
        let names: Vec<&str> = parents.iter().map(|&p| model.node(p).id.as_str()).collect();
        let drawn_parent = layout.placement(node.id).and_then(|p| p.parent);
        // Point at the first edge the drawing leaves out.
        let kept = drawn_parent.unwrap_or(model.node(parents[0]).id);
        let line = model
            .edges()
            .iter()
            .find(|e| e.to == node.id && e.from != kept)
            .map_or(node.line, |e| e.line);
        let drawn_under = match drawn_parent {
            Some(parent) => format!("it is drawn only under `{parent}`"),
            None => "it is not drawn".to_string(),
        };

        diags.push(LintDiagnostic {
            node_id: node.id,
            line,
            message: format!(
                "`{}` has {} parents ({}); {}.",
                node.id,
                names.len(),
                names.join(", "),
                drawn_under
            ),
            severity: LintSeverity::Warning,
            rule: "multiple-parents",
        });
    }
}

/// Warn once per cycle (a strongly connected component with more than one
/// node, or a node with an edge to itself).
fn lint_cycles(model: &TreeModel, diags: &mut Vec<LintDiagnostic>) {
    let graph = model.graph();
    for mut component in tarjan_scc(graph) {
        let is_cycle = component.len() > 1
            || component
                .first()
                .is_some_and(|&idx| graph.contains_edge(idx, idx));
        if !is_cycle {
            continue;
        }
        component.sort();
        let first = model.node(component[0]);
        let names: Vec<&str> = component.iter().map(|&i| model.node(i).id.as_str()).collect();
        diags.push(LintDiagnostic {
            node_id: first.id,
            line: first.line,
            message: format!("Edges form a cycle through {}.", names.join(" → ")),
            severity: LintSeverity::Warning,
            rule: "cycle",
        });
    }
}

/// Info for nodes the root cannot reach; they never appear in the diagram.
fn lint_unreachable(model: &TreeModel, diags: &mut Vec<LintDiagnostic>) {
    let graph = model.graph();
    let mut reachable = HashSet::new();
    let mut dfs = Dfs::new(graph, model.root());
    while let Some(idx) = dfs.next(graph) {
        reachable.insert(idx);
    }

    for idx in graph.node_indices() {
        if reachable.contains(&idx) {
            continue;
        }
        let node = model.node(idx);
        diags.push(LintDiagnostic {
            node_id: node.id,
            line: node.line,
            message: format!(
                "`{}` is not reachable from root `{}` and will not be drawn.",
                node.id,
                model.root_id()
            ),
            severity: LintSeverity::Info,
            rule: "unreachable",
        });
    }
}

/// Info when the same `edge a -> b` is declared more than once.
fn lint_duplicate_edges(model: &TreeModel, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    for edge in model.edges() {
        if !seen.insert((edge.from, edge.to)) {
            diags.push(LintDiagnostic {
                node_id: edge.to,
                line: edge.line,
                message: format!(
                    "Duplicate `edge {} -> {}`; remove the extra declaration.",
                    edge.from, edge.to
                ),
                severity: LintSeverity::Info,
                rule: "duplicate-edge",
            });
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
