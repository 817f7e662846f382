//! Core tree data model for Arbor documents.
//!
//! A parsed document is an arena of `TreeNode` records (a `petgraph`
//! directed graph) plus the list of `Edge` declarations it was built from.
//! Nodes are stored in declaration order and children are referenced by
//! index, so traversals never need to chase owned pointers. Once
//! `parse_document` returns a `TreeModel`, nothing mutates it.

use crate::id::NodeId;
use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::HashMap;

// ─── Nodes & Edges ───────────────────────────────────────────────────────

/// A declared node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    /// Unique key, as written after `node`.
    pub id: NodeId,

    /// Display title. Already falls back to the id when the source title
    /// was empty or missing.
    pub title: String,

    /// 1-based line of the `node` directive.
    pub line: usize,
}

impl TreeNode {
    /// Build a node, applying the empty-title fallback.
    pub fn new(id: NodeId, title: &str, line: usize) -> Self {
        let title = if title.is_empty() {
            id.as_str().to_string()
        } else {
            title.to_string()
        };
        Self { id, title, line }
    }

    /// True when the title is just the id (no explicit title was given).
    pub fn has_default_title(&self) -> bool {
        self.title == self.id.as_str()
    }
}

/// A declared `edge from -> to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    /// 1-based line of the `edge` directive.
    pub line: usize,
}

// ─── Tree Model ──────────────────────────────────────────────────────────

/// The complete parse result.
///
/// Invariants upheld by the parser:
/// - every edge endpoint is a declared node;
/// - there is at least one node;
/// - `root` is the first declared node that is never an edge target, or the
///   first declared node when every node is a target.
#[derive(Debug, Clone)]
pub struct TreeModel {
    /// Arena of nodes; graph edges point parent → child and carry the
    /// position of their declaration in `edges`.
    graph: DiGraph<TreeNode, usize>,

    /// Index from NodeId → NodeIndex for fast lookup.
    id_index: HashMap<NodeId, NodeIndex>,

    /// Edge declarations in source order.
    edges: Vec<Edge>,

    /// The chosen root.
    root: NodeIndex,
}

impl TreeModel {
    /// Assemble a model from resolved parts and select its root.
    ///
    /// Returns `None` when `graph` has no nodes. Callers are responsible for
    /// having resolved every edge in `edges` into `graph` already.
    pub(crate) fn assemble(
        graph: DiGraph<TreeNode, usize>,
        id_index: HashMap<NodeId, NodeIndex>,
        edges: Vec<Edge>,
    ) -> Option<Self> {
        let first = graph.node_indices().next()?;
        let root = graph
            .node_indices()
            .find(|&idx| {
                graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .unwrap_or(first);

        Some(Self {
            graph,
            id_index,
            edges,
            root,
        })
    }

    /// The root node index.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// The root node's id.
    pub fn root_id(&self) -> NodeId {
        self.graph[self.root].id
    }

    /// Read-only access to the underlying arena.
    pub fn graph(&self) -> &DiGraph<TreeNode, usize> {
        &self.graph
    }

    /// The node stored at `idx`.
    pub fn node(&self, idx: NodeIndex) -> &TreeNode {
        &self.graph[idx]
    }

    /// Look up a node by its id.
    pub fn get_by_id(&self, id: NodeId) -> Option<&TreeNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Get the index for a NodeId.
    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Whether `id` is declared in this model.
    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Number of declared nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Edge declarations in source order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Children of a node in edge-declaration order.
    ///
    /// `petgraph` walks adjacency lists newest-first, so the outgoing edges
    /// are re-sorted by `EdgeIndex` (which follows insertion order).
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.id(), e.target()))
            .collect();
        out.sort_by_key(|(edge, _)| *edge);
        out.into_iter().map(|(_, target)| target).collect()
    }

    /// Children of `id` as ids, in edge-declaration order.
    /// Empty for unknown ids.
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        match self.index_of(id) {
            Some(idx) => self
                .children(idx)
                .into_iter()
                .map(|c| self.graph[c].id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether the node has at least one child in the model
    /// (independent of collapse state).
    pub fn has_children(&self, id: NodeId) -> bool {
        self.index_of(id).is_some_and(|idx| {
            self.graph
                .neighbors_directed(idx, Direction::Outgoing)
                .next()
                .is_some()
        })
    }

    /// Every node with an edge into `idx`, in edge-declaration order.
    /// A well-formed tree has at most one.
    pub fn parents(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| (e.id(), e.source()))
            .collect();
        out.sort_by_key(|(edge, _)| *edge);
        out.into_iter().map(|(_, source)| source).collect()
    }
}
