//! Caller-owned collapse state.
//!
//! A `CollapseSet` records which nodes currently hide their descendants.
//! It outlives any single parse: the host keeps one, prunes it after every
//! successful parse, and flips entries only in response to toggle events
//! between layout passes.

use crate::id::NodeId;
use crate::model::TreeModel;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The node now hides its descendants.
    Collapsed,
    /// The node shows its children again.
    Expanded,
    /// Rejected: the node has no children.
    NoChildren,
    /// Rejected: the id is not declared in the model.
    UnknownNode,
}

impl ToggleOutcome {
    /// Whether the set changed and a fresh layout is needed.
    pub fn changed(self) -> bool {
        matches!(self, ToggleOutcome::Collapsed | ToggleOutcome::Expanded)
    }
}

/// Set of collapsed node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapseSet {
    ids: HashSet<NodeId>,
}

impl CollapseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    /// Flip `id` when it names a node with at least one child in `model`.
    pub fn toggle(&mut self, model: &TreeModel, id: NodeId) -> ToggleOutcome {
        if !model.contains(id) {
            return ToggleOutcome::UnknownNode;
        }
        if !model.has_children(id) {
            return ToggleOutcome::NoChildren;
        }
        if self.ids.remove(&id) {
            ToggleOutcome::Expanded
        } else {
            self.ids.insert(id);
            ToggleOutcome::Collapsed
        }
    }

    /// Drop every id that `model` no longer declares.
    ///
    /// Returns the number of ids removed. Ids that still exist but lost all
    /// their children stay in the set: they are harmless during layout and
    /// take effect again if the children come back.
    pub fn prune(&mut self, model: &TreeModel) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| model.contains(*id));
        let removed = before - self.ids.len();
        if removed > 0 {
            log::debug!("pruned {removed} stale collapsed ids");
        }
        removed
    }

    /// Ids in sorted order, for stable display and serialization.
    pub fn sorted(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.iter().collect();
        ids.sort_by_key(|id| id.as_str());
        ids
    }
}

impl FromIterator<NodeId> for CollapseSet {
    fn from_iter<T: IntoIterator<Item = NodeId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
