//! Sync engine: source text → model → layout → draw list.
//!
//! Every text change runs one full cycle: parse, prune the collapse set
//! against the new model, lay out, render. A failed parse keeps the last
//! good model around but swaps the draw list for the error message, so a
//! half-edited document never produces a partial diagram.
//!
//! The collapse set is the only state that outlives a cycle. It changes
//! between cycles, either through `toggle_collapse` or through pruning.

use arbor_core::{
    CollapseSet, DrawList, LayoutConfig, LintDiagnostic, NodeId, ParseError, ToggleOutcome,
    TreeLayout, TreeModel, layout_tree, lint_document, parse_document, render_tree,
};
use arbor_render::hit_test;

/// Holds the editor's text and everything derived from it.
pub struct SyncEngine {
    text: String,

    /// The last text that parsed successfully, as a model.
    model: Option<TreeModel>,

    /// Set when the current text does not parse.
    error: Option<ParseError>,

    collapsed: CollapseSet,
    config: LayoutConfig,
    layout: TreeLayout,
    draw_list: DrawList,
}

impl SyncEngine {
    /// Create an engine with no text. The draw list is empty until the first
    /// `set_text`.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            text: String::new(),
            model: None,
            error: None,
            collapsed: CollapseSet::new(),
            config,
            layout: TreeLayout::default(),
            draw_list: DrawList::default(),
        }
    }

    /// Create an engine and run the first cycle on `text`. A parse error is
    /// kept on the engine, not returned.
    pub fn from_text(text: &str, config: LayoutConfig) -> Self {
        let mut engine = Self::new(config);
        let _ = engine.set_text(text);
        engine
    }

    // ─── Text → Diagram ──────────────────────────────────────────────────

    /// Replace the source text and run a full cycle.
    ///
    /// # Errors
    /// Returns the parse error, which also becomes the engine's current
    /// error until the next successful `set_text`.
    pub fn set_text(&mut self, text: &str) -> Result<(), ParseError> {
        text.clone_into(&mut self.text);

        match parse_document(text) {
            Ok(model) => {
                self.collapsed.prune(&model);
                self.model = Some(model);
                self.error = None;
                self.relayout();
                Ok(())
            }
            Err(err) => {
                log::debug!("parse failed: {err}");
                self.draw_list = DrawList::from_error(&err);
                self.layout = TreeLayout::default();
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Change box size or gaps and re-lay out the current model.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
        if self.error.is_none() {
            self.relayout();
        }
    }

    /// Replace the collapse set, e.g. with one restored from a previous
    /// session. Ids the current model does not declare are dropped.
    pub fn set_collapsed(&mut self, collapsed: CollapseSet) {
        self.collapsed = collapsed;
        if let Some(model) = &self.model {
            self.collapsed.prune(model);
        }
        if self.error.is_none() {
            self.relayout();
        }
    }

    fn relayout(&mut self) {
        let Some(model) = &self.model else {
            self.layout = TreeLayout::default();
            self.draw_list = DrawList::default();
            return;
        };
        self.layout = layout_tree(model, &self.collapsed, &self.config);
        self.draw_list = render_tree(model, &self.layout, &self.collapsed, &self.config);
    }

    // ─── Interaction ─────────────────────────────────────────────────────

    /// Flip the collapsed state of `id` and re-render if it changed.
    ///
    /// While the text has a parse error nothing is drawn, so every toggle
    /// reports `UnknownNode`.
    pub fn toggle_collapse(&mut self, id: NodeId) -> ToggleOutcome {
        if self.error.is_some() {
            return ToggleOutcome::UnknownNode;
        }
        let Some(model) = &self.model else {
            return ToggleOutcome::UnknownNode;
        };
        let outcome = self.collapsed.toggle(model, id);
        if outcome.changed() {
            self.relayout();
        }
        outcome
    }

    /// Toggle whichever box is under the canvas point (x, y).
    pub fn toggle_at(&mut self, x: f64, y: f64) -> Option<(NodeId, ToggleOutcome)> {
        let id = hit_test(&self.draw_list, x, y)?;
        Some((id, self.toggle_collapse(id)))
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The last successfully parsed model. Still set while the current text
    /// has an error.
    pub fn model(&self) -> Option<&TreeModel> {
        self.model.as_ref()
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    pub fn collapsed(&self) -> &CollapseSet {
        &self.collapsed
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Layout of the current diagram; empty while there is an error.
    pub fn layout(&self) -> &TreeLayout {
        &self.layout
    }

    /// What the painters should draw for the current text.
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Lint findings for the current text; empty while there is an error.
    pub fn lint(&self) -> Vec<LintDiagnostic> {
        match (&self.model, &self.error) {
            (Some(model), None) => lint_document(model),
            _ => Vec::new(),
        }
    }
}
