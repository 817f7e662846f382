pub mod collapse;
pub mod emitter;
pub mod error;
pub mod format;
pub mod id;
pub mod layout;
pub mod lint;
pub mod model;
pub mod parser;
pub mod render;

pub use collapse::{CollapseSet, ToggleOutcome};
pub use error::{Endpoint, ParseError};
pub use format::{FormatConfig, format_document};
pub use id::NodeId;
pub use layout::{LayoutConfig, Placement, TreeLayout, layout_tree};
pub use lint::{LintDiagnostic, LintSeverity, lint_document};
pub use model::*;
pub use parser::parse_document;
pub use render::{DrawCommand, DrawList, render, render_tree};

// Re-export geometry and graph types so downstream crates don't need a direct dependency
pub use kurbo::{Point, Rect};
pub use petgraph::graph::NodeIndex;
