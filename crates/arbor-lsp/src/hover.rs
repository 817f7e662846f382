//! Hover: show contextual information on hover.

use crate::text::line_at;
use arbor_core::{NodeId, TreeModel};
use ropey::Rope;
use tower_lsp::lsp_types::*;

/// Compute hover information at the given position.
///
/// - Hovering a node id → title, declaration line, parents and children.
/// - Hovering a directive keyword → its syntax.
pub fn compute_hover(rope: &Rope, pos: Position, model: Option<&TreeModel>) -> Option<Hover> {
    let (line, col) = line_at(rope, pos)?;
    let word = extract_word_at(&line, col);
    if word.is_empty() {
        return None;
    }

    let leading = line.chars().take_while(|c| c.is_whitespace()).count();
    let on_directive = line.split_whitespace().next().is_some_and(|first| {
        first == word && col >= leading && col <= leading + first.chars().count()
    });
    if on_directive && let Some(hover) = hover_keyword(&word) {
        return Some(hover);
    }

    hover_node_id(&word, model?)
}

/// Extract the id-like token under char column `col`.
///
/// Tokens are split on whitespace and quotes, and an `a->b` run is split at
/// the arrow.
fn extract_word_at(line: &str, col: usize) -> String {
    let chars: Vec<char> = line.chars().collect();
    let col = col.min(chars.len());
    let is_word_char = |c: char| !c.is_whitespace() && c != '"';

    let start = (0..col)
        .rev()
        .find(|&i| !is_word_char(chars[i]))
        .map_or(0, |i| i + 1);
    let end = (col..chars.len())
        .find(|&i| !is_word_char(chars[i]))
        .unwrap_or(chars.len());
    let token: String = chars[start..end].iter().collect();

    let Some(arrow) = token.find("->") else {
        return token;
    };
    let arrow_col = start + token[..arrow].chars().count();
    if col <= arrow_col {
        token[..arrow].to_string()
    } else if col >= arrow_col + 2 {
        token[arrow + 2..].to_string()
    } else {
        String::new()
    }
}

fn hover_node_id(word: &str, model: &TreeModel) -> Option<Hover> {
    let id = NodeId::lookup(word)?;
    let idx = model.index_of(id)?;
    let node = model.node(idx);

    let children = model.child_ids(id);
    let parents: Vec<String> = model
        .parents(idx)
        .into_iter()
        .map(|p| format!("`{}`", model.node(p).id))
        .collect();

    let mut md = format!("**{}** `{}`\n\nDeclared on line {}.", node.title, id, node.line);
    if id == model.root_id() {
        md.push_str(" Root of the diagram.");
    }
    if !parents.is_empty() {
        md.push_str(&format!("\n\nParents: {}", parents.join(", ")));
    }
    match children.len() {
        0 => md.push_str("\n\nNo children."),
        1 => md.push_str("\n\n1 child; click the box to collapse it."),
        n => md.push_str(&format!("\n\n{n} children; click the box to collapse them.")),
    }
    Some(make_hover(&md))
}

fn hover_keyword(word: &str) -> Option<Hover> {
    let desc = match word {
        "node" => "**node** `<id> \"<title>\"`\n\nDeclares a box. An empty or missing title shows the id.",
        "edge" => "**edge** `<from> -> <to>`\n\nDraws `<to>` as a child of `<from>`. Both ids must be declared somewhere in the file.",
        _ => return None,
    };
    Some(make_hover(desc))
}

fn make_hover(markdown: &str) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: markdown.to_string(),
        }),
        range: None,
    }
}
