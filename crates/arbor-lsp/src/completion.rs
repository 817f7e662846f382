//! Completions: directive snippets and known node ids.

use arbor_core::TreeModel;
use tower_lsp::lsp_types::*;

/// Compute completions for the text before the cursor on the current line.
///
/// - At the start of a line → `node` / `edge` snippets.
/// - In an `edge` line, before or after the arrow → declared node ids.
/// - Anywhere else (ids and titles of `node` lines) → nothing.
pub fn compute_completions(before_cursor: &str, model: Option<&TreeModel>) -> Vec<CompletionItem> {
    let trimmed = before_cursor.trim_start();

    if !trimmed.contains(char::is_whitespace) {
        return directive_completions(trimmed);
    }

    let Some(rest) = trimmed
        .strip_prefix("edge")
        .filter(|rest| rest.starts_with(char::is_whitespace))
    else {
        return Vec::new();
    };
    let in_source = !rest.contains("->");
    let current = if in_source {
        rest.trim_start()
    } else {
        rest.rsplit("->").next().unwrap_or("").trim_start()
    };
    if current.contains(char::is_whitespace) {
        // Past the token; only the arrow can follow the source.
        return if in_source { arrow_completion() } else { Vec::new() };
    }

    model.map_or_else(Vec::new, |model| id_completions(model, current))
}

fn directive_completions(prefix: &str) -> Vec<CompletionItem> {
    [
        (
            "node",
            "node ${1:id} \"${2:Title}\"",
            "Declare a box with an id and a title",
        ),
        (
            "edge",
            "edge ${1:from} -> ${2:to}",
            "Draw `to` as a child of `from`",
        ),
    ]
    .into_iter()
    .filter(|(label, _, _)| label.starts_with(prefix))
    .map(|(label, snippet, detail)| CompletionItem {
        label: label.to_string(),
        kind: Some(CompletionItemKind::KEYWORD),
        detail: Some(detail.to_string()),
        insert_text: Some(snippet.to_string()),
        insert_text_format: Some(InsertTextFormat::SNIPPET),
        ..Default::default()
    })
    .collect()
}

fn arrow_completion() -> Vec<CompletionItem> {
    vec![CompletionItem {
        label: "->".to_string(),
        kind: Some(CompletionItemKind::OPERATOR),
        insert_text: Some("-> ".to_string()),
        ..Default::default()
    }]
}

fn id_completions(model: &TreeModel, prefix: &str) -> Vec<CompletionItem> {
    model
        .nodes()
        .filter(|n| n.id.as_str().starts_with(prefix))
        .map(|n| CompletionItem {
            label: n.id.as_str().to_string(),
            kind: Some(CompletionItemKind::REFERENCE),
            detail: (!n.has_default_title()).then(|| n.title.clone()),
            ..Default::default()
        })
        .collect()
}
