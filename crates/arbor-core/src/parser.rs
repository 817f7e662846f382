//! Parser for the Arbor text format → `TreeModel`.
//!
//! Built on `winnow` 0.7. The format is line-oriented: every non-blank line
//! is one directive, either
//!
//! ```text
//! node <id> "<title>"
//! edge <from> -> <to>
//! ```
//!
//! Lines are scanned top to bottom and the first line-level error wins.
//! Edges are resolved only after the whole text has been scanned, so an
//! edge may refer to a node declared further down.

use crate::error::{Endpoint, ParseError};
use crate::id::NodeId;
use crate::model::{Edge, TreeModel, TreeNode};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use winnow::ascii::{space0, space1};
use winnow::combinator::{opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{rest, take_till};

/// Parse an Arbor document string into a `TreeModel`.
#[must_use = "parsing result should be used"]
pub fn parse_document(input: &str) -> Result<TreeModel, ParseError> {
    let mut graph: DiGraph<TreeNode, usize> = DiGraph::new();
    let mut id_index: HashMap<NodeId, NodeIndex> = HashMap::new();
    let mut pending: Vec<PendingEdge<'_>> = Vec::new();

    for (i, raw) in input.lines().enumerate() {
        let line = i + 1;
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }

        match directive_keyword(text) {
            "node" => {
                let (id, title) = node_line
                    .parse(text)
                    .map_err(|_| ParseError::BadNodeSyntax { line })?;
                let id = NodeId::intern(id);
                if id_index.contains_key(&id) {
                    return Err(ParseError::DuplicateNodeId {
                        id: id.as_str().to_string(),
                        line,
                    });
                }
                let idx = graph.add_node(TreeNode::new(id, title, line));
                id_index.insert(id, idx);
            }
            "edge" => {
                let (from, to) = edge_line
                    .parse(text)
                    .map_err(|_| ParseError::BadEdgeSyntax { line })?;
                pending.push(PendingEdge { from, to, line });
            }
            other => {
                return Err(ParseError::UnknownDirective {
                    line,
                    directive: other.to_string(),
                });
            }
        }
    }

    let mut edges = Vec::with_capacity(pending.len());
    for (pos, edge) in pending.iter().enumerate() {
        let (from, from_idx) = resolve_endpoint(&id_index, edge, Endpoint::From)?;
        let (to, to_idx) = resolve_endpoint(&id_index, edge, Endpoint::To)?;
        graph.add_edge(from_idx, to_idx, pos);
        edges.push(Edge {
            from,
            to,
            line: edge.line,
        });
    }

    log::debug!(
        "parsed {} nodes, {} edges",
        graph.node_count(),
        edges.len()
    );

    TreeModel::assemble(graph, id_index, edges).ok_or(ParseError::NoNodes)
}

/// An `edge` directive whose endpoints have not been checked yet.
struct PendingEdge<'a> {
    from: &'a str,
    to: &'a str,
    line: usize,
}

/// Endpoints are looked up, never interned, so ids that no node declares
/// do not outlive the parse.
fn resolve_endpoint(
    id_index: &HashMap<NodeId, NodeIndex>,
    edge: &PendingEdge<'_>,
    endpoint: Endpoint,
) -> Result<(NodeId, NodeIndex), ParseError> {
    let raw = match endpoint {
        Endpoint::From => edge.from,
        Endpoint::To => edge.to,
    };
    NodeId::lookup(raw)
        .and_then(|id| id_index.get(&id).map(|&idx| (id, idx)))
        .ok_or_else(|| ParseError::UnknownNode {
            id: raw.to_string(),
            endpoint,
            line: edge.line,
        })
}

/// The first whitespace-delimited word of a trimmed, non-blank line.
fn directive_keyword(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

// ─── Low-level parsers ──────────────────────────────────────────────────

/// `node <id>` optionally followed by `"<title>"` (closing quote optional).
fn node_line<'a>(input: &mut &'a str) -> ModalResult<(&'a str, &'a str)> {
    ("node", space1, token, opt(preceded(space1, quoted_title)))
        .map(|(_, _, id, title)| (id, title.unwrap_or("")))
        .parse_next(input)
}

/// `edge <from> -> <to>`, whitespace around the arrow optional.
fn edge_line<'a>(input: &mut &'a str) -> ModalResult<(&'a str, &'a str)> {
    ("edge", space1, edge_endpoints)
        .map(|(_, _, endpoints)| endpoints)
        .parse_next(input)
}

/// A contiguous run of non-whitespace characters.
fn token<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_till(1.., char::is_whitespace).parse_next(input)
}

/// `<from> -> <to>` up to the end of input. Ids may contain `->`, so every
/// arrow is tried from the last one back; the first split that leaves a
/// single token on each side wins.
fn edge_endpoints<'a>(input: &mut &'a str) -> ModalResult<(&'a str, &'a str)> {
    let text: &'a str = *input;
    for (at, arrow) in text.rmatch_indices("->") {
        let from = text[..at].trim_end();
        let to = text[at + arrow.len()..].trim_start();
        if is_token(from) && is_token(to) {
            *input = &text[text.len()..];
            return Ok((from, to));
        }
    }
    Err(ErrMode::Backtrack(ContextError::new()))
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && !s.contains(char::is_whitespace)
}

/// Everything after the opening quote; one closing quote is dropped if
/// present, so titles may contain `"`.
fn quoted_title<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    preceded('"', rest)
        .map(|title: &'a str| title.strip_suffix('"').unwrap_or(title))
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn titles(model: &TreeModel) -> Vec<(String, String)> {
        model
            .nodes()
            .map(|n| (n.id.as_str().to_string(), n.title.clone()))
            .collect()
    }

    #[test]
    fn parse_minimal_document() {
        let input = r#"
node ceo "Chief Executive"
node cto "Chief Technology"
edge ceo -> cto
"#;
        let model = parse_document(input).expect("parse failed");
        assert_eq!(model.node_count(), 2);
        assert_eq!(model.root_id().as_str(), "ceo");
        assert_eq!(
            model.child_ids(NodeId::intern("ceo")),
            vec![NodeId::intern("cto")]
        );
        assert_eq!(model.edges()[0].line, 4);
    }

    #[test]
    fn parse_titles_and_fallbacks() {
        let input = "node a \"Alpha\"\nnode b \"\"\nnode c\nnode d \"Unclosed title";
        let model = parse_document(input).unwrap();
        assert_eq!(
            titles(&model),
            vec![
                ("a".to_string(), "Alpha".to_string()),
                ("b".to_string(), "b".to_string()),
                ("c".to_string(), "c".to_string()),
                ("d".to_string(), "Unclosed title".to_string()),
            ]
        );
    }

    #[test]
    fn parse_title_with_inner_spaces_and_symbols() {
        let model = parse_document("node q \"Q3 -> planning: 50%\"").unwrap();
        assert_eq!(model.node(model.root()).title, "Q3 -> planning: 50%");
    }

    #[test]
    fn parse_title_with_embedded_quotes() {
        let model = parse_document("node tv \"27\" monitor\"\nnode q \"say \"hi\"").unwrap();
        assert_eq!(
            titles(&model),
            vec![
                ("tv".to_string(), "27\" monitor".to_string()),
                ("q".to_string(), "say \"hi".to_string()),
            ]
        );
    }

    #[test]
    fn text_after_closing_quote_belongs_to_title() {
        let model = parse_document("node a \"t\" trailing").unwrap();
        assert_eq!(model.node(model.root()).title, "t\" trailing");
    }

    #[test]
    fn parse_ids_with_punctuation() {
        let model = parse_document("node team-a.1 \"A\"\nnode b:2\nedge team-a.1 -> b:2").unwrap();
        assert_eq!(model.root_id().as_str(), "team-a.1");
    }

    #[test]
    fn parse_edge_arrow_spacing() {
        let input = "node a\nnode b\nnode c\nnode d\nedge a->b\nedge a ->c\nedge a-> d";
        let model = parse_document(input).unwrap();
        let kids: Vec<&str> = model
            .child_ids(NodeId::intern("a"))
            .iter()
            .map(|id| id.as_str())
            .collect();
        assert_eq!(kids, vec!["b", "c", "d"]);
    }

    #[test]
    fn parse_hyphenated_source_before_arrow() {
        let model = parse_document("node x-1\nnode y\nedge x-1->y").unwrap();
        assert!(model.has_children(NodeId::intern("x-1")));
    }

    #[test]
    fn source_id_containing_an_arrow() {
        let model = parse_document("node a->b\nnode c\nedge a->b -> c").unwrap();
        assert_eq!(model.root_id().as_str(), "a->b");
        assert_eq!(model.child_ids(NodeId::intern("a->b")), vec![NodeId::intern("c")]);
    }

    #[test]
    fn unspaced_arrows_split_at_the_last_valid_arrow() {
        let model = parse_document("node a->b\nnode c\nedge a->b->c").unwrap();
        assert_eq!(model.edges()[0].from.as_str(), "a->b");
        assert_eq!(model.edges()[0].to.as_str(), "c");
    }

    #[test]
    fn target_id_containing_an_arrow() {
        let model = parse_document("node a\nnode b->c\nedge a -> b->c").unwrap();
        assert_eq!(model.edges()[0].to.as_str(), "b->c");
    }

    #[test]
    fn undeclared_endpoints_are_not_interned() {
        let err = parse_document("node a\nedge a -> zz-never-declared-endpoint").unwrap_err();
        assert!(matches!(err, ParseError::UnknownNode { endpoint: Endpoint::To, .. }));
        assert_eq!(NodeId::lookup("zz-never-declared-endpoint"), None);
    }

    #[test]
    fn parse_skips_blank_and_indented_lines() {
        let input = "\n   \n\tnode a \"A\"   \n\n  edge a -> b\n node b\n";
        let model = parse_document(input).unwrap();
        assert_eq!(model.node_count(), 2);
        assert_eq!(model.edges()[0].line, 5);
    }

    #[test]
    fn parse_crlf_line_endings() {
        let model = parse_document("node a \"A\"\r\nnode b\r\nedge a -> b\r\n").unwrap();
        assert_eq!(model.node(model.root()).title, "A");
    }

    #[test]
    fn parse_empty_document() {
        assert_eq!(parse_document("").unwrap_err(), ParseError::NoNodes);
        assert_eq!(parse_document("\n  \n\t\n").unwrap_err(), ParseError::NoNodes);
    }

    #[test]
    fn edges_alone_report_unknown_node_before_no_nodes() {
        let err = parse_document("edge a -> b").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownNode {
                id: "a".to_string(),
                endpoint: Endpoint::From,
                line: 1,
            }
        );
    }

    #[test]
    fn duplicate_id_cites_second_line() {
        let err = parse_document("node A \"x\"\nnode A \"y\"").unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateNodeId {
                id: "A".to_string(),
                line: 2,
            }
        );
    }

    #[test]
    fn duplicate_check_is_case_sensitive() {
        let model = parse_document("node A\nnode a").unwrap();
        assert_eq!(model.node_count(), 2);
    }

    #[test]
    fn unknown_target_is_reported() {
        let err = parse_document("node A \"x\"\nedge A -> B").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownNode {
                id: "B".to_string(),
                endpoint: Endpoint::To,
                line: 2,
            }
        );
    }

    #[test]
    fn unknown_source_is_checked_before_target() {
        let err = parse_document("node A\nedge X -> Y").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownNode {
                id: "X".to_string(),
                endpoint: Endpoint::From,
                line: 2,
            }
        );
    }

    #[test]
    fn edge_errors_follow_edge_order() {
        let input = "node A\nedge A -> B\nedge C -> A";
        let err = parse_document(input).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn line_errors_win_over_reference_errors() {
        // The unknown reference on line 1 is never reported: the bad
        // directive on line 3 stops the scan first.
        let input = "edge A -> B\nnode A\nfoo bar";
        let err = parse_document(input).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownDirective {
                line: 3,
                directive: "foo".to_string(),
            }
        );
    }

    #[test]
    fn unknown_directives() {
        for input in ["nodes a", "Node a", "# comment", "a -> b"] {
            let err = parse_document(input).unwrap_err();
            assert!(
                matches!(err, ParseError::UnknownDirective { line: 1, .. }),
                "{input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn bad_node_syntax() {
        for input in ["node", "node a junk", "node a Title"] {
            let err = parse_document(input).unwrap_err();
            assert_eq!(err, ParseError::BadNodeSyntax { line: 1 }, "{input:?}");
        }
    }

    #[test]
    fn bad_edge_syntax() {
        for input in ["edge", "edge a", "edge a b", "edge a ->", "edge -> b", "edge a -> b c"] {
            let err = parse_document(input).unwrap_err();
            assert_eq!(err, ParseError::BadEdgeSyntax { line: 1 }, "{input:?}");
        }
    }

    #[test]
    fn root_is_first_non_target() {
        let model = parse_document("node A\nnode B\nedge A->B").unwrap();
        assert_eq!(model.root_id().as_str(), "A");

        let model = parse_document("node B\nnode A\nedge A->B").unwrap();
        assert_eq!(model.root_id().as_str(), "A");
    }

    #[test]
    fn root_without_edges_is_first_declared() {
        let model = parse_document("node A\nnode B").unwrap();
        assert_eq!(model.root_id().as_str(), "A");
    }

    #[test]
    fn root_of_pure_cycle_is_first_declared() {
        let model = parse_document("node A\nnode B\nedge A -> B\nedge B -> A").unwrap();
        assert_eq!(model.root_id().as_str(), "A");
    }

    #[test]
    fn multiple_parents_are_accepted() {
        let input = "node r\nnode a\nnode b\nnode shared\nedge r -> a\nedge r -> b\nedge a -> shared\nedge b -> shared";
        let model = parse_document(input).unwrap();
        let shared = model.index_of(NodeId::intern("shared")).unwrap();
        assert_eq!(model.parents(shared).len(), 2);
    }

    #[test]
    fn parsing_is_deterministic() {
        let input = "node r\nnode a\nnode b\nedge r -> b\nedge r -> a";
        let one = parse_document(input).unwrap();
        let two = parse_document(input).unwrap();
        assert_eq!(titles(&one), titles(&two));
        assert_eq!(one.edges(), two.edges());
        assert_eq!(one.root_id(), two.root_id());
    }
}
