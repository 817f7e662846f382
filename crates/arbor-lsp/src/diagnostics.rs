//! Diagnostics: parse Arbor text → LSP diagnostics.

use crate::text::{line_range, token_range};
use arbor_core::{LintSeverity, ParseError, TreeModel, lint_document};
use tower_lsp::lsp_types::*;

const SOURCE: &str = "arbor-lsp";

/// Compute diagnostics from an already-parsed document.
///
/// A parse failure yields a single error on the offending line. A clean
/// parse yields the lint findings (possibly none, which clears previous
/// diagnostics in the client).
pub fn compute_diagnostics(
    text: &str,
    parsed: &Result<TreeModel, ParseError>,
) -> Vec<Diagnostic> {
    match parsed {
        Ok(model) => lint_diagnostics(text, model),
        Err(err) => vec![parse_error_diagnostic(text, err)],
    }
}

fn parse_error_diagnostic(text: &str, err: &ParseError) -> Diagnostic {
    let range = match err {
        ParseError::DuplicateNodeId { id, line } | ParseError::UnknownNode { id, line, .. } => {
            token_range(text, *line, id)
        }
        _ => err
            .line()
            .map_or_else(Range::default, |line| line_range(text, line)),
    };
    Diagnostic {
        range,
        severity: Some(DiagnosticSeverity::ERROR),
        code: Some(NumberOrString::String(err.code().to_string())),
        source: Some(SOURCE.to_string()),
        message: err.to_string(),
        ..Default::default()
    }
}

fn lint_diagnostics(text: &str, model: &TreeModel) -> Vec<Diagnostic> {
    lint_document(model)
        .into_iter()
        .map(|lint| Diagnostic {
            range: token_range(text, lint.line, lint.node_id.as_str()),
            severity: Some(match lint.severity {
                LintSeverity::Warning => DiagnosticSeverity::WARNING,
                LintSeverity::Info => DiagnosticSeverity::INFORMATION,
            }),
            code: Some(NumberOrString::String(lint.rule.to_string())),
            source: Some(SOURCE.to_string()),
            message: lint.message,
            ..Default::default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::parse_document;
    use pretty_assertions::assert_eq;

    fn diagnose(text: &str) -> Vec<Diagnostic> {
        compute_diagnostics(text, &parse_document(text))
    }

    #[test]
    fn valid_document_produces_no_diagnostics() {
        let diags = diagnose("node r \"Root\"\nnode a\nedge r -> a\n");
        assert!(diags.is_empty(), "expected no diagnostics, got {diags:?}");
    }

    #[test]
    fn duplicate_id_points_at_second_declaration() {
        let diags = diagnose("node a \"x\"\nnode a \"y\"");
        assert_eq!(diags.len(), 1);
        let d = &diags[0];
        assert_eq!(d.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(
            d.code,
            Some(NumberOrString::String("duplicate-node-id".to_string()))
        );
        assert_eq!(d.range.start, Position::new(1, 5));
        assert_eq!(d.range.end, Position::new(1, 6));
    }

    #[test]
    fn unknown_node_points_at_the_missing_id() {
        let diags = diagnose("node a\nedge a -> ghost");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("`ghost`"));
        assert_eq!(diags[0].range.start, Position::new(1, 10));
    }

    #[test]
    fn unknown_directive_covers_the_line() {
        let diags = diagnose("node a\n  nod b");
        assert_eq!(diags[0].range.start, Position::new(1, 2));
        assert_eq!(diags[0].range.end, Position::new(1, 7));
    }

    #[test]
    fn empty_document_reports_at_origin() {
        let diags = diagnose("\n\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].range, Range::default());
        assert_eq!(diags[0].message, "no nodes defined");
    }

    #[test]
    fn lint_findings_become_warnings() {
        let text = "node r\nnode a\nnode b\nedge r -> a\nedge r -> b\nedge a -> b";
        let diags = diagnose(text);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Some(DiagnosticSeverity::WARNING));
        // `edge r -> b` is the edge the drawing leaves out.
        assert_eq!(diags[0].range.start, Position::new(4, 10));
    }

    #[test]
    fn diagnostics_follow_the_given_parse_result() {
        let diags = compute_diagnostics("node a", &Err(ParseError::NoNodes));
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].code,
            Some(NumberOrString::String("no-nodes".to_string()))
        );
    }
}
