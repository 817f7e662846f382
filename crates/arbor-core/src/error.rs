//! Parse errors for Arbor documents.
//!
//! Every variant except `NoNodes` points at a 1-based source line.

use std::fmt;
use thiserror::Error;

/// Which side of an `edge` directive referenced an undeclared node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    From,
    To,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::From => f.write_str("from"),
            Endpoint::To => f.write_str("to"),
        }
    }
}

/// A user-input error found while parsing. None of these are fatal to the
/// host: callers show the message in place of the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: bad node syntax, expected `node <id> \"<title>\"`")]
    BadNodeSyntax { line: usize },

    #[error("line {line}: bad edge syntax, expected `edge <from> -> <to>`")]
    BadEdgeSyntax { line: usize },

    #[error("line {line}: unknown directive `{directive}`")]
    UnknownDirective { line: usize, directive: String },

    #[error("line {line}: duplicate node id `{id}`")]
    DuplicateNodeId { id: String, line: usize },

    #[error("line {line}: unknown node `{id}` ({endpoint} side of edge)")]
    UnknownNode {
        id: String,
        endpoint: Endpoint,
        line: usize,
    },

    #[error("no nodes defined")]
    NoNodes,
}

impl ParseError {
    /// The 1-based source line, when the error has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::BadNodeSyntax { line }
            | ParseError::BadEdgeSyntax { line }
            | ParseError::UnknownDirective { line, .. }
            | ParseError::DuplicateNodeId { line, .. }
            | ParseError::UnknownNode { line, .. } => Some(*line),
            ParseError::NoNodes => None,
        }
    }

    /// Short rule name, used as the diagnostic code by editors.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::BadNodeSyntax { .. } => "bad-node-syntax",
            ParseError::BadEdgeSyntax { .. } => "bad-edge-syntax",
            ParseError::UnknownDirective { .. } => "unknown-directive",
            ParseError::DuplicateNodeId { .. } => "duplicate-node-id",
            ParseError::UnknownNode { .. } => "unknown-node",
            ParseError::NoNodes => "no-nodes",
        }
    }
}
